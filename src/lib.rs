//! # miniweed
//!
//! A client for SeaweedFS-style blob clusters:
//! - A master node that knows which volume servers hold which volume
//! - Volume servers that store the file chunks
//!
//! The core is [`VolumeLocationCache`], which asks the master where a volume
//! lives once, remembers the answer, and spreads reads across replicas.
//!
//! ## Architecture

#![allow(clippy::result_large_err)]
//!
//! ```text
//!   get("3,01637037d6")
//!          │
//! ┌────────▼──────────────┐   miss    ┌──────────────────┐
//! │  VolumeLocationCache  ├──────────►│ DirectoryClient  │── GET /dir/lookup ──► master
//! │  volume → strategy    │◄──────────┤                  │
//! └────────┬──────────────┘ locations └──────────────────┘
//!          │ pick replica
//! ┌────────▼──────┐
//! │ volume server │  GET http://{publicUrl}/{fid}
//! └───────────────┘
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! # async fn run() -> miniweed::Result<()> {
//! use miniweed::{ClientConfig, WeedFs};
//!
//! let fs = WeedFs::new(&ClientConfig::with_master("127.0.0.1", 9333))?;
//! let fid = fs.put(b"hello".to_vec(), "hello.txt", None).await?;
//! let data = fs.get(&fid.to_string(), None).await?;
//! assert_eq!(&data[..], b"hello");
//! # Ok(())
//! # }
//! ```
//!
//! ### From the command line
//! ```bash
//! miniweed --master 127.0.0.1 --port 9333 locate 3
//! miniweed put ./photo.jpg --collection pictures
//! miniweed get 3,01637037d6 --output ./photo.jpg
//! ```

pub mod client;
pub mod common;
pub mod location;

// Re-export commonly used types
pub use client::WeedFs;
pub use common::{ClientConfig, Error, FileId, Result, ToVolumeId, VolumeId};
pub use location::{DirectoryClient, LocationLookup, SelectionStrategy, VolumeLocationCache};

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
