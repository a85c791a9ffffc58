//! Common utilities and types shared across miniweed

pub mod config;
pub mod error;
pub mod fid;

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use fid::{FileId, ToVolumeId, VolumeId};
