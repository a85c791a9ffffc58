//! Volume location resolution
//!
//! - Directory lookups against the master (`/dir/lookup`)
//! - Per-volume selection strategies (fixed or random replica)
//! - The concurrent cache tying the two together

pub mod cache;
pub mod directory;
pub mod strategy;

pub use cache::VolumeLocationCache;
pub use directory::{DirectoryClient, LocationLookup, LocationSet};
pub use strategy::SelectionStrategy;
