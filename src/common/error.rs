//! Error types for miniweed

use crate::common::VolumeId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // === Network Errors ===
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    // === Location Errors ===
    #[error("No available volume server for volume {volume_id}")]
    NoAvailableServer { volume_id: VolumeId },

    // === Input Errors ===
    #[error("Invalid volume id: {0:?}")]
    InvalidVolumeId(String),

    #[error("Invalid file id: {0:?}")]
    InvalidFileId(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // === Config Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config error: {0}")]
    Config(#[from] ::config::ConfigError),

    // === File Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Assign failed: {0}")]
    Assign(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Fetch failed with status {status}")]
    Fetch { status: u16 },
}

impl Error {
    /// Did the cluster fail to answer, as opposed to answering "nothing here"?
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Parse(_))
    }

    /// Process exit code used by the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidVolumeId(_)
            | Error::InvalidFileId(_)
            | Error::InvalidArgument(_)
            | Error::InvalidConfig(_)
            | Error::Config(_) => 2,
            e if e.is_infrastructure() => 3,
            _ => 1,
        }
    }
}
