//! Configuration for the miniweed client
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `MINIWEED_*` environment variables. CLI flags are applied by the binary
//! on top of the loaded config, so `load` does not validate; `WeedFs::new`
//! checks the final values once.

use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "MINIWEED_CONFIG";

/// Config file looked up in the working directory (any supported extension)
const DEFAULT_CONFIG_NAME: &str = "miniweed";

const ENV_PREFIX: &str = "MINIWEED";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Master host name or IP
    #[serde(default = "default_master_addr")]
    pub master_addr: String,

    /// Master HTTP port
    #[serde(default = "default_master_port")]
    pub master_port: u16,

    /// Per-request HTTP timeout, applied to master and volume calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_master_addr() -> String {
    "127.0.0.1".to_string()
}
fn default_master_port() -> u16 {
    9333
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            master_addr: default_master_addr(),
            master_port: default_master_port(),
            timeout_secs: default_timeout_secs(),
            log_level: default_log_level(),
        }
    }
}

impl ClientConfig {
    /// Config pointing at the given master, everything else defaulted
    pub fn with_master(master_addr: impl Into<String>, master_port: u16) -> Self {
        Self {
            master_addr: master_addr.into(),
            master_port,
            ..Default::default()
        }
    }

    /// Load config from `path`, or from `$MINIWEED_CONFIG`, or from
    /// `./miniweed.toml` if present, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));

        let builder = ::config::Config::builder();
        let builder = match explicit {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                builder.add_source(::config::File::from(path).required(true))
            }
            None => {
                builder.add_source(::config::File::with_name(DEFAULT_CONFIG_NAME).required(false))
            }
        };

        let settings = builder
            .add_source(::config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Reject values that cannot produce a working client
    pub fn validate(&self) -> Result<()> {
        if self.master_addr.trim().is_empty() {
            return Err(Error::InvalidConfig("master_addr cannot be empty".into()));
        }
        if self.master_port == 0 {
            return Err(Error::InvalidConfig("master_port cannot be 0".into()));
        }
        if self.timeout_secs == 0 {
            return Err(Error::InvalidConfig("timeout_secs must be positive".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `host:port` of the master
    pub fn master_endpoint(&self) -> String {
        format!("{}:{}", self.master_addr, self.master_port)
    }

    /// Absolute URL of a master endpoint, `path` starting with `/`
    pub fn master_url(&self, path: &str) -> String {
        format!("http://{}{}", self.master_endpoint(), path)
    }
}
