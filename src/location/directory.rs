//! Master directory lookups
//!
//! Asks the master which volume servers currently hold a volume. One HTTP
//! call per lookup; nothing is cached at this layer.

use crate::common::{ClientConfig, Result, ToVolumeId, VolumeId};
use serde::Deserialize;
use std::future::Future;

/// Public URLs (`host:port`) of the servers holding a volume, in master order
pub type LocationSet = Vec<String>;

/// Source of volume locations consulted by the cache on a miss
pub trait LocationLookup: Send + Sync {
    fn lookup(&self, volume_id: VolumeId) -> impl Future<Output = Result<LocationSet>> + Send;
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    locations: Vec<Location>,
}

#[derive(Debug, Deserialize)]
struct Location {
    #[serde(rename = "publicUrl")]
    public_url: String,
}

/// Decode a `/dir/lookup` body into its public URLs
pub(crate) fn parse_locations(body: &[u8]) -> Result<LocationSet> {
    let response: LookupResponse = serde_json::from_slice(body)?;
    Ok(response
        .locations
        .into_iter()
        .map(|location| location.public_url)
        .collect())
}

/// HTTP client for the master's `/dir/lookup` endpoint
#[derive(Debug, Clone)]
pub struct DirectoryClient {
    http: reqwest::Client,
    lookup_url: String,
}

impl DirectoryClient {
    /// Build a directory client with its own connection pool
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout()).build()?;
        Ok(Self::with_http(http, config))
    }

    /// Build a directory client on top of an existing (shared) pool
    pub fn with_http(http: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            http,
            lookup_url: config.master_url("/dir/lookup"),
        }
    }

    /// Look up the servers holding `volume`, which may be empty
    pub async fn lookup<V: ToVolumeId>(&self, volume: V) -> Result<LocationSet> {
        let volume_id = volume.to_volume_id()?;
        self.fetch(volume_id).await
    }

    async fn fetch(&self, volume_id: VolumeId) -> Result<LocationSet> {
        tracing::debug!("Looking up volume {} at {}", volume_id, self.lookup_url);

        let response = self
            .http
            .get(&self.lookup_url)
            .query(&[("volumeId", volume_id.get())])
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;
        let locations = parse_locations(&body)?;

        tracing::debug!("Volume {} has {} location(s)", volume_id, locations.len());
        Ok(locations)
    }
}

impl LocationLookup for DirectoryClient {
    async fn lookup(&self, volume_id: VolumeId) -> Result<LocationSet> {
        self.fetch(volume_id).await
    }
}
