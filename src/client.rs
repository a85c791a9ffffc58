//! File operations against the cluster
//!
//! Reads go through the volume location cache; uploads ask the master for
//! an assignment first. One pooled HTTP client is shared by the master
//! lookups and the volume server calls.

use crate::common::{ClientConfig, Error, FileId, Result, ToVolumeId};
use crate::location::{DirectoryClient, VolumeLocationCache};
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;

/// Master reply to `/dir/assign`
#[derive(Debug, Deserialize)]
struct AssignResponse {
    fid: Option<String>,
    #[serde(rename = "publicUrl")]
    public_url: Option<String>,
    error: Option<String>,
}

/// Client for a master and its volume servers
pub struct WeedFs {
    config: ClientConfig,
    http: reqwest::Client,
    locations: Arc<VolumeLocationCache>,
}

impl WeedFs {
    /// Validates `config`, then builds the shared HTTP pool and location cache
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder().timeout(config.timeout()).build()?;
        let directory = DirectoryClient::with_http(http.clone(), config);

        Ok(Self {
            locations: Arc::new(VolumeLocationCache::new(directory)),
            http,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The location cache, for sharing with other components
    pub fn locations(&self) -> &Arc<VolumeLocationCache> {
        &self.locations
    }

    /// Pick a volume server for `volume`
    pub async fn locate<V: ToVolumeId>(&self, volume: V) -> Result<String> {
        self.locations.resolve(volume).await
    }

    /// Read a file. `thumbnail` asks the volume server for a square JPEG.
    pub async fn get(&self, fid: &str, thumbnail: Option<NonZeroU32>) -> Result<Bytes> {
        let fid: FileId = fid.parse()?;
        let server = self.locations.resolve(fid.volume_id()).await?;

        let mut url = format!("http://{}/{}", server, fid);
        if let Some(size) = thumbnail {
            url.push_str(&format!(".jpg?height={0}&width={0}", size));
        }

        tracing::debug!("GET {}", url);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(Error::Fetch {
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?)
    }

    /// Upload a file, returning the file id assigned by the master
    pub async fn put(
        &self,
        data: Vec<u8>,
        name: &str,
        collection: Option<&str>,
    ) -> Result<FileId> {
        let mut query = Vec::new();
        if let Some(collection) = collection {
            validate_collection(collection)?;
            query.push(("collection", collection.to_string()));
        }
        let body = self.master_get("/dir/assign", &query).await?;
        let assign: AssignResponse = serde_json::from_slice(&body)?;
        if let Some(error) = assign.error {
            return Err(Error::Assign(error));
        }
        let (Some(fid), Some(public_url)) = (assign.fid, assign.public_url) else {
            return Err(Error::Assign("response is missing fid or publicUrl".into()));
        };
        let file_id: FileId = fid.parse()?;

        // Post to the fid exactly as the master spelled it
        let url = format!("http://{}/{}", public_url, fid);
        tracing::debug!("POST {} ({} bytes)", url, data.len());
        let form = Form::new().part(
            name.to_string(),
            Part::bytes(data).file_name(name.to_string()),
        );
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let reply: serde_json::Value = serde_json::from_slice(&response.bytes().await?)?;
        if reply.get("size").is_none() {
            return Err(Error::Upload(format!("unknown response: {}", reply)));
        }

        tracing::info!("Stored {} as {}", name, fid);
        Ok(file_id)
    }

    /// Delete a collection and all its volumes
    pub async fn drop_collection(&self, collection: &str) -> Result<()> {
        validate_collection(collection)?;
        self.master_get("/col/delete", &[("collection", collection.to_string())])
            .await?;
        tracing::info!("Dropped collection {}", collection);
        Ok(())
    }

    /// Ask the master to allocate `count` more volumes for a collection
    pub async fn grow_collection(&self, collection: &str, count: NonZeroU32) -> Result<()> {
        validate_collection(collection)?;
        self.master_get(
            "/vol/grow",
            &[
                ("collection", collection.to_string()),
                ("count", count.to_string()),
            ],
        )
        .await?;
        tracing::info!("Grew collection {} by {} volume(s)", collection, count);
        Ok(())
    }

    async fn master_get(&self, path: &str, query: &[(&str, String)]) -> Result<Bytes> {
        let url = self.config.master_url(path);
        tracing::debug!("GET {} {:?}", url, query);
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.bytes().await?)
    }
}

impl fmt::Display for WeedFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<WeedFs {}>", self.config.master_endpoint())
    }
}

fn validate_collection(collection: &str) -> Result<()> {
    if collection.is_empty() {
        return Err(Error::InvalidArgument("collection cannot be empty".into()));
    }
    Ok(())
}
