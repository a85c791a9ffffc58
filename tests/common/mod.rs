//! In-process fake master + volume server for integration tests

#![allow(dead_code)]

use axum::{
    extract::{Multipart, Path, Query, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use miniweed::ClientConfig;
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Volume ids with canned failure behavior
pub const VOLUME_NOT_FOUND: u32 = 404;
pub const VOLUME_MALFORMED: u32 = 500;
pub const VOLUME_SLOW: u32 = 408;

/// File id handed out by `/dir/assign`
pub const ASSIGNED_FID: &str = "5,0a1b2c3d";

/// Collection for which `/dir/assign` reports an error
pub const FULL_COLLECTION: &str = "full";

/// Collection whose assigned fid gets an upload reply without `size`
pub const SIZELESS_COLLECTION: &str = "sizeless";
pub const SIZELESS_FID: &str = "6,5151";

/// Collection assigned a fid with a zero-padded volume id
pub const PADDED_COLLECTION: &str = "padded";
pub const PADDED_FID: &str = "07,0abc";

#[derive(Clone)]
pub struct FakeCluster {
    inner: Arc<Inner>,
}

struct Inner {
    addr: SocketAddr,
    volumes: Mutex<HashMap<u32, Vec<String>>>,
    files: Mutex<HashMap<String, Vec<u8>>>,
    master_calls: Mutex<Vec<String>>,
    lookups: AtomicUsize,
}

impl FakeCluster {
    /// Start the fake cluster on an ephemeral port
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let cluster = FakeCluster {
            inner: Arc::new(Inner {
                addr: listener.local_addr().unwrap(),
                volumes: Mutex::new(HashMap::new()),
                files: Mutex::new(HashMap::new()),
                master_calls: Mutex::new(Vec::new()),
                lookups: AtomicUsize::new(0),
            }),
        };

        let app = Router::new()
            .route("/dir/lookup", get(lookup))
            .route("/dir/assign", get(assign))
            .route("/col/delete", get(record_master_call))
            .route("/vol/grow", get(record_master_call))
            .route("/:fid", get(read_file).post(write_file))
            .with_state(cluster.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        cluster
    }

    /// `host:port` this fake listens on, usable as a volume server public URL
    pub fn public_url(&self) -> String {
        self.inner.addr.to_string()
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::with_master(self.inner.addr.ip().to_string(), self.inner.addr.port())
    }

    pub fn add_volume<S: AsRef<str>>(&self, id: u32, locations: &[S]) {
        self.inner
            .volumes
            .lock()
            .unwrap()
            .insert(id, locations.iter().map(|l| l.as_ref().to_string()).collect());
    }

    pub fn add_file(&self, fid: &str, data: &[u8]) {
        self.inner
            .files
            .lock()
            .unwrap()
            .insert(fid.to_string(), data.to_vec());
    }

    pub fn file(&self, fid: &str) -> Option<Vec<u8>> {
        self.inner.files.lock().unwrap().get(fid).cloned()
    }

    pub fn lookups(&self) -> usize {
        self.inner.lookups.load(Ordering::SeqCst)
    }

    /// Master calls other than lookups, as `path?query`
    pub fn master_calls(&self) -> Vec<String> {
        self.inner.master_calls.lock().unwrap().clone()
    }
}

async fn lookup(
    State(cluster): State<FakeCluster>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    cluster.inner.lookups.fetch_add(1, Ordering::SeqCst);

    let Some(id) = params.get("volumeId").and_then(|v| v.parse::<u32>().ok()) else {
        return (StatusCode::BAD_REQUEST, "bad volumeId").into_response();
    };

    match id {
        VOLUME_NOT_FOUND => (StatusCode::NOT_FOUND, "volume not found").into_response(),
        VOLUME_MALFORMED => "<html>oops</html>".into_response(),
        VOLUME_SLOW => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({ "locations": [] })).into_response()
        }
        _ => {
            let locations: Vec<_> = cluster
                .inner
                .volumes
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .map(|public_url| json!({ "url": public_url, "publicUrl": public_url }))
                .collect();
            Json(json!({ "volumeId": id.to_string(), "locations": locations })).into_response()
        }
    }
}

async fn assign(
    State(cluster): State<FakeCluster>,
    Query(params): Query<HashMap<String, String>>,
    uri: axum::http::Uri,
) -> Response {
    cluster.inner.master_calls.lock().unwrap().push(uri.to_string());

    let fid = match params.get("collection").map(String::as_str) {
        Some(FULL_COLLECTION) => {
            return Json(json!({ "error": "no free volumes left" })).into_response()
        }
        Some(SIZELESS_COLLECTION) => SIZELESS_FID,
        Some(PADDED_COLLECTION) => PADDED_FID,
        _ => ASSIGNED_FID,
    };
    let public_url = cluster.public_url();
    Json(json!({
        "fid": fid,
        "url": public_url,
        "publicUrl": public_url,
        "count": 1
    }))
    .into_response()
}

async fn record_master_call(
    State(cluster): State<FakeCluster>,
    uri: axum::http::Uri,
) -> StatusCode {
    cluster.inner.master_calls.lock().unwrap().push(uri.to_string());
    StatusCode::OK
}

async fn read_file(
    State(cluster): State<FakeCluster>,
    Path(fid): Path<String>,
    RawQuery(query): RawQuery,
) -> Response {
    if let Some(base) = fid.strip_suffix(".jpg") {
        if cluster.file(base).is_some() {
            let query = query.unwrap_or_default();
            return format!("thumbnail {}?{}", base, query).into_response();
        }
    }
    match cluster.file(&fid) {
        Some(data) => data.into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn write_file(
    State(cluster): State<FakeCluster>,
    Path(fid): Path<String>,
    mut multipart: Multipart,
) -> Response {
    let Ok(Some(field)) = multipart.next_field().await else {
        return Json(json!({ "error": "no file part" })).into_response();
    };
    let name = field.file_name().unwrap_or_default().to_string();
    let data = field.bytes().await.unwrap();
    let size = data.len();
    cluster.add_file(&fid, &data);
    if fid == SIZELESS_FID {
        return Json(json!({ "name": name })).into_response();
    }
    Json(json!({ "name": name, "size": size })).into_response()
}
