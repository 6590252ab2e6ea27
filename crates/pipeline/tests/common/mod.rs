#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use artbuilder_client::api::ArtApiError;
use artbuilder_client::messages::ArtJob;
use artbuilder_client::poll::PollConfig;
use artbuilder_client::service::ArtService;
use artbuilder_core::naming::partial_output_path;
use artbuilder_core::remote_id::RemoteId;
use artbuilder_core::session::JobSettings;
use artbuilder_core::source_image::SourceImage;
use artbuilder_pipeline::events::PipelineEvent;
use artbuilder_pipeline::pipeline::PipelineContext;
use axum::extract::{Multipart, Path as UrlPath, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::broadcast;
use tokio::time::Instant;

// ---------------------------------------------------------------------------
// Scripted service
// ---------------------------------------------------------------------------

/// One call made against [`FakeArtService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: &'static str,
    /// The source image name the call belongs to.
    pub image: String,
    pub at: Instant,
}

/// In-memory art service keyed by image name.
///
/// Remote ids are derived from the image name (`img-cat.png`,
/// `job-cat.png`, `out-cat.png`) so every call can be traced back to the
/// image it belongs to. Each call takes `latency` of (virtual) time.
#[derive(Default)]
pub struct FakeArtService {
    pub latency: Duration,
    /// Number of non-finished answers before a job reports `finished`.
    pub pending_polls: usize,
    pub fail_upload: HashSet<String>,
    pub fail_query: HashSet<String>,
    /// Jobs that finish without listing any output.
    pub no_output: HashSet<String>,
    /// Jobs that never finish.
    pub stuck: HashSet<String>,
    /// When set, downloads write a partial file and then hang this long.
    pub download_stall: Option<Duration>,
    pub calls: Mutex<Vec<Call>>,
    pub polls: Mutex<HashMap<String, usize>>,
}

impl FakeArtService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn ops_for(&self, image: &str) -> Vec<&'static str> {
        self.calls()
            .into_iter()
            .filter(|c| c.image == image)
            .map(|c| c.op)
            .collect()
    }

    async fn record(&self, op: &'static str, image: &str) {
        tokio::time::sleep(self.latency).await;
        self.calls.lock().unwrap().push(Call {
            op,
            image: image.to_string(),
            at: Instant::now(),
        });
    }
}

fn strip(id: &RemoteId, prefix: &str) -> String {
    id.to_string()
        .strip_prefix(prefix)
        .unwrap_or_default()
        .to_string()
}

fn server_error() -> ArtApiError {
    ArtApiError::ApiError {
        status: 500,
        body: "boom".into(),
    }
}

impl ArtService for FakeArtService {
    async fn upload_image(&self, _file: &Path, name: &str) -> Result<RemoteId, ArtApiError> {
        self.record("upload", name).await;
        if self.fail_upload.contains(name) {
            return Err(server_error());
        }
        Ok(RemoteId::new(format!("img-{name}")))
    }

    async fn create_art_job(
        &self,
        image_id: &RemoteId,
        _style_id: &str,
        _mixing_level: &str,
    ) -> Result<RemoteId, ArtApiError> {
        let name = strip(image_id, "img-");
        self.record("create", &name).await;
        Ok(RemoteId::new(format!("job-{name}")))
    }

    async fn query_art_job(&self, job_id: &RemoteId) -> Result<ArtJob, ArtApiError> {
        let name = strip(job_id, "job-");
        self.record("query", &name).await;
        if self.fail_query.contains(&name) {
            return Err(server_error());
        }

        let seen = {
            let mut polls = self.polls.lock().unwrap();
            let count = polls.entry(name.clone()).or_default();
            *count += 1;
            *count
        };
        if self.stuck.contains(&name) || seen <= self.pending_polls {
            return Ok(ArtJob {
                status: "processing".into(),
                output_urls: Vec::new(),
                output_ids: Vec::new(),
            });
        }
        if self.no_output.contains(&name) {
            return Ok(ArtJob {
                status: "finished".into(),
                output_urls: Vec::new(),
                output_ids: Vec::new(),
            });
        }
        Ok(ArtJob {
            status: "finished".into(),
            output_urls: vec![format!("http://cdn.local/{name}")],
            output_ids: vec![RemoteId::new(format!("out-{name}"))],
        })
    }

    async fn download_output(&self, output_id: &RemoteId, dest: &Path) -> Result<u64, ArtApiError> {
        let name = strip(output_id, "out-");
        self.record("download", &name).await;
        if let Some(stall) = self.download_stall {
            std::fs::write(partial_output_path(dest), b"half").unwrap();
            tokio::time::sleep(stall).await;
        }
        Ok(0)
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn settings(output_folder: impl Into<PathBuf>) -> JobSettings {
    JobSettings {
        output_folder: output_folder.into(),
        style_id: "vangogh".into(),
        mixing_level: "50".into(),
    }
}

pub fn context(output_folder: impl Into<PathBuf>, interval: Duration) -> PipelineContext {
    PipelineContext::new(
        settings(output_folder),
        PollConfig {
            interval,
            timeout: None,
        },
    )
}

/// Images with ids starting at 1, one per file path.
pub fn images(files: &[&str]) -> Vec<SourceImage> {
    files
        .iter()
        .enumerate()
        .map(|(i, f)| SourceImage::new(i as u64 + 1, *f))
        .collect()
}

/// Collect every event already sent on `rx`.
pub fn drain(rx: &mut broadcast::Receiver<PipelineEvent>) -> Vec<PipelineEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

// ---------------------------------------------------------------------------
// HTTP backend
// ---------------------------------------------------------------------------

/// Requests seen by the HTTP backend.
#[derive(Default)]
pub struct Backend {
    pub uploads: Vec<String>,
    pub job_requests: Vec<Value>,
    /// Job ids whose status query returns a server error.
    pub failing_jobs: HashSet<String>,
}

pub type SharedBackend = Arc<Mutex<Backend>>;

async fn upload(State(state): State<SharedBackend>, mut multipart: Multipart) -> Json<Value> {
    let mut name = String::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        name = field.file_name().unwrap_or_default().to_string();
        let _ = field.bytes().await.unwrap();
    }
    let mut state = state.lock().unwrap();
    state.uploads.push(name);
    Json(json!({ "imgId": state.uploads.len() }))
}

async fn create_job(State(state): State<SharedBackend>, Json(body): Json<Value>) -> Json<Value> {
    let img_id = body["imgId"].clone();
    state.lock().unwrap().job_requests.push(body);
    Json(json!({ "jobId": format!("job-{img_id}") }))
}

async fn query_job(
    State(state): State<SharedBackend>,
    UrlPath(job_id): UrlPath<String>,
) -> Result<Json<Value>, (StatusCode, &'static str)> {
    if state.lock().unwrap().failing_jobs.contains(&job_id) {
        return Err((StatusCode::INTERNAL_SERVER_ERROR, "render crashed"));
    }
    Ok(Json(json!({
        "status": "finished",
        "outputUrls": [format!("http://cdn.local/{job_id}.png")],
        "outputIds": [format!("out-{job_id}")],
    })))
}

async fn output(UrlPath(output_id): UrlPath<String>) -> Vec<u8> {
    format!("art:{output_id}").into_bytes()
}

/// Start an in-process art service and return its base URL.
pub async fn spawn_backend(failing_jobs: &[&str]) -> (String, SharedBackend) {
    let state = SharedBackend::default();
    state.lock().unwrap().failing_jobs = failing_jobs.iter().map(|j| j.to_string()).collect();

    let router = Router::new()
        .route("/api/v1/image", post(upload))
        .route("/api/v1/art/", post(create_job))
        .route("/api/v1/art/{job_id}", get(query_job))
        .route("/api/v1/art/output/{output_id}", get(output))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{addr}"), state)
}
