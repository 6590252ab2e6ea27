//! JSON bodies exchanged with the art service.
//!
//! The service uses camelCase field names (`imgId`, `jobId`, `outputIds`).
//! Ids may arrive as strings or integers; see [`RemoteId`].

use artbuilder_core::remote_id::RemoteId;
use serde::{Deserialize, Serialize};

/// Job status reported once all outputs are rendered.
pub const JOB_STATUS_FINISHED: &str = "finished";

/// Response of `POST /api/v1/image`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub img_id: RemoteId,
}

/// Body of `POST /api/v1/art/`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArtJobRequest<'a> {
    pub img_id: &'a RemoteId,
    pub styles: Vec<StyleRequest<'a>>,
}

/// One style to apply, with its strength.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRequest<'a> {
    pub id: &'a str,
    /// Sent exactly as the user typed it.
    pub mixing_level: &'a str,
}

impl<'a> CreateArtJobRequest<'a> {
    /// Request for a single style applied to one uploaded image.
    pub fn single(img_id: &'a RemoteId, style_id: &'a str, mixing_level: &'a str) -> Self {
        Self {
            img_id,
            styles: vec![StyleRequest {
                id: style_id,
                mixing_level,
            }],
        }
    }
}

/// Response of `POST /api/v1/art/`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArtJobResponse {
    pub job_id: RemoteId,
}

/// Response of `GET /api/v1/art/{jobId}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtJob {
    pub status: String,
    #[serde(default)]
    pub output_urls: Vec<String>,
    #[serde(default)]
    pub output_ids: Vec<RemoteId>,
}

impl ArtJob {
    pub fn is_finished(&self) -> bool {
        self.status == JOB_STATUS_FINISHED
    }

    /// The first output artifact, which is the one that gets downloaded.
    pub fn first_output(&self) -> Option<(&RemoteId, Option<&str>)> {
        let id = self.output_ids.first()?;
        Some((id, self.output_urls.first().map(String::as_str)))
    }
}
