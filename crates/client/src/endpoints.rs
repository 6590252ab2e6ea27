//! REST endpoint URLs of an art service instance.
//!
//! Every URL is the user-supplied instance URL with a fixed suffix appended.
//! The base is not normalised, so a trailing slash on it is kept.

use artbuilder_core::remote_id::RemoteId;

/// URL builder for one art service instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    /// * `instance_url` - Base HTTP URL, e.g. `http://host:8000`.
    pub fn new(instance_url: impl Into<String>) -> Self {
        Self {
            base: instance_url.into(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// `POST` target for multipart image uploads.
    pub fn image_upload(&self) -> String {
        format!("{}/api/v1/image", self.base)
    }

    /// `POST` target for creating a stylization job.
    pub fn create_art_job(&self) -> String {
        format!("{}/api/v1/art/", self.base)
    }

    /// `GET` target for the status of `job_id`.
    pub fn query_art_job(&self, job_id: &RemoteId) -> String {
        format!("{}/api/v1/art/{}", self.base, job_id)
    }

    /// `GET` target for the rendered artifact `output_id`.
    pub fn output(&self, output_id: &RemoteId) -> String {
        format!("{}/api/v1/art/output/{}", self.base, output_id)
    }
}
