//! REST API client for an art service instance.
//!
//! Wraps the four endpoints of the service (image upload, job creation,
//! job status, output download) using [`reqwest`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use artbuilder_core::naming::partial_output_path;
use artbuilder_core::remote_id::RemoteId;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use tokio::io::AsyncWriteExt;

use crate::config::ClientConfig;
use crate::endpoints::Endpoints;
use crate::messages::{ArtJob, CreateArtJobRequest, CreateArtJobResponse, UploadResponse};
use crate::service::ArtService;

/// Multipart field carrying the uploaded image.
const UPLOAD_FIELD: &str = "image";

/// HTTP client for a single art service instance.
pub struct ArtApi {
    client: reqwest::Client,
    endpoints: Endpoints,
    request_timeout: Duration,
}

/// Errors from the art service REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ArtApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Art service error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// Reading the source image or writing the output failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ArtApiError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl ArtApi {
    /// Create a client with default settings.
    ///
    /// * `instance_url` - Base HTTP URL, e.g. `http://host:8000`.
    pub fn new(instance_url: impl Into<String>) -> Self {
        Self::from_config(&ClientConfig::default(), instance_url)
    }

    /// Create a client using the timeouts from `config`.
    pub fn from_config(config: &ClientConfig, instance_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), config, instance_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        config: &ClientConfig,
        instance_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoints: Endpoints::new(instance_url),
            request_timeout: config.request_timeout,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    // ---- private helpers ----

    async fn write_body(
        response: reqwest::Response,
        mut file: tokio::fs::File,
        dest: &Path,
    ) -> Result<u64, ArtApiError> {
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)
                .await
                .map_err(|e| ArtApiError::io(dest, e))?;
            written += chunk.len() as u64;
        }

        file.flush().await.map_err(|e| ArtApiError::io(dest, e))?;
        Ok(written)
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`ArtApiError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ArtApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ArtApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ArtApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

impl ArtService for ArtApi {
    /// Upload the raw bytes of `file` as multipart field `image`.
    ///
    /// Returns the remote image id from the `imgId` response field.
    async fn upload_image(&self, file: &Path, name: &str) -> Result<RemoteId, ArtApiError> {
        let bytes = tokio::fs::read(file)
            .await
            .map_err(|e| ArtApiError::io(file, e))?;
        let size = bytes.len();

        let form = Form::new().part(UPLOAD_FIELD, Part::bytes(bytes).file_name(name.to_string()));

        let response = self
            .client
            .post(self.endpoints.image_upload())
            .timeout(self.request_timeout)
            .multipart(form)
            .send()
            .await?;

        let uploaded: UploadResponse = Self::parse_response(response).await?;
        tracing::debug!(file = %file.display(), size, img_id = %uploaded.img_id, "Image uploaded");
        Ok(uploaded.img_id)
    }

    /// Request a stylization of `image_id` with one style.
    ///
    /// Returns the server-assigned job id.
    async fn create_art_job(
        &self,
        image_id: &RemoteId,
        style_id: &str,
        mixing_level: &str,
    ) -> Result<RemoteId, ArtApiError> {
        let body = CreateArtJobRequest::single(image_id, style_id, mixing_level);

        let response = self
            .client
            .post(self.endpoints.create_art_job())
            .timeout(self.request_timeout)
            .json(&body)
            .send()
            .await?;

        let created: CreateArtJobResponse = Self::parse_response(response).await?;
        Ok(created.job_id)
    }

    /// Fetch the current state of a job.
    async fn query_art_job(&self, job_id: &RemoteId) -> Result<ArtJob, ArtApiError> {
        let response = self
            .client
            .get(self.endpoints.query_art_job(job_id))
            .timeout(self.request_timeout)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Stream an output artifact into `dest`.
    ///
    /// The body is written to a `.part` sibling first and renamed onto
    /// `dest` once complete, so `dest` is only ever replaced by a whole
    /// file. Returns the number of bytes written.
    async fn download_output(
        &self,
        output_id: &RemoteId,
        dest: &Path,
    ) -> Result<u64, ArtApiError> {
        let response = self
            .client
            .get(self.endpoints.output(output_id))
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let partial = partial_output_path(dest);
        let file = tokio::fs::File::create(&partial)
            .await
            .map_err(|e| ArtApiError::io(&partial, e))?;

        let written = match Self::write_body(response, file, &partial).await {
            Ok(written) => written,
            Err(e) => {
                remove_partial(&partial).await;
                return Err(e);
            }
        };

        if let Err(e) = tokio::fs::rename(&partial, dest).await {
            remove_partial(&partial).await;
            return Err(ArtApiError::io(dest, e));
        }
        Ok(written)
    }
}

async fn remove_partial(partial: &Path) {
    if let Err(e) = tokio::fs::remove_file(partial).await {
        tracing::warn!(path = %partial.display(), error = %e, "Failed to remove partial download");
    }
}
