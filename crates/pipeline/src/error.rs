use artbuilder_client::api::ArtApiError;
use artbuilder_client::poll::PollError;
use artbuilder_core::remote_id::RemoteId;

/// Why the pipeline of one image stopped before `DONE`.
///
/// The variant names the stage that failed.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Upload failed: {0}")]
    Upload(#[source] ArtApiError),

    #[error("Creating art job failed: {0}")]
    CreateJob(#[source] ArtApiError),

    #[error(transparent)]
    Poll(#[from] PollError),

    /// The job finished but listed no output to download.
    #[error("Art job {job_id} finished without any output")]
    MissingOutput { job_id: RemoteId },

    #[error("Download failed: {0}")]
    Download(#[source] ArtApiError),

    #[error("Batch cancelled")]
    Cancelled,
}

impl PipelineError {
    /// True when the pipeline stopped because the batch was cancelled
    /// rather than because something failed.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            PipelineError::Cancelled | PipelineError::Poll(PollError::Cancelled(_))
        )
    }
}
