use std::future::Future;
use std::path::Path;

use artbuilder_core::remote_id::RemoteId;

use crate::api::ArtApiError;
use crate::messages::ArtJob;

/// Operations the per-image pipeline needs from an art service.
///
/// [`ArtApi`](crate::api::ArtApi) implements this over HTTP. The pipeline
/// is generic over it so batches can run against any backend.
pub trait ArtService: Send + Sync {
    /// Upload the bytes of `file`, returning the remote image id.
    fn upload_image(
        &self,
        file: &Path,
        name: &str,
    ) -> impl Future<Output = Result<RemoteId, ArtApiError>> + Send;

    /// Create a stylization job, returning its id.
    fn create_art_job(
        &self,
        image_id: &RemoteId,
        style_id: &str,
        mixing_level: &str,
    ) -> impl Future<Output = Result<RemoteId, ArtApiError>> + Send;

    /// Fetch the current state of a job.
    fn query_art_job(
        &self,
        job_id: &RemoteId,
    ) -> impl Future<Output = Result<ArtJob, ArtApiError>> + Send;

    /// Write the output artifact to `dest`, returning the bytes written.
    ///
    /// An existing `dest` is only replaced once the whole artifact has been
    /// received; an interrupted transfer leaves at most a
    /// [`partial_output_path`](artbuilder_core::naming::partial_output_path)
    /// file behind.
    fn download_output(
        &self,
        output_id: &RemoteId,
        dest: &Path,
    ) -> impl Future<Output = Result<u64, ArtApiError>> + Send;
}
