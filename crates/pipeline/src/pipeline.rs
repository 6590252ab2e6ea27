//! The per-image stage sequence: upload, create job, wait, download.

use artbuilder_client::poll::{wait_for_job, PollConfig};
use artbuilder_client::service::ArtService;
use artbuilder_core::naming::output_path;
use artbuilder_core::session::JobSettings;
use artbuilder_core::source_image::{ImageStatus, SourceImage};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::error::PipelineError;
use crate::events::PipelineEvent;

/// Everything a pipeline needs besides the image itself.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub settings: JobSettings,
    pub poll: PollConfig,
}

impl PipelineContext {
    pub fn new(settings: JobSettings, poll: PollConfig) -> Self {
        Self { settings, poll }
    }
}

/// Run one image through the service and save the stylized result.
///
/// The image record is updated in place and an
/// [`PipelineEvent::ImageUpdated`] snapshot is published after every
/// change. On error the image keeps the status of the stage that failed.
pub async fn process_image<S: ArtService>(
    service: &S,
    image: &mut SourceImage,
    ctx: &PipelineContext,
    events: &broadcast::Sender<PipelineEvent>,
    cancel: &CancellationToken,
) -> Result<(), PipelineError> {
    let settings = &ctx.settings;

    image.advance_to(ImageStatus::Uploading);
    publish(events, image);
    let img_id = service
        .upload_image(&image.file, &image.name)
        .await
        .map_err(PipelineError::Upload)?;
    tracing::debug!(image_id = image.id, img_id = %img_id, "Image uploaded");

    image.advance_to(ImageStatus::Rendering);
    publish(events, image);
    let job_id = service
        .create_art_job(&img_id, &settings.style_id, &settings.mixing_level)
        .await
        .map_err(PipelineError::CreateJob)?;
    tracing::info!(image_id = image.id, job_id = %job_id, "Art job created");

    image.job_id = Some(job_id.clone());
    publish(events, image);

    let job = wait_for_job(service, &job_id, &ctx.poll, cancel).await?;
    let (output_id, output_url) = job
        .first_output()
        .ok_or_else(|| PipelineError::MissingOutput {
            job_id: job_id.clone(),
        })?;

    image.url = output_url.map(str::to_string);
    image.advance_to(ImageStatus::Downloading);
    publish(events, image);

    let dest = output_path(
        &settings.output_folder,
        &settings.style_id,
        &settings.mixing_level,
        &image.name,
    );
    let bytes = service
        .download_output(output_id, &dest)
        .await
        .map_err(PipelineError::Download)?;
    tracing::info!(image_id = image.id, path = %dest.display(), bytes, "Output saved");

    image.path = Some(dest);
    image.advance_to(ImageStatus::Done);
    publish(events, image);

    Ok(())
}

fn publish(events: &broadcast::Sender<PipelineEvent>, image: &SourceImage) {
    // No subscribers is fine; the batch still runs headless.
    let _ = events.send(PipelineEvent::ImageUpdated {
        image: image.clone(),
    });
}
