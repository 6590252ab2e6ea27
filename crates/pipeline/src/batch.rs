//! Sequential batch runner.
//!
//! [`BatchRunner`] takes the current selection of source images and drives
//! them through [`process_image`] one at a time on a background task. The
//! next image starts only after the previous one finished or failed, so at
//! most one image is in flight.
//!
//! Progress is broadcast via a [`tokio::sync::broadcast`] channel. Call
//! [`BatchRunner::subscribe`] before [`BatchRunner::start`] to see every
//! event of the batch.

use std::collections::VecDeque;
use std::sync::Arc;

use artbuilder_client::service::ArtService;
use artbuilder_core::naming::{output_path, partial_output_path};
use artbuilder_core::source_image::{ImageStatus, SourceImage};
use artbuilder_core::types::ImageId;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::PipelineError;
use crate::events::PipelineEvent;
use crate::pipeline::{process_image, PipelineContext};

/// Broadcast channel capacity for pipeline events.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// An image whose pipeline stopped on an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFailure {
    pub image_id: ImageId,
    pub error: String,
}

/// Outcome of a whole batch.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Every image of the batch in submission order, in its final state.
    pub images: Vec<SourceImage>,
    pub failures: Vec<ImageFailure>,
    /// True when the batch stopped early because it was cancelled.
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    pub fn done_count(&self) -> usize {
        self.images.iter().filter(|img| img.is_done()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    /// True when every image reached `DONE`.
    pub fn is_success(&self) -> bool {
        !self.cancelled && self.failures.is_empty()
    }
}

/// Drives batches of images through the art service.
pub struct BatchRunner<S> {
    service: Arc<S>,
    ctx: Arc<PipelineContext>,
    event_tx: broadcast::Sender<PipelineEvent>,
}

impl<S: ArtService + 'static> BatchRunner<S> {
    pub fn new(service: S, ctx: PipelineContext) -> Self {
        Self::with_shared(Arc::new(service), ctx)
    }

    /// Runner over a service that is also used elsewhere.
    pub fn with_shared(service: Arc<S>, ctx: PipelineContext) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            service,
            ctx: Arc::new(ctx),
            event_tx,
        }
    }

    /// Subscribe to pipeline events.
    pub fn subscribe(&self) -> broadcast::Receiver<PipelineEvent> {
        self.event_tx.subscribe()
    }

    /// Spawn a worker task that processes `images` in order.
    ///
    /// Cancelling `cancel` (or calling [`BatchHandle::cancel`]) aborts the
    /// image in flight and leaves the rest of the queue `PENDING`.
    pub fn start(&self, images: Vec<SourceImage>, cancel: CancellationToken) -> BatchHandle {
        let service = Arc::clone(&self.service);
        let ctx = Arc::clone(&self.ctx);
        let event_tx = self.event_tx.clone();
        let task_cancel = cancel.clone();

        let task = tokio::spawn(async move {
            run_batch(service.as_ref(), &ctx, images, &event_tx, &task_cancel).await
        });

        BatchHandle { task, cancel }
    }
}

/// Handle to a running batch.
pub struct BatchHandle {
    task: JoinHandle<BatchReport>,
    cancel: CancellationToken,
}

impl BatchHandle {
    /// Ask the worker to stop after aborting the image in flight.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the worker to finish and return its report.
    pub async fn join(self) -> Result<BatchReport, tokio::task::JoinError> {
        self.task.await
    }
}

/// Process `images` strictly one after another and report the outcome.
///
/// A failed image does not stop the batch: the error is logged and
/// published, and the worker moves on to the next queued image.
pub async fn run_batch<S: ArtService>(
    service: &S,
    ctx: &PipelineContext,
    images: Vec<SourceImage>,
    events: &broadcast::Sender<PipelineEvent>,
    cancel: &CancellationToken,
) -> BatchReport {
    let started_at = Utc::now();
    let mut queue: VecDeque<SourceImage> = images.into();
    let mut processed = Vec::with_capacity(queue.len());
    let mut failures = Vec::new();
    let mut cancelled = false;

    tracing::info!(total = queue.len(), "Batch started");
    let _ = events.send(PipelineEvent::BatchStarted { total: queue.len() });

    while !cancel.is_cancelled() {
        let Some(mut image) = queue.pop_front() else {
            break;
        };

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(PipelineError::Cancelled),
            result = process_image(service, &mut image, ctx, events, cancel) => result,
        };

        match outcome {
            Ok(()) => {}
            Err(e) if e.is_cancelled() => {
                tracing::warn!(image_id = image.id, name = %image.name, "Image aborted by cancellation");
                discard_partial_output(&image, ctx).await;
                cancelled = true;
            }
            Err(e) => {
                tracing::error!(image_id = image.id, name = %image.name, error = %e, "Image pipeline failed");
                let error = e.to_string();
                let _ = events.send(PipelineEvent::ImageFailed {
                    image_id: image.id,
                    error: error.clone(),
                });
                failures.push(ImageFailure {
                    image_id: image.id,
                    error,
                });
            }
        }

        processed.push(image);
    }

    if !queue.is_empty() {
        cancelled = true;
        tracing::info!(remaining = queue.len(), "Batch cancelled with images still queued");
    }
    processed.extend(queue);

    let report = BatchReport {
        images: processed,
        failures,
        cancelled,
        started_at,
        finished_at: Utc::now(),
    };

    tracing::info!(
        done = report.done_count(),
        failed = report.failed_count(),
        cancelled,
        "Batch finished",
    );
    let _ = events.send(PipelineEvent::BatchFinished {
        done: report.done_count(),
        failed: report.failed_count(),
        cancelled,
    });

    report
}

/// Remove the `.part` file of a download that was cut short.
///
/// The final output path is never touched here: a download only replaces
/// it once the whole body has been written.
async fn discard_partial_output(image: &SourceImage, ctx: &PipelineContext) {
    if image.status != ImageStatus::Downloading {
        return;
    }
    let settings = &ctx.settings;
    let partial = partial_output_path(&output_path(
        &settings.output_folder,
        &settings.style_id,
        &settings.mixing_level,
        &image.name,
    ));
    match tokio::fs::remove_file(&partial).await {
        Ok(()) => tracing::debug!(path = %partial.display(), "Removed partial output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %partial.display(), error = %e, "Failed to remove partial output"),
    }
}
