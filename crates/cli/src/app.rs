//! One submission: select, validate, run the batch, report.

use std::io::Write;

use artbuilder_client::api::ArtApi;
use artbuilder_client::config::ClientConfig;
use artbuilder_core::catalog::StyleCatalog;
use artbuilder_core::error::CoreError;
use artbuilder_core::registry::SourceImageRegistry;
use artbuilder_core::session::validate_submission;
use artbuilder_pipeline::batch::{BatchReport, BatchRunner};
use artbuilder_pipeline::events::PipelineEvent;
use artbuilder_pipeline::pipeline::PipelineContext;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use crate::args::Args;
use crate::view::{format_catalog, StatusView};

/// Exit code when the submission was rejected before any network activity.
pub const EXIT_INVALID: u8 = 2;
/// Exit code when at least one image failed.
pub const EXIT_FAILED: u8 = 1;
/// Exit code when the batch was interrupted.
pub const EXIT_CANCELLED: u8 = 130;

/// How a run ended.
#[derive(Debug)]
pub enum Outcome {
    StylesListed,
    Invalid(Vec<String>),
    Finished(BatchReport),
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::StylesListed => 0,
            Outcome::Invalid(_) => EXIT_INVALID,
            Outcome::Finished(report) if report.cancelled => EXIT_CANCELLED,
            Outcome::Finished(report) if !report.failures.is_empty() => EXIT_FAILED,
            Outcome::Finished(_) => 0,
        }
    }
}

/// Run one submission and write progress to `out`.
pub async fn run<W: Write>(
    args: &Args,
    client: &ClientConfig,
    cancel: CancellationToken,
    out: &mut W,
) -> anyhow::Result<Outcome> {
    let mut catalog = StyleCatalog::load(&args.styles_dir);
    if args.list_styles {
        write!(out, "{}", format_catalog(&catalog))?;
        return Ok(Outcome::StylesListed);
    }

    let mut view = StatusView::new();

    if let Some(style) = args.style.as_deref().filter(|s| !s.trim().is_empty()) {
        if let Err(e) = catalog.select(style) {
            view.errors.add(e.to_string());
        }
    }

    let mut registry = SourceImageRegistry::new();
    registry.replace_selection(&args.images);

    let session = args.session_config(catalog.selected());
    let settings = match validate_submission(registry.images(), &session) {
        Ok(settings) if view.errors.is_empty() => settings,
        Ok(_) => return reject(view, out),
        Err(CoreError::Validation(messages)) => {
            for message in messages {
                view.errors.add(message);
            }
            return reject(view, out);
        }
        Err(e) => return Err(e.into()),
    };

    let api = ArtApi::from_config(client, session.instance_url.clone());
    tracing::info!(
        instance_url = %api.endpoints().base(),
        style_id = %settings.style_id,
        mixing_level = %settings.mixing_level,
        images = registry.len(),
        "Starting batch",
    );

    let runner = BatchRunner::new(api, PipelineContext::new(settings, client.poll.clone()));
    let mut events = runner.subscribe();

    let images = registry.take_images();
    view.show(&images);
    if !args.json {
        write!(out, "{view}")?;
    }

    let handle = runner.start(images, cancel);
    loop {
        match events.recv().await {
            Ok(event) => {
                let finished = matches!(event, PipelineEvent::BatchFinished { .. });
                if args.json {
                    writeln!(out, "{}", serde_json::to_string(&event)?)?;
                    view.apply(&event);
                } else if let Some(line) = view.apply(&event) {
                    writeln!(out, "{line}")?;
                }
                if finished {
                    break;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Status view fell behind pipeline events");
            }
            Err(RecvError::Closed) => break,
        }
    }

    let report = handle.join().await?;
    view.sync(&report.images);
    if !args.json {
        write!(out, "{view}")?;
    }
    let elapsed = report.finished_at - report.started_at;
    tracing::info!(
        done = report.done_count(),
        failed = report.failed_count(),
        elapsed_ms = elapsed.num_milliseconds(),
        "Batch complete",
    );

    Ok(Outcome::Finished(report))
}

fn reject<W: Write>(view: StatusView, out: &mut W) -> anyhow::Result<Outcome> {
    write!(out, "{}", view.errors)?;
    Ok(Outcome::Invalid(view.errors.messages().to_vec()))
}
