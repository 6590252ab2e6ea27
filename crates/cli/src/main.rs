//! `artbuilder` -- stylize a batch of images with a remote art service.
//!
//! Uploads each image, starts a style-transfer job, waits for it to finish
//! and saves the result into the output folder, one image at a time.
//!
//! # Environment variables
//!
//! | Variable                   | Required | Default        | Description                        |
//! |----------------------------|----------|----------------|------------------------------------|
//! | `ARTBUILDER_INSTANCE_URL`  | yes      | --             | Base URL of the art service        |
//! | `ARTBUILDER_OUTPUT_FOLDER` | yes      | --             | Where stylized images are written  |
//! | `ARTBUILDER_STYLE`         | yes      | --             | Style id from the styles directory |
//! | `ARTBUILDER_MIXING_LEVEL`  | yes      | --             | Style strength                     |
//! | `ARTBUILDER_STYLES_DIR`    | no       | `style-images` | Directory of style images          |
//! | `REQUEST_TIMEOUT_SECS`     | no       | `30`           | Timeout for API calls              |
//! | `POLL_INTERVAL_MS`         | no       | `3000`         | Delay between job status queries   |
//! | `POLL_TIMEOUT_SECS`        | no       | --             | Give up waiting on a job after this |
//!
//! Every `ARTBUILDER_*` variable can also be passed as a flag.

use std::process::ExitCode;

use artbuilder::app;
use artbuilder::args::Args;
use artbuilder_client::config::ClientConfig;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries the status table.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "artbuilder=info,artbuilder_pipeline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let client = ClientConfig::from_env()?;

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling batch");
            interrupt.cancel();
        }
    });

    let outcome = app::run(&args, &client, cancel, &mut std::io::stdout()).await?;
    Ok(ExitCode::from(outcome.exit_code()))
}
