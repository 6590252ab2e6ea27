use std::path::PathBuf;

use artbuilder_core::session::SessionConfig;
use clap::Parser;

/// Directory scanned for style images when `--styles-dir` is not given.
pub const DEFAULT_STYLES_DIR: &str = "style-images";

#[derive(Debug, Parser)]
#[command(name = "artbuilder")]
#[command(about = "Apply an art style to a batch of images using a remote style-transfer service")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Source images to stylize, processed in the order given.
    pub images: Vec<PathBuf>,

    /// Base URL of the art service, e.g. `http://gpu-box:8000`.
    #[arg(long, env = "ARTBUILDER_INSTANCE_URL")]
    pub instance_url: Option<String>,

    /// Folder the stylized images are written to.
    #[arg(long, env = "ARTBUILDER_OUTPUT_FOLDER")]
    pub output_folder: Option<PathBuf>,

    /// Style id (style file name without extension).
    #[arg(long, env = "ARTBUILDER_STYLE")]
    pub style: Option<String>,

    /// Style strength, passed to the service as typed.
    #[arg(long, env = "ARTBUILDER_MIXING_LEVEL")]
    pub mixing_level: Option<String>,

    #[arg(long, env = "ARTBUILDER_STYLES_DIR", default_value = DEFAULT_STYLES_DIR)]
    pub styles_dir: PathBuf,

    /// Print the available styles and exit.
    #[arg(long)]
    pub list_styles: bool,

    /// Print pipeline events as JSON lines instead of the status table.
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Session inputs as entered. The style is only kept once it has been
    /// matched against the catalog.
    pub fn session_config(&self, selected_style: Option<&str>) -> SessionConfig {
        SessionConfig {
            instance_url: self.instance_url.clone().unwrap_or_default(),
            output_folder: self.output_folder.clone(),
            style_id: selected_style.map(str::to_string),
            mixing_level: self.mixing_level.clone().unwrap_or_default(),
        }
    }
}
