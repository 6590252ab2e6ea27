//! Terminal status view driven by pipeline events.

use std::fmt;

use artbuilder_core::catalog::StyleCatalog;
use artbuilder_core::render::{ArtRow, ErrorList, ResultsTable};
use artbuilder_core::source_image::SourceImage;
use artbuilder_pipeline::events::PipelineEvent;

/// Results table plus error list for one batch.
#[derive(Debug, Default)]
pub struct StatusView {
    pub table: ResultsTable,
    pub errors: ErrorList,
}

impl StatusView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a fresh table for `images`, dropping any previous rows.
    pub fn show(&mut self, images: &[SourceImage]) {
        self.table.hide();
        self.table.show(images);
    }

    /// Re-render every row from the final image records.
    ///
    /// Catches up on updates the event stream dropped when it lagged.
    pub fn sync(&mut self, images: &[SourceImage]) {
        for image in images {
            self.table.refresh(image);
        }
    }

    /// Apply one event and return the line to print for it, if any.
    ///
    /// A failure replaces the error list, so only the latest pipeline error
    /// is kept.
    pub fn apply(&mut self, event: &PipelineEvent) -> Option<String> {
        match event {
            PipelineEvent::BatchStarted { .. } => None,
            PipelineEvent::ImageUpdated { image } => self.table.refresh(image).map(row_line),
            PipelineEvent::ImageFailed { error, .. } => {
                self.errors.replace(error.clone());
                Some(format!("error: {error}"))
            }
            PipelineEvent::BatchFinished {
                done,
                failed,
                cancelled,
            } => {
                let mut line = format!("{done} done, {failed} failed");
                if *cancelled {
                    line.push_str(" (cancelled)");
                }
                Some(line)
            }
        }
    }
}

impl fmt::Display for StatusView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.errors)?;
        if !self.table.is_empty() {
            write!(f, "{}", self.table)?;
        }
        Ok(())
    }
}

fn row_line(row: &ArtRow) -> String {
    let mut line = format!("#{} {}", row.id, row.cells.join("  "));
    if let Some(class) = row.class {
        line.push_str(&format!(" [{class}]"));
    }
    line
}

/// One line per style: id, file name and preview size.
pub fn format_catalog(catalog: &StyleCatalog) -> String {
    if catalog.is_empty() {
        return "no styles found\n".to_string();
    }
    let width = catalog
        .entries()
        .iter()
        .map(|e| e.style_id.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for entry in catalog.entries() {
        let size = entry
            .dimensions()
            .map(|(w, h)| format!("{w}x{h}"))
            .unwrap_or_else(|| "?".to_string());
        out.push_str(&format!(
            "{:<width$}  {}  {}\n",
            entry.style_id, entry.file_name, size
        ));
    }
    out
}
