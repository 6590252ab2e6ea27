//! Results table and error list shown to the user.
//!
//! [`render_row`] is a pure mapping from a [`SourceImage`] to the cells of
//! its table row. [`ResultsTable`] keeps one row per image id and replaces
//! it in place whenever the image changes.

use std::collections::BTreeMap;
use std::fmt;

use crate::source_image::{ImageStatus, SourceImage};
use crate::types::ImageId;

/// Placeholder for values that are not known yet.
pub const EMPTY_CELL: &str = "-";

pub const CLASS_RENDERING: &str = "rendering";
pub const CLASS_DONE: &str = "done";

const HEADERS: [&str; 5] = ["Name", "Status", "Job", "Output URL", "Path"];

/// Rendered contents of one results-table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtRow {
    pub id: ImageId,
    /// Visual class for statuses that get highlighted.
    pub class: Option<&'static str>,
    /// Name, status, job id, output URL, local path.
    pub cells: [String; 5],
}

pub fn render_row(image: &SourceImage) -> ArtRow {
    let class = match image.status {
        ImageStatus::Rendering => Some(CLASS_RENDERING),
        ImageStatus::Done => Some(CLASS_DONE),
        _ => None,
    };

    ArtRow {
        id: image.id,
        class,
        cells: [
            image.name.clone(),
            image.status.to_string(),
            or_placeholder(image.job_id.as_ref().map(|j| j.to_string())),
            or_placeholder(image.url.clone()),
            or_placeholder(image.path.as_ref().map(|p| p.display().to_string())),
        ],
    }
}

fn or_placeholder(value: Option<String>) -> String {
    value.unwrap_or_else(|| EMPTY_CELL.to_string())
}

/// Rows of the current batch keyed by image id.
#[derive(Debug, Default)]
pub struct ResultsTable {
    rows: BTreeMap<ImageId, ArtRow>,
}

impl ResultsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row for every image of a freshly started batch.
    pub fn show(&mut self, images: &[SourceImage]) {
        for image in images {
            self.rows.insert(image.id, render_row(image));
        }
    }

    /// Re-render the row of `image` in place.
    ///
    /// Returns the new row, or `None` if the image is not in the table.
    pub fn refresh(&mut self, image: &SourceImage) -> Option<&ArtRow> {
        let row = self.rows.get_mut(&image.id)?;
        *row = render_row(image);
        Some(row)
    }

    /// Drop every row.
    pub fn hide(&mut self) {
        self.rows.clear();
    }

    pub fn row(&self, id: ImageId) -> Option<&ArtRow> {
        self.rows.get(&id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for ResultsTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut widths = HEADERS.map(str::len);
        for row in self.rows.values() {
            for (w, cell) in widths.iter_mut().zip(&row.cells) {
                *w = (*w).max(cell.chars().count());
            }
        }

        write_line(f, &HEADERS[..], &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_line(f, &rule[..], &widths)?;
        for row in self.rows.values() {
            write_line(f, &row.cells[..], &widths)?;
        }
        Ok(())
    }
}

fn write_line<S: AsRef<str>>(f: &mut fmt::Formatter<'_>, cells: &[S], widths: &[usize]) -> fmt::Result {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{:<w$}", c.as_ref(), w = *w))
        .collect();
    writeln!(f, "{}", line.join("  ").trim_end())
}

/// Messages shown above the results table.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ErrorList {
    errors: Vec<String>,
}

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn add(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    /// Replace all current messages with a single one.
    pub fn replace(&mut self, error: impl Into<String>) {
        self.errors.clear();
        self.errors.push(error.into());
    }

    pub fn messages(&self) -> &[String] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "error: {error}")?;
        }
        Ok(())
    }
}
