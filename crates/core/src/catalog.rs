//! Catalog of the style reference images bundled with the application.
//!
//! The catalog is loaded once at startup from a fixed directory. Each
//! regular file becomes a [`StyleEntry`] whose id is derived from the file
//! name via [`style_name`]. At most one style is selected at a time.

use std::io::Cursor;
use std::path::Path;

use crate::error::CoreError;
use crate::naming::style_name;

/// A selectable style and its preview image.
#[derive(Debug, Clone)]
pub struct StyleEntry {
    /// Identifier sent to the art service.
    pub style_id: String,
    /// File name the entry was loaded from.
    pub file_name: String,
    /// Raw bytes of the preview image.
    pub preview: Vec<u8>,
}

impl StyleEntry {
    /// Pixel dimensions of the preview, read from the image header only.
    ///
    /// Returns `None` when the format is unknown or the header is corrupt.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        image::ImageReader::new(Cursor::new(&self.preview))
            .with_guessed_format()
            .ok()?
            .into_dimensions()
            .ok()
    }
}

#[derive(Debug, Default)]
pub struct StyleCatalog {
    entries: Vec<StyleEntry>,
    selected: Option<String>,
}

impl StyleCatalog {
    /// Build a catalog from already-loaded entries.
    pub fn from_entries(mut entries: Vec<StyleEntry>) -> Self {
        entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Self {
            entries,
            selected: None,
        }
    }

    /// Load every regular file in `dir` as a style entry.
    ///
    /// Files whose name starts with a dot (`.DS_Store`) have no style name
    /// and are left out.
    /// An unreadable directory yields an empty catalog; unreadable files are
    /// skipped. Both cases are logged and otherwise ignored.
    pub fn load(dir: &Path) -> Self {
        let read_dir = match std::fs::read_dir(dir) {
            Ok(rd) => rd,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Cannot read style directory");
                return Self::default();
            }
        };

        let mut entries = Vec::new();
        for dir_entry in read_dir.flatten() {
            let path = dir_entry.path();
            if !path.is_file() {
                continue;
            }
            let file_name = dir_entry.file_name().to_string_lossy().into_owned();
            let style_id = style_name(&file_name).to_string();
            if style_id.is_empty() {
                tracing::debug!(file = %path.display(), "Skipping file without a style name");
                continue;
            }

            match std::fs::read(&path) {
                Ok(preview) => entries.push(StyleEntry {
                    style_id,
                    file_name,
                    preview,
                }),
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "Skipping unreadable style image");
                }
            }
        }

        tracing::info!(dir = %dir.display(), count = entries.len(), "Style catalog loaded");
        Self::from_entries(entries)
    }

    pub fn entries(&self) -> &[StyleEntry] {
        &self.entries
    }

    pub fn get(&self, style_id: &str) -> Option<&StyleEntry> {
        self.entries.iter().find(|e| e.style_id == style_id)
    }

    /// Make `style_id` the only selected style.
    ///
    /// An unknown id leaves the current selection untouched.
    pub fn select(&mut self, style_id: &str) -> Result<&StyleEntry, CoreError> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.style_id == style_id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "style",
                id: style_id.to_string(),
            })?;

        self.selected = Some(style_id.to_string());
        Ok(&self.entries[idx])
    }

    /// Id of the currently selected style, if any.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
