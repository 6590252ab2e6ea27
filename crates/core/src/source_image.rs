//! Selected source images and their processing status.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::remote_id::RemoteId;
use crate::types::ImageId;

/// Processing stage of a single source image.
///
/// Variants are declared in pipeline order so that `Ord` reflects
/// progress: a status only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageStatus {
    Pending,
    Uploading,
    Rendering,
    Downloading,
    Done,
}

impl ImageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageStatus::Pending => "PENDING",
            ImageStatus::Uploading => "UPLOADING",
            ImageStatus::Rendering => "RENDERING",
            ImageStatus::Downloading => "DOWNLOADING",
            ImageStatus::Done => "DONE",
        }
    }
}

impl fmt::Display for ImageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A local image the user picked for stylization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceImage {
    pub id: ImageId,
    /// Local file the bytes are read from at upload time.
    pub file: PathBuf,
    /// File name shown in the results table and used in the output name.
    pub name: String,
    pub status: ImageStatus,
    /// Remote job id once the stylization job was created.
    pub job_id: Option<RemoteId>,
    /// Remote URL of the rendered output once the job finished.
    pub url: Option<String>,
    /// Local path of the downloaded output.
    pub path: Option<PathBuf>,
}

impl SourceImage {
    pub fn new(id: ImageId, file: impl Into<PathBuf>) -> Self {
        let file = file.into();
        let name = display_name(&file);
        Self {
            id,
            file,
            name,
            status: ImageStatus::Pending,
            job_id: None,
            url: None,
            path: None,
        }
    }

    /// Move the image to `status`.
    ///
    /// Statuses never go backwards; a regressing transition is ignored.
    pub fn advance_to(&mut self, status: ImageStatus) {
        if status < self.status {
            tracing::warn!(
                image_id = self.id,
                from = %self.status,
                to = %status,
                "Ignoring backwards status transition",
            );
            return;
        }
        self.status = status;
    }

    pub fn is_done(&self) -> bool {
        self.status == ImageStatus::Done
    }
}

fn display_name(file: &Path) -> String {
    file.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_image_is_pending_without_results() {
        let image = SourceImage::new(7, "/photos/cat.png");
        assert_eq!(image.id, 7);
        assert_eq!(image.name, "cat.png");
        assert_eq!(image.status, ImageStatus::Pending);
        assert!(image.job_id.is_none());
        assert!(image.url.is_none());
        assert!(image.path.is_none());
    }

    #[test]
    fn status_order_follows_pipeline() {
        assert!(ImageStatus::Pending < ImageStatus::Uploading);
        assert!(ImageStatus::Uploading < ImageStatus::Rendering);
        assert!(ImageStatus::Rendering < ImageStatus::Downloading);
        assert!(ImageStatus::Downloading < ImageStatus::Done);
    }

    #[test]
    fn advance_ignores_regression() {
        let mut image = SourceImage::new(1, "a.png");
        image.advance_to(ImageStatus::Rendering);
        image.advance_to(ImageStatus::Uploading);
        assert_eq!(image.status, ImageStatus::Rendering);
        image.advance_to(ImageStatus::Done);
        assert!(image.is_done());
    }

    #[test]
    fn status_serializes_upper_case() {
        let json = serde_json::to_string(&ImageStatus::Downloading).unwrap();
        assert_eq!(json, r#""DOWNLOADING""#);
    }
}
