//! The working set of source images for the current selection.

use std::path::PathBuf;

use crate::source_image::SourceImage;
use crate::types::ImageId;

/// Holds the images of the latest file selection.
///
/// Ids come from a counter owned by the registry. A new selection discards
/// the previous images but keeps counting, so an id is never handed out
/// twice during a session.
#[derive(Debug, Default)]
pub struct SourceImageRegistry {
    last_id: ImageId,
    images: Vec<SourceImage>,
}

impl SourceImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the working set with one `PENDING` image per file.
    pub fn replace_selection<I, P>(&mut self, files: I) -> &[SourceImage]
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.images.clear();
        for file in files {
            self.last_id += 1;
            self.images.push(SourceImage::new(self.last_id, file));
        }

        tracing::debug!(
            count = self.images.len(),
            last_id = self.last_id,
            "Source image selection replaced",
        );

        &self.images
    }

    pub fn images(&self) -> &[SourceImage] {
        &self.images
    }

    /// Hand the working set over for processing, leaving the registry empty.
    pub fn take_images(&mut self) -> Vec<SourceImage> {
        std::mem::take(&mut self.images)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_image::ImageStatus;

    #[test]
    fn ids_start_at_one_and_increase() {
        let mut registry = SourceImageRegistry::new();
        let images = registry.replace_selection(["a.png", "b.png", "c.png"]);
        let ids: Vec<_> = images.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(images.iter().all(|i| i.status == ImageStatus::Pending));
    }

    #[test]
    fn new_selection_discards_old_entries_and_keeps_counting() {
        let mut registry = SourceImageRegistry::new();
        registry.replace_selection(["a.png", "b.png"]);
        let images = registry.replace_selection(["c.png"]);

        assert_eq!(images.len(), 1);
        assert_eq!(images[0].id, 3);
        assert_eq!(images[0].name, "c.png");
    }

    #[test]
    fn empty_selection_still_clears() {
        let mut registry = SourceImageRegistry::new();
        registry.replace_selection(["a.png"]);
        registry.replace_selection(Vec::<PathBuf>::new());
        assert!(registry.is_empty());

        let images = registry.replace_selection(["b.png"]);
        assert_eq!(images[0].id, 2);
    }

    #[test]
    fn take_images_empties_registry() {
        let mut registry = SourceImageRegistry::new();
        registry.replace_selection(["a.png", "b.png"]);
        let taken = registry.take_images();
        assert_eq!(taken.len(), 2);
        assert_eq!(registry.len(), 0);
    }
}
