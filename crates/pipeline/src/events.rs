//! Events emitted while a batch runs.
//!
//! The batch worker owns the image records; front ends learn about every
//! status change through these events and re-render from the snapshots.

use artbuilder_core::source_image::SourceImage;
use artbuilder_core::types::ImageId;
use serde::Serialize;

/// A state change observed by the batch worker.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// The worker picked up a batch of `total` images.
    BatchStarted { total: usize },

    /// An image changed status or gained a job id, URL or path.
    ImageUpdated {
        /// Snapshot of the image after the change.
        image: SourceImage,
    },

    /// The pipeline of one image stopped on an error.
    ImageFailed {
        image_id: ImageId,
        /// Human-readable error description.
        error: String,
    },

    /// The queue is drained or the batch was cancelled.
    BatchFinished {
        done: usize,
        failed: usize,
        cancelled: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_value(PipelineEvent::ImageFailed {
            image_id: 4,
            error: "wait for job failed".into(),
        })
        .unwrap();
        assert_eq!(json["type"], "image_failed");
        assert_eq!(json["image_id"], 4);
    }

    #[test]
    fn image_snapshot_carries_status() {
        let json = serde_json::to_value(PipelineEvent::ImageUpdated {
            image: SourceImage::new(1, "cat.png"),
        })
        .unwrap();
        assert_eq!(json["type"], "image_updated");
        assert_eq!(json["image"]["status"], "PENDING");
        assert_eq!(json["image"]["name"], "cat.png");
    }
}
