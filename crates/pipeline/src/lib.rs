//! Sequential processing of source images through the art service.
//!
//! [`pipeline::process_image`] runs the upload, job, poll and download
//! stages for one image; [`batch::BatchRunner`] drains a queue of images
//! through it and broadcasts [`events::PipelineEvent`]s.

pub mod batch;
pub mod error;
pub mod events;
pub mod pipeline;
