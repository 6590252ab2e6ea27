//! Domain types for the art builder: selected images, the style catalog,
//! session validation, output naming and the rendered results table.

pub mod catalog;
pub mod error;
pub mod naming;
pub mod registry;
pub mod remote_id;
pub mod render;
pub mod session;
pub mod source_image;
pub mod types;
