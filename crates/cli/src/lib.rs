//! Command-line front end for the artbuilder batch pipeline.

pub mod app;
pub mod args;
pub mod view;
