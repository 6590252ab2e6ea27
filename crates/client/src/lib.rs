//! Art service REST client library.
//!
//! Provides endpoint URL construction, typed request/response bodies,
//! an HTTP client implementing [`service::ArtService`], job polling, and
//! environment-driven client configuration.

pub mod api;
pub mod config;
pub mod endpoints;
pub mod messages;
pub mod poll;
pub mod service;
