#![deny(missing_docs)]

//! Core library for the document analysis service.

/// Sentence segmentation, summaries and key points.
pub mod analysis;
/// HTTP routing and REST handlers.
pub mod api;
/// HTTP client used by front-ends to reach the service.
pub mod client;
/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
