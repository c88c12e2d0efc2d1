//! Document analysis pipeline: sentence segmentation, summary and key-point extraction.

pub mod engine;
pub mod segmentation;
mod service;
pub mod types;

pub use engine::AnalysisEngine;
pub use segmentation::{Sentence, SentenceSegmenter};
pub use service::{AnalysisApi, AnalysisService};
pub use types::{
    AnalysisError, AnalysisRequest, AnalysisResult, ClientError, ErrorEnvelope, Extraction,
    HealthStatus, SegmentationError,
};
