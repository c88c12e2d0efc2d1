//! Analysis service coordinating the engine for request handlers.

use crate::analysis::{
    engine::{AnalysisEngine, DEFAULT_KEY_POINTS},
    types::{AnalysisError, AnalysisRequest, AnalysisResult},
};
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;
use tokio::task::JoinError;

/// Abstraction over the analysis pipeline used by the HTTP surface.
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    /// Summarize a validated request and select its key points.
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult, AnalysisError>;
}

/// Runs engine work for validated requests.
///
/// The engine is immutable after startup; the service only holds a shared handle to it, so a
/// single instance serves concurrent requests without locking. Construct it once near process
/// start and share it through an `Arc`.
pub struct AnalysisService {
    engine: Arc<AnalysisEngine>,
}

impl AnalysisService {
    /// Wrap a shared engine.
    pub fn new(engine: Arc<AnalysisEngine>) -> Self {
        Self { engine }
    }

    /// Analyze a request on the current thread.
    pub fn analyze_blocking(&self, request: AnalysisRequest) -> AnalysisResult {
        analyze_with(&self.engine, request)
    }
}

#[async_trait]
impl AnalysisApi for AnalysisService {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        let engine = Arc::clone(&self.engine);
        run_blocking(move || analyze_with(&engine, request)).await
    }
}

/// Run CPU-bound work off the async runtime; a panic becomes `AnalysisError::Internal`.
async fn run_blocking<T, F>(work: F) -> Result<T, AnalysisError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|error| AnalysisError::Internal(join_error_message(error)))
}

fn analyze_with(engine: &AnalysisEngine, request: AnalysisRequest) -> AnalysisResult {
    let summary = engine.summarize(&request.content);
    let key_points = engine.extract_key_points(&request.content, DEFAULT_KEY_POINTS);
    tracing::debug!(
        chars = request.content.chars().count(),
        summary_fallback = summary.is_fallback(),
        key_points_fallback = key_points.is_fallback(),
        "Document analyzed"
    );

    AnalysisResult {
        section: request.section_or_default().to_string(),
        title: request.title_or_default().to_string(),
        summary: summary.into_inner(),
        key_points: key_points.into_inner(),
    }
}

fn join_error_message(error: JoinError) -> String {
    if error.is_panic() {
        panic_message(error.into_panic())
    } else {
        error.to_string()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => payload
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .unwrap_or_else(|| "analysis task panicked".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::engine::{KEY_POINT_PLACEHOLDER, NO_SUMMARY};
    use crate::analysis::segmentation::SentenceSegmenter;

    fn service() -> AnalysisService {
        AnalysisService::new(Arc::new(AnalysisEngine::new(SentenceSegmenter::new(10_000))))
    }

    #[tokio::test]
    async fn analyze_applies_label_defaults() {
        let result = service()
            .analyze(AnalysisRequest::new(""))
            .await
            .expect("analysis");
        assert_eq!(result.section, "N/A");
        assert_eq!(result.title, "Sin título");
        assert_eq!(result.summary, NO_SUMMARY);
        assert_eq!(result.key_points, vec![KEY_POINT_PLACEHOLDER; 4]);
    }

    #[tokio::test]
    async fn analyze_echoes_supplied_labels() {
        let request = AnalysisRequest {
            content: "Un documento con una única frase larga.".into(),
            section: Some("Anexo II".into()),
            title: Some("Memoria".into()),
        };
        let result = service().analyze(request).await.expect("analysis");
        assert_eq!(result.section, "Anexo II");
        assert_eq!(result.title, "Memoria");
        assert_eq!(result.summary, "Un documento con una única frase larga.");
        assert_eq!(result.key_points.len(), 4);
        assert_eq!(result.key_points[0], "Un documento con una única frase larga.");
    }

    #[test]
    fn blocking_and_async_paths_agree() {
        let service = service();
        let request = AnalysisRequest::new("Primera frase bastante extensa. Segunda también.");
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");
        let from_task = runtime
            .block_on(service.analyze(request.clone()))
            .expect("analysis");
        assert_eq!(service.analyze_blocking(request), from_task);
    }

    #[test]
    fn panic_payloads_become_messages() {
        assert_eq!(panic_message(Box::new("boom")), "boom");
        assert_eq!(panic_message(Box::new(String::from("kaput"))), "kaput");
        assert_eq!(panic_message(Box::new(7_u8)), "analysis task panicked");
    }

    #[tokio::test]
    async fn panicking_work_becomes_internal_error() {
        let error = run_blocking(|| -> AnalysisResult { panic!("segmenter exploded") })
            .await
            .expect_err("panic surfaces as an error");
        assert!(
            matches!(&error, AnalysisError::Internal(message) if message == "segmenter exploded"),
            "unexpected error: {error:?}"
        );

        let limit = 3;
        let error = run_blocking(move || -> AnalysisResult {
            panic!("sentence {limit} out of range")
        })
        .await
        .expect_err("formatted panic surfaces as an error");
        assert!(
            matches!(&error, AnalysisError::Internal(message) if message == "sentence 3 out of range"),
            "unexpected error: {error:?}"
        );
    }
}
