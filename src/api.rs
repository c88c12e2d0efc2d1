//! HTTP surface for the document analysis service.
//!
//! - `GET /health` – Liveness check; always answers `200` with a fixed status body.
//! - `POST /documents/analyze` – Accepts `{ "content", "section"?, "title"? }` and returns
//!   `{ section, title, summary, key_points }` with exactly four key points.
//!
//! Invalid requests get a `400` envelope and never reach the engine. Unexpected failures while
//! producing a result are reported as `500` with the failure text.

use crate::analysis::{
    AnalysisApi, AnalysisError, AnalysisRequest, AnalysisResult, ErrorEnvelope, HealthStatus,
};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;

/// Build the HTTP router exposing the analysis API surface.
///
/// `body_limit` caps request bodies in bytes. Size it from `Config::max_body_bytes` so that any
/// document within the character limit reaches the engine instead of being rejected with `413`.
pub fn create_router<S>(service: Arc<S>, body_limit: usize) -> Router
where
    S: AnalysisApi + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/documents/analyze", post(analyze_document::<S>))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(service)
}

/// Report that the server is up. Inspects no state.
async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::healthy())
}

/// Validate the body, run the analysis and wrap the result.
///
/// The body is read raw so that an absent body, malformed JSON and a non-object payload all map
/// to the same client error instead of Axum's default rejections.
async fn analyze_document<S>(
    State(service): State<Arc<S>>,
    body: Bytes,
) -> Result<Json<AnalysisResult>, AppError>
where
    S: AnalysisApi,
{
    let request = AnalysisRequest::from_body(&body).map_err(AnalysisError::from)?;
    let result = service.analyze(request).await?;
    tracing::info!(
        section = %result.section,
        title = %result.title,
        key_points = result.key_points.len(),
        "Analysis request completed"
    );
    Ok(Json(result))
}

struct AppError(AnalysisError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.0 {
            AnalysisError::Client(error) => {
                tracing::debug!(error = %error, "Rejected analysis request");
                (StatusCode::BAD_REQUEST, Json(error.envelope())).into_response()
            }
            AnalysisError::Internal(message) => {
                tracing::error!(error = %message, "Error analyzing document");
                let envelope = ErrorEnvelope {
                    error: "Internal server error".into(),
                    message,
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(envelope)).into_response()
            }
        }
    }
}

impl From<AnalysisError> for AppError {
    fn from(inner: AnalysisError) -> Self {
        Self(inner)
    }
}
