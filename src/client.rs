//! HTTP client for callers of the analysis service.
//!
//! Conversational front-ends upload raw text and show the returned envelope to the user; this
//! client covers that hand-off. It is synchronous from the caller's point of view: one request,
//! one response, no retries.

use crate::analysis::{AnalysisRequest, AnalysisResult, ErrorEnvelope, HealthStatus};
use reqwest::{Client, StatusCode};
use thiserror::Error;

/// Errors raised while talking to the analysis service.
#[derive(Debug, Error)]
pub enum ClientRequestError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
    /// The service could not be reached.
    #[error("failed to reach analysis service at {url}: {source}")]
    Transport {
        /// Endpoint that was contacted.
        url: String,
        /// Underlying transport failure.
        #[source]
        source: reqwest::Error,
    },
    /// The service answered with a non-success status.
    #[error("analysis service returned {status}: {error} ({message})")]
    Status {
        /// HTTP status code.
        status: StatusCode,
        /// Error label from the envelope.
        error: String,
        /// Human-readable message from the envelope.
        message: String,
    },
    /// The response body did not match the expected shape.
    #[error("malformed response from analysis service: {0}")]
    InvalidResponse(String),
}

/// Thin client over `GET /health` and `POST /documents/analyze`.
#[derive(Debug, Clone)]
pub struct AnalyzerClient {
    http: Client,
    base_url: String,
}

impl AnalyzerClient {
    /// Build a client targeting `base_url` (for example `http://127.0.0.1:5000`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientRequestError> {
        let http = Client::builder()
            .user_agent("docinsight-client")
            .build()
            .map_err(ClientRequestError::Build)?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Check service liveness.
    pub async fn health(&self) -> Result<HealthStatus, ClientRequestError> {
        let url = self.endpoint("/health");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ClientRequestError::Transport { url, source })?;
        decode(response).await
    }

    /// Submit a document for analysis.
    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, ClientRequestError> {
        let url = self.endpoint("/documents/analyze");
        tracing::debug!(url = %url, chars = request.content.chars().count(), "Submitting document");
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|source| ClientRequestError::Transport { url, source })?;
        decode(response).await
    }
}

async fn decode<T>(response: reqwest::Response) -> Result<T, ClientRequestError>
where
    T: serde::de::DeserializeOwned,
{
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let envelope = match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => envelope,
            Err(_) => ErrorEnvelope {
                error: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
                message: body,
            },
        };
        return Err(ClientRequestError::Status {
            status,
            error: envelope.error,
            message: envelope.message,
        });
    }

    response.json().await.map_err(|error| {
        ClientRequestError::InvalidResponse(format!("failed to decode response body: {error}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{
        Method::{GET, POST},
        MockServer,
    };
    use serde_json::json;

    #[tokio::test]
    async fn health_decodes_status_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/health");
                then.status(200)
                    .json_body(json!({ "status": "healthy", "message": "Server is running" }));
            })
            .await;

        let client = AnalyzerClient::new(format!("{}/", server.base_url())).expect("client");
        let status = client.health().await.expect("health");

        mock.assert();
        assert_eq!(status, HealthStatus::healthy());
    }

    #[tokio::test]
    async fn analyze_posts_content_and_labels() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/documents/analyze")
                    .json_body(json!({ "content": "Texto.", "title": "Acta" }));
                then.status(200).json_body(json!({
                    "section": "N/A",
                    "title": "Acta",
                    "summary": "Texto.",
                    "key_points": ["a", "b", "c", "d"]
                }));
            })
            .await;

        let client = AnalyzerClient::new(server.base_url()).expect("client");
        let request = AnalysisRequest {
            title: Some("Acta".into()),
            ..AnalysisRequest::new("Texto.")
        };
        let result = client.analyze(&request).await.expect("analysis");

        mock.assert();
        assert_eq!(result.title, "Acta");
        assert_eq!(result.key_points.len(), 4);
    }

    #[tokio::test]
    async fn analyze_surfaces_error_envelope() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/documents/analyze");
                then.status(400).json_body(json!({
                    "error": "No content provided",
                    "message": "Se requiere el campo 'content'"
                }));
            })
            .await;

        let client = AnalyzerClient::new(server.base_url()).expect("client");
        let error = client
            .analyze(&AnalysisRequest::new(""))
            .await
            .expect_err("client error");

        match error {
            ClientRequestError::Status {
                status,
                error,
                message,
            } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(error, "No content provided");
                assert_eq!(message, "Se requiere el campo 'content'");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_error_bodies_are_kept_as_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/health");
                then.status(502).body("bad gateway");
            })
            .await;

        let client = AnalyzerClient::new(server.base_url()).expect("client");
        let error = client.health().await.expect_err("status error");
        assert!(matches!(
            error,
            ClientRequestError::Status { status, ref message, .. }
                if status == StatusCode::BAD_GATEWAY && message == "bad gateway"
        ));
    }
}
