//! Core data types and error definitions for the analysis pipeline.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Section label used when the request does not supply one.
pub const DEFAULT_SECTION: &str = "N/A";
/// Title used when the request does not supply one.
pub const DEFAULT_TITLE: &str = "Sin título";

/// Failures raised while segmenting a document into sentences.
///
/// These never leave the engine: every public engine operation converts them into a fixed
/// fallback value and logs the cause.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SegmentationError {
    /// Document exceeds the configured segmenter ceiling.
    #[error("document has {length} characters; the sentence model accepts at most {max}")]
    InputTooLarge {
        /// Character count of the rejected document.
        length: usize,
        /// Configured ceiling.
        max: usize,
    },
    /// Document contains NUL characters, which only show up when binary data was decoded as text.
    #[error("document contains binary data")]
    BinaryContent,
}

/// Malformed or incomplete analysis requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request carried no body, or a body that is not a JSON object.
    #[error("missing body")]
    MissingBody,
    /// The JSON object has no usable `content` field.
    #[error("missing content")]
    MissingContent,
    /// A field was present with the wrong JSON type.
    #[error("field '{0}' must be a string")]
    InvalidField(&'static str),
}

impl ClientError {
    /// Wire envelope describing this error to the caller.
    pub fn envelope(&self) -> ErrorEnvelope {
        match self {
            Self::MissingBody | Self::MissingContent => ErrorEnvelope {
                error: "No content provided".into(),
                message: "Se requiere el campo 'content'".into(),
            },
            Self::InvalidField(field) => ErrorEnvelope {
                error: "Invalid field".into(),
                message: format!("El campo '{field}' debe ser texto"),
            },
        }
    }
}

/// Errors surfaced by the analysis request path.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Caller supplied an invalid request.
    #[error(transparent)]
    Client(#[from] ClientError),
    /// Unexpected failure while producing the response.
    #[error("{0}")]
    Internal(String),
}

/// JSON body returned for failed requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Machine-oriented error label.
    pub error: String,
    /// Human-readable detail.
    pub message: String,
}

/// JSON body returned by the liveness check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Always `"healthy"` when the server answers.
    pub status: String,
    /// Short human-readable note.
    pub message: String,
}

impl HealthStatus {
    /// The fixed status reported by a running server.
    pub fn healthy() -> Self {
        Self {
            status: "healthy".into(),
            message: "Server is running".into(),
        }
    }
}

/// A document submitted for analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Raw document text.
    pub content: String,
    /// Optional section label echoed in the result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Optional title echoed in the result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl AnalysisRequest {
    /// Build a request carrying only document text.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            section: None,
            title: None,
        }
    }

    /// Parse and validate a raw HTTP body.
    ///
    /// An empty body, a body that is not JSON, and JSON that is not an object all count as a
    /// missing body.
    pub fn from_body(body: &[u8]) -> Result<Self, ClientError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ClientError::MissingBody);
        }
        let payload: Value =
            serde_json::from_slice(body).map_err(|_| ClientError::MissingBody)?;
        Self::from_payload(Some(payload))
    }

    /// Validate an already-decoded payload.
    pub fn from_payload(payload: Option<Value>) -> Result<Self, ClientError> {
        let Some(Value::Object(mut fields)) = payload else {
            return Err(ClientError::MissingBody);
        };

        let content = match fields.remove("content") {
            None | Some(Value::Null) => return Err(ClientError::MissingContent),
            Some(Value::String(content)) => content,
            Some(_) => return Err(ClientError::InvalidField("content")),
        };

        Ok(Self {
            content,
            section: optional_label(&mut fields, "section")?,
            title: optional_label(&mut fields, "title")?,
        })
    }

    /// Section label with the documented default applied.
    pub fn section_or_default(&self) -> &str {
        self.section.as_deref().unwrap_or(DEFAULT_SECTION)
    }

    /// Title with the documented default applied.
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }
}

fn optional_label(
    fields: &mut Map<String, Value>,
    key: &'static str,
) -> Result<Option<String>, ClientError> {
    match fields.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(_) => Err(ClientError::InvalidField(key)),
    }
}

/// Structured analysis returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Section label echoed from the request.
    pub section: String,
    /// Title echoed from the request.
    pub title: String,
    /// Leading sentences of the document, or a fallback note.
    pub summary: String,
    /// Fixed-length list of representative sentences.
    pub key_points: Vec<String>,
}

/// Output of an engine operation.
///
/// Engine operations always produce a value. `Fallback` marks values that were substituted
/// because nothing could be computed; the cause has already been logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction<T> {
    /// Value derived from the document.
    Computed(T),
    /// Fixed placeholder used instead of a computed value.
    Fallback(T),
}

impl<T> Extraction<T> {
    /// Whether the value is a substituted placeholder.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    /// Borrow the carried value.
    pub fn value(&self) -> &T {
        match self {
            Self::Computed(value) | Self::Fallback(value) => value,
        }
    }

    /// Unwrap the carried value regardless of how it was produced.
    pub fn into_inner(self) -> T {
        match self {
            Self::Computed(value) | Self::Fallback(value) => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_payload_is_missing_body() {
        assert_eq!(
            AnalysisRequest::from_payload(None),
            Err(ClientError::MissingBody)
        );
        assert_eq!(
            AnalysisRequest::from_payload(Some(json!(["content"]))),
            Err(ClientError::MissingBody)
        );
    }

    #[test]
    fn empty_or_garbled_body_is_missing_body() {
        assert_eq!(AnalysisRequest::from_body(b""), Err(ClientError::MissingBody));
        assert_eq!(
            AnalysisRequest::from_body(b"  \n"),
            Err(ClientError::MissingBody)
        );
        assert_eq!(
            AnalysisRequest::from_body(b"content=hola"),
            Err(ClientError::MissingBody)
        );
    }

    #[test]
    fn object_without_content_is_missing_content() {
        assert_eq!(
            AnalysisRequest::from_payload(Some(json!({}))),
            Err(ClientError::MissingContent)
        );
        assert_eq!(
            AnalysisRequest::from_payload(Some(json!({ "content": null, "title": "T" }))),
            Err(ClientError::MissingContent)
        );
    }

    #[test]
    fn non_string_fields_are_rejected() {
        assert_eq!(
            AnalysisRequest::from_payload(Some(json!({ "content": 42 }))),
            Err(ClientError::InvalidField("content"))
        );
        assert_eq!(
            AnalysisRequest::from_payload(Some(json!({ "content": "x", "section": 3 }))),
            Err(ClientError::InvalidField("section"))
        );
    }

    #[test]
    fn labels_default_when_omitted() {
        let request =
            AnalysisRequest::from_payload(Some(json!({ "content": "" }))).expect("request");
        assert_eq!(request.content, "");
        assert_eq!(request.section_or_default(), "N/A");
        assert_eq!(request.title_or_default(), "Sin título");
    }

    #[test]
    fn labels_are_kept_verbatim() {
        let request = AnalysisRequest::from_body(
            br#"{"content":"Texto","section":" 2.1 ","title":"Informe anual"}"#,
        )
        .expect("request");
        assert_eq!(request.section_or_default(), " 2.1 ");
        assert_eq!(request.title_or_default(), "Informe anual");
    }

    #[test]
    fn missing_content_envelope_is_localized() {
        let envelope = ClientError::MissingContent.envelope();
        assert_eq!(envelope.error, "No content provided");
        assert_eq!(envelope.message, "Se requiere el campo 'content'");
        assert_eq!(ClientError::MissingBody.envelope(), envelope);
    }

    #[test]
    fn extraction_exposes_value_either_way() {
        let computed = Extraction::Computed(1);
        let fallback = Extraction::Fallback(2);
        assert!(!computed.is_fallback());
        assert!(fallback.is_fallback());
        assert_eq!(*computed.value(), 1);
        assert_eq!(fallback.into_inner(), 2);
    }
}
