//! Extractive summary and key-point selection.
//!
//! Both operations are truncation heuristics over the sentence sequence. Their contract is
//! shape, not quality: `summarize` always yields text and `extract_key_points` yields exactly
//! `num_points` entries whenever segmentation succeeds.

use super::segmentation::{Sentence, SentenceSegmenter};
use super::types::{Extraction, SegmentationError};
use crate::config::Config;

/// Number of leading sentences joined into the summary.
pub const SUMMARY_SENTENCES: usize = 3;
/// Key points produced per analysis.
pub const DEFAULT_KEY_POINTS: usize = 4;
/// Sentences at or below this many characters are too short to be key points.
pub const MIN_KEY_POINT_CHARS: usize = 20;

/// Summary used when the document has no sentences.
pub const NO_SUMMARY: &str = "No se pudo generar un resumen.";
/// Summary used when segmentation failed.
pub const SUMMARY_ERROR: &str = "No se pudo generar un resumen debido a un error.";
/// Filler appended until the key-point list reaches its fixed length.
pub const KEY_POINT_PLACEHOLDER: &str = "Información adicional en el texto original";
/// Sole key point returned when segmentation failed.
pub const KEY_POINTS_ERROR: &str = "No se pudieron extraer puntos clave debido a un error.";

/// Sentence-based analysis engine.
#[derive(Debug, Clone)]
pub struct AnalysisEngine {
    segmenter: SentenceSegmenter,
}

impl AnalysisEngine {
    /// Wrap a prepared segmenter.
    pub fn new(segmenter: SentenceSegmenter) -> Self {
        Self { segmenter }
    }

    /// Build the engine and its segmenter from runtime configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(SentenceSegmenter::new(config.max_document_chars))
    }

    /// Join the first sentences of `text` into a single paragraph.
    pub fn summarize(&self, text: &str) -> Extraction<String> {
        match self.segmenter.segment(text) {
            Ok(sentences) if sentences.is_empty() => {
                tracing::debug!("No sentences found; returning empty-summary note");
                Extraction::Fallback(NO_SUMMARY.to_string())
            }
            Ok(sentences) => Extraction::Computed(leading_summary(&sentences)),
            Err(error) => {
                log_failure("summary", &error);
                Extraction::Fallback(SUMMARY_ERROR.to_string())
            }
        }
    }

    /// Pick up to `num_points` informative sentences and pad the list to exactly that length.
    ///
    /// Only the first `num_points` sentences are candidates; the length filter runs on that
    /// window, so informative sentences further into the document are never considered.
    /// On segmentation failure the result is a single error note.
    pub fn extract_key_points(&self, text: &str, num_points: usize) -> Extraction<Vec<String>> {
        match self.segmenter.segment(text) {
            Ok(sentences) => Extraction::Computed(select_key_points(&sentences, num_points)),
            Err(error) => {
                log_failure("key points", &error);
                Extraction::Fallback(vec![KEY_POINTS_ERROR.to_string()])
            }
        }
    }
}

fn leading_summary(sentences: &[Sentence<'_>]) -> String {
    sentences
        .iter()
        .take(SUMMARY_SENTENCES)
        .map(Sentence::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

fn select_key_points(sentences: &[Sentence<'_>], num_points: usize) -> Vec<String> {
    let mut points: Vec<String> = sentences
        .iter()
        .take(num_points)
        .filter(|sentence| sentence.char_len() > MIN_KEY_POINT_CHARS)
        .map(|sentence| sentence.as_str().to_string())
        .collect();
    pad_to(&mut points, num_points);
    points
}

fn pad_to(points: &mut Vec<String>, num_points: usize) {
    let missing = num_points.saturating_sub(points.len());
    if missing > 0 {
        tracing::trace!(missing, "Padding key points with placeholder");
    }
    points.extend(std::iter::repeat_n(
        KEY_POINT_PLACEHOLDER.to_string(),
        missing,
    ));
}

fn log_failure(operation: &'static str, error: &SegmentationError) {
    match error {
        SegmentationError::InputTooLarge { length, max } => tracing::warn!(
            operation,
            length,
            max,
            error = %error,
            "Sentence segmentation rejected document; using fallback"
        ),
        SegmentationError::BinaryContent => tracing::error!(
            operation,
            error = %error,
            "Sentence segmentation failed; using fallback"
        ),
    }
}
