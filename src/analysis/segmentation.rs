//! Sentence boundary detection.
//!
//! Boundaries come from the Unicode sentence rules (UAX #29), which handle decimals, lowercase
//! continuations and closing punctuation. A second pass glues back spans that the Unicode rules
//! split after abbreviations such as "Sr." or "Dr." and after single-letter initials, which are
//! common in Spanish administrative text.
//!
//! The segmenter is built once at startup and shared read-only between requests.

use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

use super::types::SegmentationError;

const ABBREVIATIONS: &[&str] = &[
    // Spanish
    "sr.", "sra.", "srta.", "sres.", "dr.", "dra.", "lic.", "ing.", "arq.", "prof.", "profa.",
    "ud.", "uds.", "vd.", "vds.", "dña.", "d.", "pág.", "págs.", "núm.", "nº.", "art.", "arts.",
    "cap.", "vol.", "fig.", "ej.", "aprox.", "av.", "avda.", "tel.", "depto.", "dpto.", "admón.",
    "cía.", "s.a.", "ee.uu.", "ib.", "op.", "cit.", "vs.",
    // English terms that show up in mixed-language documents
    "mr.", "mrs.", "ms.", "st.", "jr.", "e.g.", "i.e.", "inc.", "ltd.", "approx.",
];

/// A sentence located in the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    text: &'a str,
    start: usize,
}

impl<'a> Sentence<'a> {
    /// Whitespace-trimmed sentence text.
    pub fn as_str(&self) -> &'a str {
        self.text
    }

    /// Byte offset of the trimmed sentence within the source document.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Length in Unicode scalar values.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Language-aware sentence splitter.
#[derive(Debug, Clone)]
pub struct SentenceSegmenter {
    abbreviations: HashSet<&'static str>,
    max_chars: usize,
}

impl SentenceSegmenter {
    /// Build a segmenter that rejects documents longer than `max_chars` characters.
    pub fn new(max_chars: usize) -> Self {
        Self {
            abbreviations: ABBREVIATIONS.iter().copied().collect(),
            max_chars: max_chars.max(1),
        }
    }

    /// Longest document this segmenter accepts.
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Split `text` into trimmed, non-empty sentences in document order.
    pub fn segment<'a>(&self, text: &'a str) -> Result<Vec<Sentence<'a>>, SegmentationError> {
        if text.contains('\0') {
            return Err(SegmentationError::BinaryContent);
        }
        let length = text.chars().count();
        if length > self.max_chars {
            return Err(SegmentationError::InputTooLarge {
                length,
                max: self.max_chars,
            });
        }

        let mut sentences = Vec::new();
        let mut pending: Option<usize> = None;
        for (offset, span) in text.split_sentence_bound_indices() {
            let start = pending.take().unwrap_or(offset);
            if self.continues_after(span) {
                pending = Some(start);
                continue;
            }
            push_trimmed(&mut sentences, text, start, offset + span.len());
        }
        if let Some(start) = pending {
            push_trimmed(&mut sentences, text, start, text.len());
        }

        Ok(sentences)
    }

    /// Whether a Unicode boundary at the end of `span` is a false stop.
    fn continues_after(&self, span: &str) -> bool {
        let trimmed = span.trim_end();
        if trimmed.is_empty() || span[trimmed.len()..].contains(['\n', '\r']) {
            return false;
        }

        let token = trimmed
            .rsplit(char::is_whitespace)
            .next()
            .unwrap_or_default()
            .trim_start_matches(|c: char| !c.is_alphanumeric());
        let Some(stem) = token.strip_suffix('.') else {
            return false;
        };

        if self.abbreviations.contains(token.to_lowercase().as_str()) {
            return true;
        }
        let mut chars = stem.chars();
        matches!((chars.next(), chars.next()), (Some(initial), None) if initial.is_uppercase())
    }
}

fn push_trimmed<'a>(sentences: &mut Vec<Sentence<'a>>, text: &'a str, start: usize, end: usize) {
    let raw = &text[start..end];
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    let leading = raw.len() - raw.trim_start().len();
    sentences.push(Sentence {
        text: trimmed,
        start: start + leading,
    });
}
