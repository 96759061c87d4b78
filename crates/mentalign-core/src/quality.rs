//! # Alignment Quality
//!
//! Alignment never fails, so its precision has to be measured instead.
//! A tag is counted as exact when the tokens it covers, concatenated after
//! undoing bracket escapes, equal the gold text with whitespace removed.

use serde::{Deserialize, Serialize};

use crate::tokenizer::unescape_ptb;
use crate::types::{Document, Sentence, Tag};

/// A tag whose tokens do not reproduce the gold text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    /// Document id.
    pub id: String,
    /// Sentence position within the document.
    pub sentence: usize,
    /// The gold mention text.
    pub text: String,
    /// The aligned token span.
    pub span: (usize, usize),
    /// The text the span actually covers.
    pub reconstructed: String,
}

/// Alignment statistics for one document or many.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignmentReport {
    /// Gold mentions.
    pub annotations: usize,
    /// Mentions that produced a tag.
    pub aligned: usize,
    /// Tags whose tokens reproduce the gold text.
    pub exact: usize,
    /// Tags that did not.
    pub mismatches: Vec<Mismatch>,
}

impl AlignmentReport {
    /// Mentions that fell outside every sentence.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.annotations.saturating_sub(self.aligned)
    }

    /// Fraction of gold mentions aligned exactly; `1.0` when there are none.
    #[must_use]
    pub fn exact_ratio(&self) -> f64 {
        if self.annotations == 0 {
            return 1.0;
        }
        self.exact as f64 / self.annotations as f64
    }

    /// Adds `other` into `self`.
    pub fn merge(&mut self, other: AlignmentReport) {
        self.annotations += other.annotations;
        self.aligned += other.aligned;
        self.exact += other.exact;
        self.mismatches.extend(other.mismatches);
    }
}

/// The source text covered by `span`, tokens joined without separators.
///
/// Spans running past the end of the sentence are clamped.
pub fn reconstruct(sentence: &Sentence, span: (usize, usize)) -> String {
    let tokens = sentence.tokens();
    let end = span.1.min(tokens.len());
    let start = span.0.min(end);
    tokens[start..end]
        .iter()
        .map(|token| unescape_ptb(token))
        .collect()
}

fn is_exact(sentence: &Sentence, tag: &Tag) -> (bool, String) {
    let reconstructed = reconstruct(sentence, tag.span);
    let gold: String = tag.text.chars().filter(|c| !c.is_whitespace()).collect();
    (reconstructed == gold, reconstructed)
}

/// Measures the tags of `document` against its `annotation_count` gold
/// mentions.
pub fn evaluate(document: &Document, annotation_count: usize) -> AlignmentReport {
    let mut report = AlignmentReport {
        annotations: annotation_count,
        ..AlignmentReport::default()
    };

    for (position, (sentence, tags)) in document.tagged_sentences().enumerate() {
        for tag in tags {
            report.aligned += 1;
            let (exact, reconstructed) = is_exact(sentence, tag);
            if exact {
                report.exact += 1;
            } else {
                report.mismatches.push(Mismatch {
                    id: document.id.clone(),
                    sentence: position,
                    text: tag.text.clone(),
                    span: tag.span,
                    reconstructed,
                });
            }
        }
    }

    report
}
