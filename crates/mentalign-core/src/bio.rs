//! # BIO Labels
//!
//! Turns aligned tags into per-token Begin/Inside/Outside labels for
//! sequence labelling, and renders documents in two-column CoNLL form.

use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};

use crate::types::{Document, Sentence, Tag};

/// A per-token label. Entity labels carry the mention type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BioLabel {
    Begin(String),
    Inside(String),
    Outside,
}

impl BioLabel {
    /// Check if this is a "Begin" label.
    pub fn is_begin(&self) -> bool {
        matches!(self, BioLabel::Begin(_))
    }

    /// Check if this is an "Inside" label.
    pub fn is_inside(&self) -> bool {
        matches!(self, BioLabel::Inside(_))
    }

    /// Mention type, or `None` for `O`.
    pub fn mention_type(&self) -> Option<&str> {
        match self {
            BioLabel::Begin(t) | BioLabel::Inside(t) => Some(t),
            BioLabel::Outside => None,
        }
    }

    /// Check if `to` may follow `from`: an `I-x` must follow `B-x` or `I-x`.
    pub fn is_valid_transition(from: &BioLabel, to: &BioLabel) -> bool {
        match to {
            BioLabel::Inside(t) => from.mention_type() == Some(t.as_str()),
            _ => true,
        }
    }
}

impl fmt::Display for BioLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BioLabel::Begin(t) => write!(f, "B-{t}"),
            BioLabel::Inside(t) => write!(f, "I-{t}"),
            BioLabel::Outside => write!(f, "O"),
        }
    }
}

/// Labels every token of `sentence` from its `tags`.
///
/// Tags are applied in order. A tag overlapping tokens that are already
/// labelled is skipped, so the first tag wins. Spans are clamped to the
/// sentence and empty spans are ignored.
pub fn sentence_labels(sentence: &Sentence, tags: &[Tag]) -> Vec<BioLabel> {
    let len = sentence.len();
    let mut labels = vec![BioLabel::Outside; len];

    for tag in tags {
        let end = tag.span.1.min(len);
        let start = tag.span.0;
        if start >= end {
            continue;
        }
        if labels[start..end].iter().any(|l| *l != BioLabel::Outside) {
            continue;
        }
        labels[start] = BioLabel::Begin(tag.mention_type.clone());
        for label in &mut labels[start + 1..end] {
            *label = BioLabel::Inside(tag.mention_type.clone());
        }
    }

    labels
}

impl Document {
    /// BIO labels for each sentence, positionally matching `sentences`.
    pub fn bio_labels(&self) -> Vec<Vec<BioLabel>> {
        self.tagged_sentences()
            .map(|(sentence, tags)| sentence_labels(sentence, tags))
            .collect()
    }
}

/// Renders `document` as `token<TAB>label` lines with a blank line after
/// each sentence.
pub fn render_conll(document: &Document) -> String {
    let mut out = String::new();
    for (sentence, labels) in document.sentences.iter().zip(document.bio_labels()) {
        for (token, label) in sentence.tokens().iter().zip(&labels) {
            // Writing into a String cannot fail.
            let _ = writeln!(out, "{token}\t{label}");
        }
        out.push('\n');
    }
    out
}
