use serde::{Deserialize, Serialize};

use super::sentence::Sentence;

/// The alignment of one annotation inside one sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// The gold mention text.
    pub text: String,
    /// Half-open token range `[start, end)` within the sentence.
    pub span: (usize, usize),
    /// Mention category carried over from the annotation.
    pub mention_type: String,
}

impl Tag {
    pub fn new(
        text: impl Into<String>,
        span: (usize, usize),
        mention_type: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            span,
            mention_type: mention_type.into(),
        }
    }

    /// Number of tokens covered by the span.
    #[must_use]
    pub fn width(&self) -> usize {
        self.span.1.saturating_sub(self.span.0)
    }
}

/// A document as read from the corpus files, before tokenization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocument {
    pub id: String,
    pub title: String,
    pub body: String,
}

impl RawDocument {
    pub fn new(id: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: body.into(),
        }
    }

    /// The string all annotation offsets refer to: title, one space, body.
    #[must_use]
    pub fn document_string(&self) -> String {
        format!("{} {}", self.title, self.body)
    }
}

/// A fully tokenized and aligned document.
///
/// `tags[i]` holds the tags of `sentences[i]`; both vectors always have the
/// same length. This is the record the document cache stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub body: String,
    pub sentences: Vec<Sentence>,
    pub tags: Vec<Vec<Tag>>,
}

impl Document {
    /// Assembles a document from its raw record and alignment output.
    pub fn from_parts(raw: &RawDocument, sentences: Vec<Sentence>, tags: Vec<Vec<Tag>>) -> Self {
        debug_assert_eq!(sentences.len(), tags.len());
        Self {
            id: raw.id.clone(),
            title: raw.title.clone(),
            body: raw.body.clone(),
            sentences,
            tags,
        }
    }

    #[must_use]
    pub fn document_string(&self) -> String {
        format!("{} {}", self.title, self.body)
    }

    /// Iterates over sentences paired with their tags.
    pub fn tagged_sentences(&self) -> impl Iterator<Item = (&Sentence, &[Tag])> {
        self.sentences
            .iter()
            .zip(self.tags.iter().map(Vec::as_slice))
    }

    /// Total number of tags across all sentences.
    #[must_use]
    pub fn tag_count(&self) -> usize {
        self.tags.iter().map(Vec::len).sum()
    }
}

/// Slices `text` by character offsets. Returns `None` when the range is
/// inverted or runs past the end of the string.
pub(crate) fn char_slice(text: &str, start: usize, end: usize) -> Option<&str> {
    if start > end {
        return None;
    }
    let mut boundaries = text
        .char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(text.len()));
    let byte_start = boundaries.nth(start)?;
    let byte_end = if end == start {
        byte_start
    } else {
        boundaries.nth(end - start - 1)?
    };
    Some(&text[byte_start..byte_end])
}
