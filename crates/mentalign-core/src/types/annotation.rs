use std::fmt;

use serde::{Deserialize, Serialize};

/// Which field of the document a mention was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// The document title.
    Title,
    /// The abstract body.
    Body,
}

impl Region {
    /// Classifies a mention by its end offset: anything ending inside the
    /// title (measured in characters) is a title mention.
    #[must_use]
    pub fn classify(end: usize, title_len: usize) -> Self {
        if end <= title_len {
            Self::Title
        } else {
            Self::Body
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => write!(f, "T"),
            Self::Body => write!(f, "A"),
        }
    }
}

/// One gold-standard mention.
///
/// `start` and `end` are character offsets into `title + " " + body`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Title or body.
    pub region: Region,
    /// Character offset of the first character.
    pub start: usize,
    /// Character offset one past the last character.
    pub end: usize,
    /// The literal mention text.
    pub text: String,
    /// Mention category (e.g. `SpecificDisease`, `Modifier`).
    pub mention_type: String,
    /// Normalized concept identifier (e.g. a MeSH or OMIM id).
    pub concept_id: String,
}

impl Annotation {
    /// Length of the mention text in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
