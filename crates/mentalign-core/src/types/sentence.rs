use serde::{Deserialize, Serialize};

use crate::error::{CorpusError, Result};

/// A tokenized sentence.
///
/// Each token carries the character offset at which it starts in the full
/// document string. Token text is whatever the tokenizer produced and may
/// differ from the source substring (bracket escaping, normalization).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SentenceRecord")]
pub struct Sentence {
    tokens: Vec<String>,
    token_offsets: Vec<usize>,
}

/// Unchecked wire form; decoding goes through [`Sentence::new`].
#[derive(Deserialize)]
struct SentenceRecord {
    tokens: Vec<String>,
    token_offsets: Vec<usize>,
}

impl TryFrom<SentenceRecord> for Sentence {
    type Error = CorpusError;

    fn try_from(record: SentenceRecord) -> Result<Self> {
        Self::new(record.tokens, record.token_offsets)
    }
}

impl Sentence {
    /// Builds a sentence, checking that it is non-empty, that every token
    /// has an offset, and that offsets strictly increase.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::InvalidSentence` if any of those fail.
    pub fn new(tokens: Vec<String>, token_offsets: Vec<usize>) -> Result<Self> {
        if tokens.is_empty() {
            return Err(CorpusError::InvalidSentence(
                "sentence has no tokens".into(),
            ));
        }
        if tokens.len() != token_offsets.len() {
            return Err(CorpusError::InvalidSentence(format!(
                "{} tokens but {} offsets",
                tokens.len(),
                token_offsets.len()
            )));
        }
        if let Some(pos) = token_offsets.windows(2).position(|w| w[0] >= w[1]) {
            return Err(CorpusError::InvalidSentence(format!(
                "token offsets not strictly increasing at index {}: {} then {}",
                pos + 1,
                token_offsets[pos],
                token_offsets[pos + 1]
            )));
        }
        Ok(Self {
            tokens,
            token_offsets,
        })
    }

    /// Builds a sentence from `(token, offset)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, usize)>,
        S: Into<String>,
    {
        let (tokens, offsets) = pairs
            .into_iter()
            .map(|(token, offset)| (token.into(), offset))
            .unzip();
        Self::new(tokens, offsets)
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn token_offsets(&self) -> &[usize] {
        &self.token_offsets
    }

    /// Number of tokens. Never zero for a sentence built through `new`.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Offset of the first token.
    pub fn first_offset(&self) -> Option<usize> {
        self.token_offsets.first().copied()
    }

    /// Offset of the last token.
    pub fn last_offset(&self) -> Option<usize> {
        self.token_offsets.last().copied()
    }

    /// Iterates over `(token, offset)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.tokens
            .iter()
            .map(String::as_str)
            .zip(self.token_offsets.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_increasing_offsets() {
        let sentence = Sentence::from_pairs([("BRCA1", 0), ("mutation", 6), (".", 14)]).unwrap();
        assert_eq!(sentence.len(), 3);
        assert_eq!(sentence.first_offset(), Some(0));
        assert_eq!(sentence.last_offset(), Some(14));
        assert_eq!(sentence.tokens()[1], "mutation");
    }

    #[test]
    fn rejects_empty_sentence() {
        let result = Sentence::new(Vec::new(), Vec::new());
        assert!(matches!(result, Err(CorpusError::InvalidSentence(_))));
    }

    #[test]
    fn rejects_length_mismatch() {
        let result = Sentence::new(vec!["a".into(), "b".into()], vec![0]);
        assert!(matches!(result, Err(CorpusError::InvalidSentence(_))));
    }

    #[test]
    fn rejects_non_increasing_offsets() {
        let result = Sentence::from_pairs([("a", 0), ("b", 4), ("c", 4)]);
        let Err(CorpusError::InvalidSentence(msg)) = result else {
            panic!("expected InvalidSentence");
        };
        assert!(msg.contains("index 2"));
    }

    #[test]
    fn decoding_checks_invariants() {
        let json = r#"{"tokens":["a","b"],"token_offsets":[0,2]}"#;
        let ok: Sentence = serde_json::from_str(json).unwrap();
        assert_eq!(ok.len(), 2);

        let bad = serde_json::from_str::<Sentence>(r#"{"tokens":["a","b"],"token_offsets":[2,0]}"#);
        assert!(bad.is_err());
    }
}
