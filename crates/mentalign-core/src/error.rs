use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading, aligning or caching a corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// A filesystem operation failed.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// The path being read or written.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A corpus file has no entry in the file-to-partition table.
    #[error("unrecognized corpus file (no partition mapping): {}", .path.display())]
    UnrecognizedFile {
        /// The offending file.
        path: PathBuf,
    },

    /// A line in a corpus file does not follow the record grammar.
    #[error("malformed record at {}:{line}: {reason}", .path.display())]
    MalformedRecord {
        /// The corpus file.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// The mention text does not match the document string at its offsets.
    #[error(
        "annotation integrity violation in document {id} (line {line}): expected {expected:?}, found {found:?}"
    )]
    IntegrityViolation {
        /// Document identifier.
        id: String,
        /// 1-based line number of the mention row.
        line: usize,
        /// The text given by the mention row.
        expected: String,
        /// The text found at the given offsets (empty when out of range).
        found: String,
    },

    /// The same document id was registered twice.
    #[error("document {id} appears more than once in the corpus")]
    DuplicateDocument {
        /// Document identifier.
        id: String,
    },

    /// No document with this id was registered during load.
    #[error("document not found: {id}")]
    NotFound {
        /// The requested identifier.
        id: String,
    },

    /// The partition name is not one of training/development/testing.
    #[error("unknown partition: {0:?}")]
    UnknownPartition(String),

    /// A tokenizer produced a sentence that breaks the sentence invariants.
    #[error("invalid sentence: {0}")]
    InvalidSentence(String),

    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),

    /// The id cannot be used as a cache key.
    #[error("document id cannot be used as a cache key: {0:?}")]
    InvalidDocumentId(String),

    /// A cached record exists but could not be decoded.
    #[error("failed to decode cached document at {}: {source}", .path.display())]
    CacheDecode {
        /// Location of the record.
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A document could not be encoded for the cache.
    #[error("failed to encode document {id} for the cache: {source}")]
    CacheEncode {
        /// Document identifier.
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CorpusError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for corpus operations.
pub type Result<T> = std::result::Result<T, CorpusError>;
