//! # Mentalign Core
//!
//! Loads PubTator-style annotated corpora (such as the NCBI Disease corpus),
//! tokenizes each document into sentences, and aligns the character-offset
//! gold mentions onto token spans. Aligned documents are cached on disk so
//! every document is tokenized only once.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mentalign_core::{Corpus, Partition, RegexTokenizer};
//!
//! let tokenizer = RegexTokenizer::new().unwrap();
//! let corpus = Corpus::load("data/ncbi", tokenizer, "data/ncbi/.cache").unwrap();
//!
//! for id in corpus.partition(Partition::Training) {
//!     let document = corpus.lookup(id).unwrap();
//!     for (sentence, tags) in document.tagged_sentences() {
//!         println!("{} tokens, {} mentions", sentence.len(), tags.len());
//!     }
//! }
//! ```
pub mod align;
pub mod bio;
pub mod cache;
pub mod corpus;
pub mod error;
pub mod loader;
pub mod quality;
pub mod tokenizer;
pub mod types;

// Re-export primary API
pub use align::{align, token_span};
pub use bio::{render_conll, sentence_labels, BioLabel};
pub use cache::{get_or_compute, DocumentCache, FsDocumentCache, MemoryDocumentCache};
pub use corpus::Corpus;
pub use error::{CorpusError, Result};
pub use loader::{load_directory, CorpusConfig, LoadedDocument};
pub use quality::{AlignmentReport, Mismatch};
pub use tokenizer::{RegexTokenizer, Tokenizer, TokenizerConfig, WhitespaceTokenizer};
pub use types::{Annotation, Document, Partition, RawDocument, Region, Sentence, Tag};
