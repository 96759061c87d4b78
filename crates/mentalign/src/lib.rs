//! # Mentalign
//!
//! Cached tokenization and gold-mention alignment for PubTator-style
//! biomedical corpora. This crate re-exports [`mentalign_core`].
pub use mentalign_core::*;
