pub mod annotation;
pub mod document;
pub mod partition;
pub mod sentence;

pub use annotation::{Annotation, Region};
pub use document::{Document, RawDocument, Tag};
pub use partition::Partition;
pub use sentence::Sentence;

pub(crate) use document::char_slice;
