//! # Document Cache
//!
//! Stores fully tokenized and aligned documents so a document is only
//! tokenized once. A stored record is authoritative: once written it is
//! returned verbatim and never re-tokenized or re-aligned.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::align::align;
use crate::error::{CorpusError, Result};
use crate::tokenizer::Tokenizer;
use crate::types::{Annotation, Document, RawDocument};

/// Storage for aligned documents, keyed by document id.
pub trait DocumentCache {
    /// Returns the stored document for `id`, or `None` on a miss.
    fn try_get(&self, id: &str) -> Result<Option<Document>>;

    /// Stores `document` under its id, replacing any previous record.
    fn put(&self, document: &Document) -> Result<()>;
}

/// One JSON file per document under a root directory.
///
/// The presence of `<root>/<id>.json` is the only hit signal; there is no
/// versioning or checksum, and no eviction. Records are written to a
/// temporary file and renamed into place.
#[derive(Debug, Clone)]
pub struct FsDocumentCache {
    root: PathBuf,
}

impl FsDocumentCache {
    /// Opens (creating if needed) a cache rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::Io` if the directory cannot be created.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| CorpusError::io(&root, e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the record for `id`.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::InvalidDocumentId` for ids that are empty or
    /// would escape the cache root.
    pub fn record_path(&self, id: &str) -> Result<PathBuf> {
        let unsafe_id = id.is_empty()
            || id == "."
            || id.contains("..")
            || id.contains(['/', '\\', '\0']);
        if unsafe_id {
            return Err(CorpusError::InvalidDocumentId(id.to_string()));
        }
        Ok(self.root.join(format!("{id}.json")))
    }

    /// Returns `true` if a record exists for `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.record_path(id).is_ok_and(|path| path.is_file())
    }
}

impl DocumentCache for FsDocumentCache {
    fn try_get(&self, id: &str) -> Result<Option<Document>> {
        let path = self.record_path(id)?;
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CorpusError::io(path, e)),
        };
        let document = serde_json::from_str(&json)
            .map_err(|source| CorpusError::CacheDecode { path, source })?;
        Ok(Some(document))
    }

    fn put(&self, document: &Document) -> Result<()> {
        let path = self.record_path(&document.id)?;
        let json = serde_json::to_string(document).map_err(|source| CorpusError::CacheEncode {
            id: document.id.clone(),
            source,
        })?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| CorpusError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| CorpusError::io(&path, e))?;
        Ok(())
    }
}

/// In-process cache; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryDocumentCache {
    records: RefCell<HashMap<String, Document>>,
}

impl MemoryDocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl DocumentCache for MemoryDocumentCache {
    fn try_get(&self, id: &str) -> Result<Option<Document>> {
        Ok(self.records.borrow().get(id).cloned())
    }

    fn put(&self, document: &Document) -> Result<()> {
        self.records
            .borrow_mut()
            .insert(document.id.clone(), document.clone());
        Ok(())
    }
}

/// Returns the cached document for `raw`, or tokenizes, aligns and stores
/// it on a miss.
///
/// Documents without annotations get one empty tag list per sentence.
pub fn get_or_compute<C, T>(
    cache: &C,
    tokenizer: &T,
    raw: &RawDocument,
    annotations: &[Annotation],
) -> Result<Document>
where
    C: DocumentCache + ?Sized,
    T: Tokenizer + ?Sized,
{
    if let Some(document) = cache.try_get(&raw.id)? {
        debug!(id = %raw.id, "document cache hit");
        return Ok(document);
    }

    debug!(id = %raw.id, "document cache miss, tokenizing");
    let sentences = tokenizer.tokenize(&raw.document_string());
    let tags = align(annotations, &sentences);
    let document = Document::from_parts(raw, sentences, tags);

    cache.put(&document)?;
    Ok(document)
}
