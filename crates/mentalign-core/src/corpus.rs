//! # Corpus
//!
//! Owns the tables produced by the loader and serves tokenized, aligned
//! documents on demand through the document cache.

use std::cell::OnceCell;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::cache::{get_or_compute, DocumentCache, FsDocumentCache};
use crate::error::{CorpusError, Result};
use crate::loader::{load_directory, CorpusConfig, LoadedDocument};
use crate::quality::{evaluate, AlignmentReport};
use crate::tokenizer::Tokenizer;
use crate::types::{Annotation, Document, Partition, RawDocument};

struct Entry {
    raw: RawDocument,
    partition: Partition,
    annotations: Vec<Annotation>,
    document: OnceCell<Document>,
}

/// An annotated corpus with lazily tokenized documents.
///
/// All tables are fixed once the corpus is built. Each document is
/// tokenized and aligned (or read from the cache) on its first lookup and
/// kept in memory afterwards.
pub struct Corpus<T, C = FsDocumentCache> {
    tokenizer: T,
    cache: C,
    order: Vec<String>,
    entries: HashMap<String, Entry>,
    partitions: BTreeMap<Partition, Vec<String>>,
}

impl<T: Tokenizer> Corpus<T, FsDocumentCache> {
    /// Loads the corpus files in `path` with the default file table and a
    /// filesystem cache rooted at `cache_root`.
    ///
    /// # Errors
    ///
    /// Any load-time error from [`load_directory`], or an I/O error creating
    /// the cache directory.
    pub fn load(
        path: impl AsRef<Path>,
        tokenizer: T,
        cache_root: impl Into<PathBuf>,
    ) -> Result<Self> {
        let cache = FsDocumentCache::new(cache_root)?;
        Self::load_with(path, tokenizer, cache, &CorpusConfig::default())
    }
}

impl<T: Tokenizer, C: DocumentCache> Corpus<T, C> {
    /// Loads the corpus files in `path` using any cache and file table.
    pub fn load_with(
        path: impl AsRef<Path>,
        tokenizer: T,
        cache: C,
        config: &CorpusConfig,
    ) -> Result<Self> {
        let documents = load_directory(path, config)?;
        let corpus = Self::from_loaded(documents, tokenizer, cache)?;

        let sizes: Vec<String> = corpus
            .partitions()
            .map(|(partition, ids)| format!("{partition}={}", ids.len()))
            .collect();
        let mentions: usize = corpus.entries.values().map(|e| e.annotations.len()).sum();
        info!(
            "Loaded {} documents ({}), {} mentions",
            corpus.len(),
            sizes.join(", "),
            mentions
        );

        Ok(corpus)
    }

    /// Builds a corpus from already-loaded documents, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::DuplicateDocument` if an id occurs twice.
    pub fn from_loaded(documents: Vec<LoadedDocument>, tokenizer: T, cache: C) -> Result<Self> {
        let mut order = Vec::with_capacity(documents.len());
        let mut entries = HashMap::with_capacity(documents.len());
        let mut partitions: BTreeMap<Partition, Vec<String>> = BTreeMap::new();

        for loaded in documents {
            let id = loaded.raw.id.clone();
            if entries.contains_key(&id) {
                return Err(CorpusError::DuplicateDocument { id });
            }
            partitions.entry(loaded.partition).or_default().push(id.clone());
            order.push(id.clone());
            entries.insert(
                id,
                Entry {
                    raw: loaded.raw,
                    partition: loaded.partition,
                    annotations: loaded.annotations,
                    document: OnceCell::new(),
                },
            );
        }

        Ok(Self {
            tokenizer,
            cache,
            order,
            entries,
            partitions,
        })
    }

    /// Returns the tokenized and aligned document for `id`.
    ///
    /// # Errors
    ///
    /// `CorpusError::NotFound` if `id` was not loaded; cache and I/O errors
    /// from the first access.
    pub fn lookup(&self, id: &str) -> Result<&Document> {
        let entry = self
            .entries
            .get(id)
            .ok_or_else(|| CorpusError::NotFound { id: id.to_string() })?;

        if let Some(document) = entry.document.get() {
            return Ok(document);
        }
        let document =
            get_or_compute(&self.cache, &self.tokenizer, &entry.raw, &entry.annotations)?;
        Ok(entry.document.get_or_init(|| document))
    }

    /// Looks up every document in load order. Each call starts over.
    pub fn iter(&self) -> impl Iterator<Item = Result<&Document>> + '_ {
        self.order.iter().map(move |id| self.lookup(id))
    }

    /// Document ids in load order.
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// The untokenized record for `id`.
    pub fn raw(&self, id: &str) -> Option<&RawDocument> {
        self.entries.get(id).map(|e| &e.raw)
    }

    /// Gold mentions of `id`; empty for documents without any.
    pub fn annotations(&self, id: &str) -> Option<&[Annotation]> {
        self.entries.get(id).map(|e| e.annotations.as_slice())
    }

    /// Ids in `partition`, in load order.
    pub fn partition(&self, partition: Partition) -> &[String] {
        self.partitions
            .get(&partition)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Ids in the partition called `name` (`training`, `development`,
    /// `testing`).
    pub fn partition_by_name(&self, name: &str) -> Result<&[String]> {
        Ok(self.partition(name.parse()?))
    }

    /// Non-empty partitions with their ids.
    pub fn partitions(&self) -> impl Iterator<Item = (Partition, &[String])> {
        self.partitions
            .iter()
            .map(|(partition, ids)| (*partition, ids.as_slice()))
    }

    /// The partition `id` was loaded into.
    pub fn partition_of(&self, id: &str) -> Option<Partition> {
        self.entries.get(id).map(|e| e.partition)
    }

    /// Measures how well the mentions of `id` aligned.
    pub fn alignment_report(&self, id: &str) -> Result<AlignmentReport> {
        let document = self.lookup(id)?;
        let annotations = self.annotations(id).unwrap_or_default();
        Ok(evaluate(document, annotations.len()))
    }

    /// Combined alignment report over a partition, or the whole corpus.
    pub fn corpus_report(&self, partition: Option<Partition>) -> Result<AlignmentReport> {
        let ids = match partition {
            Some(partition) => self.partition(partition),
            None => self.ids(),
        };
        let mut report = AlignmentReport::default();
        for id in ids {
            report.merge(self.alignment_report(id)?);
        }
        Ok(report)
    }

    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }
}
