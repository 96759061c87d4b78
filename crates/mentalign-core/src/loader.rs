//! # Raw Corpus Loader
//!
//! Reads PubTator-style corpus files: one file per partition, documents
//! separated by blank lines, each document a title line, a body line and
//! any number of tab-separated mention rows:
//!
//! ```text
//! 10021369|t|Identification of APC2, a homologue of the adenomatous polyposis coli tumour suppressor.
//! 10021369|a|The adenomatous polyposis coli (APC) tumour-suppressor protein ...
//! 10021369	43	76	adenomatous polyposis coli tumour	Modifier	D011125
//! ```
//!
//! Every mention is checked against the document string before it is
//! accepted; a mismatch fails the whole load.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{CorpusError, Result};
use crate::types::{char_slice, Annotation, Partition, RawDocument, Region};

/// Number of tab-separated fields in a mention row.
const MENTION_FIELDS: usize = 6;

/// Configuration for discovering and partitioning corpus files.
#[derive(Debug, Clone)]
pub struct CorpusConfig {
    /// Extension (without the dot) of the files to load.
    pub extension: String,
    /// File name to partition table.
    pub partition_files: Vec<(String, Partition)>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            extension: "txt".to_string(),
            partition_files: vec![
                ("NCBItrainset_corpus.txt".to_string(), Partition::Training),
                ("NCBIdevelopset_corpus.txt".to_string(), Partition::Development),
                ("NCBItestset_corpus.txt".to_string(), Partition::Testing),
            ],
        }
    }
}

impl CorpusConfig {
    /// Create a configuration for the NCBI disease corpus file names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the extension of the files to load.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    /// Replace the file-to-partition table.
    pub fn with_partition_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = (S, Partition)>,
        S: Into<String>,
    {
        self.partition_files = files
            .into_iter()
            .map(|(name, partition)| (name.into(), partition))
            .collect();
        self
    }

    /// Add (or override) a single file mapping.
    pub fn with_partition_file(mut self, name: impl Into<String>, partition: Partition) -> Self {
        let name = name.into();
        self.partition_files.retain(|(existing, _)| *existing != name);
        self.partition_files.push((name, partition));
        self
    }

    /// Partition for a file name, if the table knows it.
    pub fn partition_for(&self, file_name: &str) -> Option<Partition> {
        self.partition_files
            .iter()
            .find(|(name, _)| name == file_name)
            .map(|(_, partition)| *partition)
    }
}

/// A document read from disk together with its validated mentions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub raw: RawDocument,
    pub partition: Partition,
    pub annotations: Vec<Annotation>,
}

/// A parsed record before partition assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub raw: RawDocument,
    pub annotations: Vec<Annotation>,
}

/// Loads every corpus file in `dir`, in file name order.
///
/// Only regular files with the configured extension are considered;
/// subdirectories are not searched.
///
/// # Errors
///
/// Fails on the first unreadable file, unrecognized file name, malformed
/// record, mention whose text does not match its offsets, or document id
/// seen twice.
pub fn load_directory(dir: impl AsRef<Path>, config: &CorpusConfig) -> Result<Vec<LoadedDocument>> {
    let dir = dir.as_ref();
    let files = discover_files(dir, config)?;
    info!("Loading {} corpus files from {}", files.len(), dir.display());

    let mut seen = HashSet::new();
    let mut loaded = Vec::new();

    for path in files {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        let partition = config
            .partition_for(file_name)
            .ok_or_else(|| CorpusError::UnrecognizedFile { path: path.clone() })?;

        let content = fs::read_to_string(&path).map_err(|e| CorpusError::io(&path, e))?;
        let records = parse_records(&path, &content)?;
        debug!("{}: {} documents -> {}", path.display(), records.len(), partition);

        for record in records {
            if !seen.insert(record.raw.id.clone()) {
                return Err(CorpusError::DuplicateDocument { id: record.raw.id });
            }
            loaded.push(LoadedDocument {
                raw: record.raw,
                partition,
                annotations: record.annotations,
            });
        }
    }

    Ok(loaded)
}

/// Files in `dir` with the configured extension, sorted by path.
fn discover_files(dir: &Path, config: &CorpusConfig) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| CorpusError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| CorpusError::io(dir, e))?.path();
        let matches_ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == config.extension);
        if matches_ext && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Parses the content of one corpus file. `path` is only used in errors.
pub fn parse_records(path: &Path, content: &str) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    let mut block: Vec<(usize, &str)> = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let row = line.trim();
        if row.is_empty() {
            if !block.is_empty() {
                records.push(parse_record(path, &block)?);
                block.clear();
            }
            continue;
        }
        block.push((idx + 1, row));
    }
    if !block.is_empty() {
        records.push(parse_record(path, &block)?);
    }

    Ok(records)
}

/// A classified corpus line.
enum Row<'a> {
    /// `id|t|title` or `id|a|body`.
    Marker { id: &'a str, kind: &'a str, text: &'a str },
    /// Tab-separated mention fields.
    Mention(Vec<&'a str>),
}

fn classify(row: &str) -> Row<'_> {
    let fields: Vec<&str> = row.splitn(3, '|').collect();
    if fields.len() > 1 && matches!(fields[1], "t" | "a") {
        Row::Marker {
            id: fields[0],
            kind: fields[1],
            text: fields.get(2).copied().unwrap_or_default(),
        }
    } else {
        Row::Mention(row.split('\t').collect())
    }
}

fn malformed(path: &Path, line: usize, reason: impl Into<String>) -> CorpusError {
    CorpusError::MalformedRecord {
        path: path.to_path_buf(),
        line,
        reason: reason.into(),
    }
}

fn marker_line<'a>(
    path: &Path,
    block: &[(usize, &'a str)],
    index: usize,
    want: &str,
) -> Result<(&'a str, &'a str)> {
    let Some(&(line, row)) = block.get(index) else {
        let line = block.last().map_or(0, |(line, _)| *line);
        return Err(malformed(path, line, format!("document ends before its `|{want}|` line")));
    };
    match classify(row) {
        Row::Marker { id, kind, text } if kind == want => Ok((id, text)),
        _ => Err(malformed(path, line, format!("expected `id|{want}|text`"))),
    }
}

fn parse_record(path: &Path, block: &[(usize, &str)]) -> Result<Record> {
    let (id, title) = marker_line(path, block, 0, "t")?;
    let (body_id, body) = marker_line(path, block, 1, "a")?;
    if body_id != id {
        return Err(malformed(
            path,
            block[1].0,
            format!("body id {body_id} does not match title id {id}"),
        ));
    }

    let raw = RawDocument::new(id, title, body);
    let doc_str = raw.document_string();
    let title_len = raw.title.chars().count();

    let mut annotations = Vec::with_capacity(block.len().saturating_sub(2));
    for &(line, row) in &block[2..] {
        let Row::Mention(fields) = classify(row) else {
            return Err(malformed(path, line, "unexpected title/body line inside a document"));
        };
        let annotation = parse_mention(path, line, &raw.id, &fields, &doc_str, title_len)?;
        annotations.push(annotation);
    }

    Ok(Record { raw, annotations })
}

fn parse_mention(
    path: &Path,
    line: usize,
    id: &str,
    fields: &[&str],
    doc_str: &str,
    title_len: usize,
) -> Result<Annotation> {
    let [row_id, start, end, text, mention_type, concept_id] = fields else {
        return Err(malformed(
            path,
            line,
            format!("expected {MENTION_FIELDS} tab-separated fields, found {}", fields.len()),
        ));
    };
    if *row_id != id {
        return Err(malformed(path, line, format!("mention id {row_id} inside document {id}")));
    }
    let start: usize = start
        .parse()
        .map_err(|_| malformed(path, line, format!("invalid start offset {start:?}")))?;
    let end: usize = end
        .parse()
        .map_err(|_| malformed(path, line, format!("invalid end offset {end:?}")))?;

    let found = char_slice(doc_str, start, end);
    if found != Some(*text) {
        return Err(CorpusError::IntegrityViolation {
            id: id.to_string(),
            line,
            expected: text.to_string(),
            found: found.unwrap_or_default().to_string(),
        });
    }

    Ok(Annotation {
        region: Region::classify(end, title_len),
        start,
        end,
        text: text.to_string(),
        mention_type: mention_type.to_string(),
        concept_id: concept_id.to_string(),
    })
}
