//! Single-file persistence of a built corpus.
//!
//! The store holds the ordered chunks, their raw embeddings and the
//! dimension as one self-describing JSON document. Indexes are not
//! serialized; they are rebuilt from the embeddings when the store is loaded.

use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use sitechat_core::{Error, Result};

pub const STORE_FORMAT: &str = "sitechat-store";
pub const STORE_VERSION: u32 = 1;

/// The durable unit: `chunks[i]` is the text whose embedding is `embeddings[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreRecord {
    /// Identifier of the embedder that produced `embeddings`.
    pub model: String,
    pub dimension: usize,
    pub chunks: Vec<String>,
    pub embeddings: Vec<Vec<f32>>,
    pub built_at_ms: i64,
}

impl StoreRecord {
    /// Checks that chunks and embeddings are position-aligned and that every
    /// embedding has `dimension` components.
    pub fn new(
        model: impl Into<String>,
        dimension: usize,
        chunks: Vec<String>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Self> {
        if chunks.len() != embeddings.len() {
            return Err(Error::Embedding(format!(
                "{} embeddings produced for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }
        if let Some((position, v)) = embeddings.iter().enumerate().find(|(_, v)| v.len() != dimension) {
            return Err(Error::DimensionMismatch { position, expected: dimension, actual: v.len() });
        }
        Ok(Self {
            model: model.into(),
            dimension,
            chunks,
            embeddings,
            built_at_ms: chrono::Utc::now().timestamp_millis(),
        })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
    format: &'a str,
    version: u32,
    model: &'a str,
    dimension: usize,
    built_at_ms: i64,
    checksum: String,
    chunks: &'a [String],
    embeddings: &'a [Vec<f32>],
}

#[derive(Deserialize)]
struct StoreFile {
    format: String,
    version: u32,
    model: String,
    dimension: usize,
    built_at_ms: i64,
    checksum: String,
    chunks: Vec<String>,
    embeddings: Vec<Vec<f32>>,
}

/// blake3 over the shape and chunk text. Embedding values are excluded:
/// their decimal form in JSON is not guaranteed to round-trip bit-exactly.
fn checksum(dimension: usize, count: usize, chunks: &[String]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(dimension as u64).to_le_bytes());
    hasher.update(&(count as u64).to_le_bytes());
    for chunk in chunks {
        hasher.update(&(chunk.len() as u64).to_le_bytes());
        hasher.update(chunk.as_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// Writes `record` to `path`, replacing any existing file.
///
/// Parent directories are created as needed. The document is written to a
/// temporary file in the destination directory and renamed into place, so a
/// reader never observes a half-written store.
pub fn save(path: &Path, record: &StoreRecord) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;

    let doc = StoreFileRef {
        format: STORE_FORMAT,
        version: STORE_VERSION,
        model: &record.model,
        dimension: record.dimension,
        built_at_ms: record.built_at_ms,
        checksum: checksum(record.dimension, record.embeddings.len(), &record.chunks),
        chunks: &record.chunks,
        embeddings: &record.embeddings,
    };

    let mut tmp = NamedTempFile::new_in(&parent)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer(&mut writer, &doc).map_err(std::io::Error::from)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    tracing::info!(
        path = %path.display(),
        chunks = record.len(),
        dimension = record.dimension,
        model = %record.model,
        "saved store"
    );
    Ok(())
}

/// Reads and validates the store at `path`.
///
/// Fails with [`Error::StoreNotFound`] when the file is missing,
/// [`Error::StoreCorrupt`] when it does not parse, lacks required keys, has
/// an unknown format or version, or fails its checksum, and
/// [`Error::StoreInconsistent`] when chunks and embeddings are not aligned.
pub fn load(path: &Path) -> Result<StoreRecord> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(Error::StoreNotFound(path.to_path_buf())),
        Err(e) => return Err(e.into()),
    };
    let corrupt = |reason: String| Error::StoreCorrupt { path: path.to_path_buf(), reason };
    let inconsistent = |reason: String| Error::StoreInconsistent { path: path.to_path_buf(), reason };

    let file: StoreFile = serde_json::from_slice(&bytes).map_err(|e| corrupt(e.to_string()))?;
    if file.format != STORE_FORMAT {
        return Err(corrupt(format!("unknown format tag {:?}", file.format)));
    }
    if file.version != STORE_VERSION {
        return Err(corrupt(format!("unsupported version {} (expected {STORE_VERSION})", file.version)));
    }
    if file.chunks.len() != file.embeddings.len() {
        return Err(inconsistent(format!(
            "{} chunks but {} embeddings",
            file.chunks.len(),
            file.embeddings.len()
        )));
    }
    if let Some((position, v)) = file.embeddings.iter().enumerate().find(|(_, v)| v.len() != file.dimension) {
        return Err(inconsistent(format!(
            "embedding {position} has {} components, store dimension is {}",
            v.len(),
            file.dimension
        )));
    }
    if checksum(file.dimension, file.embeddings.len(), &file.chunks) != file.checksum {
        return Err(corrupt("checksum mismatch".to_string()));
    }

    tracing::info!(path = %path.display(), chunks = file.chunks.len(), dimension = file.dimension, "loaded store");
    Ok(StoreRecord {
        model: file.model,
        dimension: file.dimension,
        chunks: file.chunks,
        embeddings: file.embeddings,
        built_at_ms: file.built_at_ms,
    })
}
