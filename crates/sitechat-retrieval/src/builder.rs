//! Offline build path: corpus text file to saved store.

use std::fs;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};

use sitechat_core::{Chunker, Embedder, Error, Result, Settings};
use sitechat_index::{store, StoreRecord};

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

/// Chunks `text` and embeds every chunk in batches of
/// `settings.embedding.batch_size`.
pub fn build_record(settings: &Settings, embedder: &dyn Embedder, text: &str) -> Result<StoreRecord> {
    let chunker = Chunker::from_settings(&settings.chunking)?;
    let chunks = chunker.chunk(text);
    tracing::info!(
        chunks = chunks.len(),
        window = chunker.window(),
        overlap = chunker.overlap(),
        "chunked corpus"
    );

    let batch_size = settings.embedding.batch_size.max(1);
    let mut embeddings = Vec::with_capacity(chunks.len());
    let pb = progress_bar(chunks.len());
    for batch in chunks.chunks(batch_size) {
        let vectors = embedder.embed(batch)?;
        if vectors.len() != batch.len() {
            return Err(Error::Embedding(format!(
                "embedder returned {} vectors for a batch of {}",
                vectors.len(),
                batch.len()
            )));
        }
        embeddings.extend(vectors);
        pb.inc(batch.len() as u64);
    }
    pb.finish_and_clear();

    StoreRecord::new(embedder.id(), embedder.dim(), chunks, embeddings)
}

/// Reads the UTF-8 corpus at `input`, builds a record and saves it to
/// `output`, replacing any previous store.
pub fn build_store(settings: &Settings, embedder: &dyn Embedder, input: &Path, output: &Path) -> Result<StoreRecord> {
    let text =
        fs::read_to_string(input).map_err(|source| Error::CorpusRead { path: input.to_path_buf(), source })?;
    tracing::info!(input = %input.display(), bytes = text.len(), model = embedder.id(), "building store");
    let record = build_record(settings, embedder, &text)?;
    store::save(output, &record)?;
    Ok(record)
}
