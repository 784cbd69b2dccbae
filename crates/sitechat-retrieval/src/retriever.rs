use std::sync::{Arc, Mutex};

use sitechat_core::{Embedder, Error, Result, RetrievedChunk, Settings, VectorIndex};
use sitechat_index::{build_index, store, StoreRecord};

use crate::builder;

/// A loaded store: the ordered chunks and an index over their embeddings.
pub struct Corpus {
    model: String,
    chunks: Vec<String>,
    index: Box<dyn VectorIndex>,
}

impl Corpus {
    pub fn from_record(record: StoreRecord, settings: &Settings) -> Result<Self> {
        let index = build_index(
            settings.index.kind,
            settings.index.metric,
            record.dimension,
            &record.embeddings,
        )?;
        Ok(Self { model: record.model, chunks: record.chunks, index })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    pub fn index(&self) -> &dyn VectorIndex {
        self.index.as_ref()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Nearest chunks to an already embedded query.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<RetrievedChunk>> {
        if self.index.len() != self.chunks.len() {
            return Err(Error::Search(format!(
                "index holds {} vectors but the corpus has {} chunks",
                self.index.len(),
                self.chunks.len()
            )));
        }
        if self.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        self.index
            .search(query, k)?
            .into_iter()
            .map(|n| {
                let text = self.chunks.get(n.position).ok_or_else(|| {
                    Error::Search(format!(
                        "index returned position {} outside {} chunks",
                        n.position,
                        self.chunks.len()
                    ))
                })?;
                Ok(RetrievedChunk { position: n.position, text: text.clone(), score: n.distance })
            })
            .collect()
    }
}

/// Answers top-k queries against the configured store.
///
/// Construction is cheap. The store is loaded on the first [`retrieve`]
/// (or [`warm`]) and kept for the lifetime of the retriever; concurrent first
/// calls load it once.
///
/// [`retrieve`]: Retriever::retrieve
/// [`warm`]: Retriever::warm
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    settings: Settings,
    corpus: Mutex<Option<Arc<Corpus>>>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, settings: Settings) -> Self {
        Self { embedder, settings, corpus: Mutex::new(None) }
    }

    /// A retriever serving an already built corpus; the store is never read.
    pub fn with_corpus(embedder: Arc<dyn Embedder>, settings: Settings, corpus: Corpus) -> Result<Self> {
        check_dimension(embedder.as_ref(), corpus.index.dim())?;
        Ok(Self { embedder, settings, corpus: Mutex::new(Some(Arc::new(corpus))) })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    /// Loads the corpus if it is not loaded yet and returns it.
    pub fn warm(&self) -> Result<Arc<Corpus>> {
        let mut slot = self
            .corpus
            .lock()
            .map_err(|_| Error::Search("retriever state lock poisoned".to_string()))?;
        if let Some(corpus) = slot.as_ref() {
            return Ok(Arc::clone(corpus));
        }
        let corpus = Arc::new(self.load_corpus()?);
        *slot = Some(Arc::clone(&corpus));
        Ok(corpus)
    }

    /// Up to `k` chunks nearest to `query`, nearest first.
    pub fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>> {
        let corpus = self.warm()?;
        if corpus.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        let query_vec = self.embedder.embed_one(query)?;
        let hits = corpus.search(&query_vec, k)?;
        tracing::debug!(k, hits = hits.len(), "retrieved chunks");
        Ok(hits)
    }

    /// [`retrieve`](Retriever::retrieve) with `retrieval.top_k` from the settings.
    pub fn retrieve_default(&self, query: &str) -> Result<Vec<RetrievedChunk>> {
        self.retrieve(query, self.settings.retrieval.top_k)
    }

    /// The chunk texts of `hits`, in rank order.
    pub fn context(hits: &[RetrievedChunk]) -> Vec<String> {
        hits.iter().map(|h| h.text.clone()).collect()
    }

    fn load_corpus(&self) -> Result<Corpus> {
        let store_settings = &self.settings.store;
        let record = match store::load(&store_settings.path) {
            Ok(record) => record,
            Err(Error::StoreNotFound(path)) => match store_settings.source.as_deref() {
                Some(source) if store_settings.rebuild_if_missing => {
                    tracing::warn!(store = %path.display(), source = %source.display(), "store missing, building it");
                    builder::build_store(&self.settings, self.embedder.as_ref(), source, &path)?
                }
                _ => return Err(Error::StoreNotFound(path)),
            },
            Err(e) => return Err(e),
        };

        check_dimension(self.embedder.as_ref(), record.dimension)?;
        if record.model != self.embedder.id() {
            tracing::warn!(
                store_model = %record.model,
                embedder = self.embedder.id(),
                "store was built with a different embedding model"
            );
        }
        Corpus::from_record(record, &self.settings)
    }
}

fn check_dimension(embedder: &dyn Embedder, corpus_dim: usize) -> Result<()> {
    if embedder.dim() != corpus_dim {
        return Err(Error::DimensionMismatch { position: 0, expected: corpus_dim, actual: embedder.dim() });
    }
    Ok(())
}
