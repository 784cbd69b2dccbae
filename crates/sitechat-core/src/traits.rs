use crate::error::{Error, Result};
use crate::types::{Metric, Neighbor};

/// Maps text to fixed-length dense vectors.
///
/// Implementations must be deterministic for identical input and must be safe
/// to call from several threads at once.
pub trait Embedder: Send + Sync {
    /// Stable identifier of the model, recorded in stores built with it.
    fn id(&self) -> &str;
    fn dim(&self) -> usize;
    /// Maximum number of tokens considered per input; longer input is truncated.
    fn max_len(&self) -> usize;
    /// One vector per input text, in input order.
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        self.embed(&[text.to_string()])?
            .pop()
            .ok_or_else(|| Error::Embedding("backend returned no vector for a single input".to_string()))
    }
}

/// A read-only k-nearest-neighbor structure over a corpus of vectors.
pub trait VectorIndex: Send + Sync {
    fn len(&self) -> usize;
    fn dim(&self) -> usize;
    fn metric(&self) -> Metric;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Up to `k` neighbors ordered by ascending distance, ties broken by
    /// ascending position. `k` larger than the corpus is clamped.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>>;
}
