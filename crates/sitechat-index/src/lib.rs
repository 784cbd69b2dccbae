//! Nearest-neighbor indexes and the persisted store.
//!
//! Two interchangeable [`VectorIndex`] backends are provided: [`FlatIndex`]
//! (exhaustive scan) and [`VpTreeIndex`] (vantage-point tree). Both return the
//! same ranking: ascending distance, ties broken by ascending position.

use sitechat_core::{IndexKind, Metric, Result, VectorIndex};

pub mod distance;
pub mod flat;
pub mod store;
mod vectors;
pub mod vptree;

pub use flat::FlatIndex;
pub use store::StoreRecord;
pub use vptree::VpTreeIndex;

/// Builds the configured backend over `embeddings`, all of which must have
/// length `dim`.
pub fn build_index(
    kind: IndexKind,
    metric: Metric,
    dim: usize,
    embeddings: &[Vec<f32>],
) -> Result<Box<dyn VectorIndex>> {
    tracing::info!(%kind, %metric, dim, vectors = embeddings.len(), "building vector index");
    Ok(match kind {
        IndexKind::Flat => Box::new(FlatIndex::build(metric, dim, embeddings)?),
        IndexKind::Vptree => Box::new(VpTreeIndex::build(metric, dim, embeddings)?),
    })
}
