use sitechat_core::{Metric, Neighbor, Result, VectorIndex};

use crate::vectors::VectorSet;

/// Exact index that scores every vector on each query.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    vectors: VectorSet,
}

impl FlatIndex {
    pub fn build(metric: Metric, dim: usize, embeddings: &[Vec<f32>]) -> Result<Self> {
        Ok(Self { vectors: VectorSet::build(metric, dim, embeddings)? })
    }
}

impl VectorIndex for FlatIndex {
    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn dim(&self) -> usize {
        self.vectors.dim()
    }

    fn metric(&self) -> Metric {
        self.vectors.metric()
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if k == 0 || self.vectors.len() == 0 {
            return Ok(Vec::new());
        }
        let query = self.vectors.prepare_query(query)?;
        let mut scored: Vec<Neighbor> = (0..self.vectors.len())
            .map(|position| Neighbor::new(position, self.vectors.distance_to(&query, position)))
            .collect();
        let k = k.min(scored.len());
        if k < scored.len() {
            scored.select_nth_unstable(k - 1);
            scored.truncate(k);
        }
        scored.sort_unstable();
        Ok(scored)
    }
}
