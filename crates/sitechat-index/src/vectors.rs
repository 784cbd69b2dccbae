use sitechat_core::{Error, Metric, Result};

use crate::distance::{dot, normalized, squared_euclidean};

/// Row-major storage of corpus vectors, prepared for one metric.
///
/// For cosine every row is L2-normalized up front, so the distance reduces to
/// `1 - dot` and Euclidean geometry between rows is consistent with it
/// (`|a - b|^2 = 2 * cosine_distance` for unit vectors). Both index backends
/// share this type so their distances are bit-identical.
#[derive(Debug, Clone)]
pub(crate) struct VectorSet {
    metric: Metric,
    dim: usize,
    len: usize,
    data: Vec<f32>,
}

impl VectorSet {
    pub(crate) fn build(metric: Metric, dim: usize, embeddings: &[Vec<f32>]) -> Result<Self> {
        let mut data = Vec::with_capacity(embeddings.len() * dim);
        for (position, v) in embeddings.iter().enumerate() {
            if v.len() != dim {
                return Err(Error::DimensionMismatch { position, expected: dim, actual: v.len() });
            }
            match metric {
                Metric::Cosine => data.extend(normalized(v)),
                Metric::SquaredEuclidean => data.extend_from_slice(v),
            }
        }
        Ok(Self { metric, dim, len: embeddings.len(), data })
    }

    pub(crate) fn metric(&self) -> Metric {
        self.metric
    }

    pub(crate) fn dim(&self) -> usize {
        self.dim
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn row(&self, position: usize) -> &[f32] {
        &self.data[position * self.dim..(position + 1) * self.dim]
    }

    /// Validates the query dimension and applies the same preparation as the rows.
    pub(crate) fn prepare_query(&self, query: &[f32]) -> Result<Vec<f32>> {
        if query.len() != self.dim {
            return Err(Error::DimensionMismatch { position: 0, expected: self.dim, actual: query.len() });
        }
        Ok(match self.metric {
            Metric::Cosine => normalized(query),
            Metric::SquaredEuclidean => query.to_vec(),
        })
    }

    /// Metric distance between a prepared query and row `position`.
    pub(crate) fn distance_to(&self, query: &[f32], position: usize) -> f32 {
        let row = self.row(position);
        match self.metric {
            Metric::Cosine => (1.0 - dot(query, row)).max(0.0),
            Metric::SquaredEuclidean => squared_euclidean(query, row),
        }
    }

    /// Euclidean (not squared) distance between a prepared query and a row.
    pub(crate) fn euclidean_to(&self, query: &[f32], position: usize) -> f32 {
        squared_euclidean(query, self.row(position)).sqrt()
    }

    /// Upper bound, in Euclidean units, on how far a point at metric
    /// distance `d` can be from the query.
    pub(crate) fn euclidean_radius(&self, d: f32) -> f32 {
        match self.metric {
            Metric::Cosine => (2.0 * d.max(0.0)).sqrt(),
            Metric::SquaredEuclidean => d.max(0.0).sqrt(),
        }
    }
}
