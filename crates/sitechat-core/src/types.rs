//! Domain types shared by the index, store and retriever crates.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Distance metric used to rank neighbors.
///
/// Both metrics return a raw distance where **lower is more similar**. The
/// value is shown to users as a relevance figure, so callers that display it
/// must say which direction is better (see [`Metric::polarity`]).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// `1 - cos(a, b)`, in `[0, 2]`. A zero-magnitude vector has similarity 0.
    #[default]
    Cosine,
    /// `sum((a_i - b_i)^2)`, in `[0, inf)`.
    SquaredEuclidean,
}

impl Metric {
    pub fn polarity(self) -> &'static str {
        match self {
            Metric::Cosine => "cosine distance, lower is more relevant (0 = identical direction)",
            Metric::SquaredEuclidean => "squared euclidean distance, lower is more relevant (0 = identical)",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Cosine => f.write_str("cosine"),
            Metric::SquaredEuclidean => f.write_str("squared_euclidean"),
        }
    }
}

/// Which nearest-neighbor backend to build over the corpus.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    /// Exhaustive scan over every vector.
    #[default]
    Flat,
    /// Vantage-point tree. Returns the same neighbors as `Flat`.
    Vptree,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Flat => f.write_str("flat"),
            IndexKind::Vptree => f.write_str("vptree"),
        }
    }
}

/// One search result: a corpus position and its distance to the query.
///
/// Ordered by ascending distance, then ascending position, so sorting a
/// list of neighbors yields the reproducible ranking callers see.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: usize,
    pub distance: f32,
}

impl Neighbor {
    pub fn new(position: usize, distance: f32) -> Self {
        Self { position, distance }
    }
}

impl Eq for Neighbor {}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.position.cmp(&other.position))
    }
}

/// A chunk returned by the retriever together with its raw distance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievedChunk {
    pub position: usize,
    pub text: String,
    /// Raw distance under the index metric. Lower is better.
    pub score: f32,
}
