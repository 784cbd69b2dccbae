use proptest::prelude::*;

use sitechat_core::{Embedder, Error, IndexKind, Metric, VectorIndex};
use sitechat_embed::HashingEmbedder;
use sitechat_index::build_index;

const KINDS: [IndexKind; 2] = [IndexKind::Flat, IndexKind::Vptree];
const METRICS: [Metric; 2] = [Metric::Cosine, Metric::SquaredEuclidean];

fn positions(index: &dyn VectorIndex, query: &[f32], k: usize) -> Vec<usize> {
    index.search(query, k).expect("search").into_iter().map(|n| n.position).collect()
}

#[test]
fn duplicate_chunks_tie_and_lower_position_wins() {
    let embedder = HashingEmbedder::new(64).expect("embedder");
    let chunks: Vec<String> = ["cat sat", "dog ran", "cat sat"].iter().map(|s| s.to_string()).collect();
    let embeddings = embedder.embed(&chunks).expect("embed");
    let query = embedder.embed_one("cat sat").expect("embed query");

    for kind in KINDS {
        for metric in METRICS {
            let index = build_index(kind, metric, 64, &embeddings).expect("build");
            let hits = index.search(&query, 3).expect("search");
            assert_eq!(hits.iter().map(|h| h.position).collect::<Vec<_>>(), vec![0, 2, 1], "{kind}/{metric}");
            assert!(hits[0].distance.abs() < 1e-6, "{kind}/{metric}: top distance {}", hits[0].distance);
            assert_eq!(hits[0].distance, hits[1].distance, "{kind}/{metric}: duplicates tie exactly");
            assert!(hits[2].distance > hits[1].distance);
        }
    }
}

#[test]
fn k_is_clamped_to_corpus_size() {
    let embeddings = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]];
    for kind in KINDS {
        let index = build_index(kind, Metric::Cosine, 2, &embeddings).expect("build");
        assert_eq!(index.search(&[1.0, 0.2], 10).expect("search").len(), 3);
        assert_eq!(index.search(&[1.0, 0.2], 0).expect("search").len(), 0);
    }
}

#[test]
fn empty_corpus_returns_no_neighbors() {
    for kind in KINDS {
        let index = build_index(kind, Metric::Cosine, 8, &[]).expect("build");
        assert!(index.is_empty());
        assert!(index.search(&[0.0; 8], 5).expect("search").is_empty());
    }
}

#[test]
fn mismatched_corpus_dimension_is_rejected() {
    let embeddings = vec![vec![1.0, 0.0, 0.0], vec![1.0, 0.0], vec![0.0, 0.0, 1.0]];
    for kind in KINDS {
        match build_index(kind, Metric::Cosine, 3, &embeddings) {
            Err(Error::DimensionMismatch { position, expected, actual }) => {
                assert_eq!((position, expected, actual), (1, 3, 2));
            }
            Err(other) => panic!("expected DimensionMismatch, got {other:?}"),
            Ok(_) => panic!("expected DimensionMismatch, got an index"),
        }
    }
}

#[test]
fn mismatched_query_dimension_is_rejected() {
    for kind in KINDS {
        let index = build_index(kind, Metric::Cosine, 2, &[vec![1.0, 0.0]]).expect("build");
        assert!(matches!(index.search(&[1.0, 0.0, 0.0], 1), Err(Error::DimensionMismatch { .. })));
    }
}

#[test]
fn squared_euclidean_reports_raw_distances() {
    let embeddings = vec![vec![0.0, 0.0], vec![3.0, 4.0], vec![1.0, 0.0]];
    for kind in KINDS {
        let index = build_index(kind, Metric::SquaredEuclidean, 2, &embeddings).expect("build");
        let hits = index.search(&[0.0, 0.0], 3).expect("search");
        let got: Vec<(usize, f32)> = hits.iter().map(|h| (h.position, h.distance)).collect();
        assert_eq!(got, vec![(0, 0.0), (2, 1.0), (1, 25.0)], "{kind}");
    }
}

#[test]
fn cosine_against_zero_vector_is_distance_one() {
    let embeddings = vec![vec![0.0, 0.0], vec![2.0, 0.0], vec![-1.0, 0.0]];
    for kind in KINDS {
        let index = build_index(kind, Metric::Cosine, 2, &embeddings).expect("build");
        let hits = index.search(&[5.0, 0.0], 3).expect("search");
        let got: Vec<(usize, f32)> = hits.iter().map(|h| (h.position, h.distance)).collect();
        assert_eq!(got, vec![(1, 0.0), (0, 1.0), (2, 2.0)], "{kind}");
    }
}

#[test]
fn rebuilding_yields_identical_rankings() {
    let embedder = HashingEmbedder::new(32).expect("embedder");
    let chunks: Vec<String> = (0..50).map(|i| format!("page {i} about topic {}", i % 7)).collect();
    let embeddings = embedder.embed(&chunks).expect("embed");
    let query = embedder.embed_one("topic 3").expect("embed query");
    for kind in KINDS {
        let a = build_index(kind, Metric::Cosine, 32, &embeddings).expect("build");
        let b = build_index(kind, Metric::Cosine, 32, &embeddings).expect("build");
        assert_eq!(a.search(&query, 10).expect("search"), b.search(&query, 10).expect("search"));
    }
}

fn corpus_strategy() -> impl Strategy<Value = (usize, Vec<Vec<f32>>, Vec<f32>)> {
    (1usize..6).prop_flat_map(|dim| {
        // Small integer components produce plenty of exact ties.
        let component = (-3i8..=3).prop_map(f32::from);
        (
            Just(dim),
            prop::collection::vec(prop::collection::vec(component.clone(), dim), 0..60),
            prop::collection::vec(component, dim),
        )
    })
}

proptest! {
    #[test]
    fn vptree_matches_flat((dim, embeddings, query) in corpus_strategy(), k in 1usize..12) {
        for metric in METRICS {
            let flat = build_index(IndexKind::Flat, metric, dim, &embeddings).expect("flat");
            let tree = build_index(IndexKind::Vptree, metric, dim, &embeddings).expect("vptree");
            let expected = flat.search(&query, k).expect("flat search");
            prop_assert_eq!(tree.search(&query, k).expect("tree search"), expected.clone());
            prop_assert_eq!(positions(flat.as_ref(), &query, k).len(), k.min(embeddings.len()));
            for pair in expected.windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }
        }
    }
}

#[test]
fn vptree_matches_flat_on_a_hashed_corpus() {
    let embedder = HashingEmbedder::new(32).expect("embedder");
    let chunks: Vec<String> = (0..2000)
        .map(|i| format!("section {} topic {} area {} item {}", i % 53, i % 37, i % 11, i % 7))
        .collect();
    let embeddings = embedder.embed(&chunks).expect("embed");
    let queries: Vec<Vec<f32>> = (0..50)
        .map(|q| embedder.embed_one(&format!("topic {} area {}", q % 37, q % 11)).expect("embed query"))
        .collect();

    for metric in METRICS {
        let flat = build_index(IndexKind::Flat, metric, 32, &embeddings).expect("flat");
        let tree = build_index(IndexKind::Vptree, metric, 32, &embeddings).expect("vptree");
        assert_eq!(tree.len(), 2000);
        for query in &queries {
            assert_eq!(
                tree.search(query, 10).expect("tree search"),
                flat.search(query, 10).expect("flat search"),
                "{metric}"
            );
        }
    }
}
