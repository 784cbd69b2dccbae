use std::path::PathBuf;

use sitechat_core::config::{EmbeddingBackend, EmbeddingSettings};
use sitechat_core::{Embedder, Error};
use sitechat_embed::{load_embedder, HashingEmbedder};

fn hashing_settings(dim: usize) -> EmbeddingSettings {
    EmbeddingSettings { backend: EmbeddingBackend::Hashing, hashing_dim: dim, ..EmbeddingSettings::default() }
}

#[test]
fn hashing_embedder_shapes_and_determinism() {
    let embedder = load_embedder(&hashing_settings(384)).expect("embedder");
    let texts = vec!["hello world".to_string(), "hello world".to_string(), "something else".to_string()];
    let embs = embedder.embed(&texts).expect("embed");

    assert_eq!(embs.len(), 3, "one vector per input");
    assert_eq!(embs[0].len(), 384);
    assert_eq!(embedder.dim(), 384);

    let norm: f32 = embs[0].iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-5, "vector is L2-normalized (norm={norm})");

    assert_eq!(embs[0], embs[1], "identical input yields identical vector");
    assert_ne!(embs[0], embs[2]);
}

#[test]
fn embed_one_matches_batch_output() {
    let embedder = HashingEmbedder::new(64).expect("embedder");
    let single = embedder.embed_one("Cat sat.").expect("embed_one");
    let batch = embedder.embed(&["cat sat".to_string()]).expect("embed");
    assert_eq!(single, batch[0], "case and punctuation are ignored");
}

#[test]
fn empty_text_embeds_to_zero_vector() {
    let embedder = HashingEmbedder::new(16).expect("embedder");
    let v = embedder.embed_one("   ").expect("embed_one");
    assert_eq!(v, vec![0.0; 16]);
}

#[test]
fn missing_model_directory_is_a_model_load_error() {
    let settings = EmbeddingSettings {
        backend: EmbeddingBackend::Bert,
        model_dir: PathBuf::from("/nonexistent/sitechat/model"),
        ..EmbeddingSettings::default()
    };
    match load_embedder(&settings) {
        Err(Error::ModelLoad(msg)) => assert!(msg.contains("does not exist"), "msg={msg}"),
        Err(other) => panic!("expected ModelLoad, got {other:?}"),
        Ok(_) => panic!("expected ModelLoad, got an embedder"),
    }
}

#[test]
fn incomplete_model_directory_is_a_model_load_error() {
    let tmp = tempfile::tempdir().expect("tmp");
    let settings = EmbeddingSettings {
        backend: EmbeddingBackend::Bert,
        model_dir: tmp.path().to_path_buf(),
        ..EmbeddingSettings::default()
    };
    assert!(matches!(load_embedder(&settings), Err(Error::ModelLoad(_))));
}

#[test]
fn zero_hashing_dimension_is_rejected() {
    assert!(matches!(HashingEmbedder::new(0), Err(Error::Configuration(_))));
    match load_embedder(&hashing_settings(0)) {
        Err(Error::Configuration(msg)) => assert!(msg.contains("dimension"), "msg={msg}"),
        Err(other) => panic!("expected Configuration, got {other:?}"),
        Ok(_) => panic!("expected Configuration, got an embedder"),
    }
}
