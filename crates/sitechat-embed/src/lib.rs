//! Embedding backends for sitechat.
//!
//! [`load_embedder`] turns [`EmbeddingSettings`] into a shared
//! [`Embedder`]. A model that fails to load is reported as
//! [`Error::ModelLoad`](sitechat_core::Error::ModelLoad); there is no fallback
//! to another backend.

use std::sync::Arc;

use sitechat_core::config::{EmbeddingBackend, EmbeddingSettings};
use sitechat_core::{Embedder, Result};

pub mod bert;
pub mod device;
pub mod hashing;
pub mod pool;
pub mod tokenize;

pub use bert::BertEmbedder;
pub use hashing::HashingEmbedder;
pub use pool::masked_mean_l2;

pub fn load_embedder(settings: &EmbeddingSettings) -> Result<Arc<dyn Embedder>> {
    match settings.backend {
        EmbeddingBackend::Bert => Ok(Arc::new(BertEmbedder::load(settings)?)),
        EmbeddingBackend::Hashing => {
            tracing::info!(dim = settings.hashing_dim, "using hashing embedder");
            Ok(Arc::new(HashingEmbedder::new(settings.hashing_dim)?))
        }
    }
}
