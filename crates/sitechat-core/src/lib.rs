#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod chunker;
pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use chunker::{chunk, Chunker};
pub use config::{Config, Settings};
pub use error::{Error, Result};
pub use traits::{Embedder, VectorIndex};
pub use types::{IndexKind, Metric, Neighbor, RetrievedChunk};
