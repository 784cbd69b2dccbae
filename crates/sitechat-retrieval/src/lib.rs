//! Retrieval orchestration: builds stores from corpus text and answers
//! top-k queries against them.

pub mod builder;
pub mod retriever;

pub use builder::{build_record, build_store};
pub use retriever::{Corpus, Retriever};
