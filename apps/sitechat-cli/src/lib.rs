//! Shared setup for the sitechat binaries.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use sitechat_core::{Config, RetrievedChunk, Settings};

/// Installs the fmt subscriber. `RUST_LOG` wins over the built-in filter.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "sitechat=debug,info" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn load_settings(config_dir: &Path) -> Result<Settings> {
    let config = Config::load_from(config_dir)
        .with_context(|| format!("loading configuration from {}", config_dir.display()))?;
    Ok(config.settings()?)
}

/// Single-line preview of a chunk, cut at a char boundary.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}

pub fn format_hits(hits: &[RetrievedChunk], max_chars: usize) -> String {
    hits.iter()
        .enumerate()
        .map(|(rank, hit)| {
            format!(
                "  {}. distance={:.4}  chunk={}\n     {}",
                rank + 1,
                hit.score,
                hit.position,
                preview(&hit.text, max_chars)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
