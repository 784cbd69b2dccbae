//! Layered configuration and path helpers.
//!
//! Uses Figment to merge defaults + `config.toml` + `config.<env>.toml` +
//! `APP_*` env vars into [`Settings`].

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::chunker::{Chunker, DEFAULT_OVERLAP, DEFAULT_WINDOW};
use crate::error::{Error, Result};
use crate::types::{IndexKind, Metric};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub chunking: ChunkingSettings,
    pub embedding: EmbeddingSettings,
    pub index: IndexSettings,
    pub store: StoreSettings,
    pub retrieval: RetrievalSettings,
    pub completion: CompletionSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChunkingSettings {
    pub window: usize,
    pub overlap: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self { window: DEFAULT_WINDOW, overlap: DEFAULT_OVERLAP }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingBackend {
    /// Sentence-transformers BERT model run locally.
    #[default]
    Bert,
    /// Deterministic feature hashing; no model files required.
    Hashing,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub backend: EmbeddingBackend,
    /// Model identifier recorded in every store built with it.
    pub model: String,
    /// Directory holding `config.json`, `tokenizer.json` and the weights.
    pub model_dir: PathBuf,
    pub max_len: usize,
    pub batch_size: usize,
    /// Output dimension of the hashing backend. The BERT backend reads its
    /// dimension from the model config.
    pub hashing_dim: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Bert,
            model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            model_dir: PathBuf::from("models/all-MiniLM-L6-v2"),
            max_len: 256,
            batch_size: 32,
            hashing_dim: 384,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IndexSettings {
    pub kind: IndexKind,
    pub metric: Metric,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreSettings {
    pub path: PathBuf,
    /// Crawler output used to build the store when it is missing.
    pub source: Option<PathBuf>,
    pub rebuild_if_missing: bool,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/vector_store.json"),
            source: Some(PathBuf::from("data/website_data.txt")),
            rebuild_if_missing: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetrievalSettings {
    pub top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompletionSettings {
    pub api_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub system_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_ms: u64,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            api_url: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            model: "mistralai/mixtral-8x7b-instruct".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            system_prompt: "You are a helpful assistant for this organization. \
                            Answer questions based on the provided context. \
                            If you cannot find the answer in the context, say so politely."
                .to_string(),
            max_tokens: 1000,
            temperature: 0.7,
            timeout_secs: 30,
            max_retries: 3,
            backoff_ms: 1000,
        }
    }
}

impl Settings {
    /// Rejects values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        Chunker::from_settings(&self.chunking)?;
        if self.retrieval.top_k == 0 {
            return Err(Error::Configuration("retrieval.top_k must be greater than zero".to_string()));
        }
        if self.embedding.batch_size == 0 {
            return Err(Error::Configuration("embedding.batch_size must be greater than zero".to_string()));
        }
        if self.embedding.max_len == 0 {
            return Err(Error::Configuration("embedding.max_len must be greater than zero".to_string()));
        }
        if self.embedding.backend == EmbeddingBackend::Hashing && self.embedding.hashing_dim == 0 {
            return Err(Error::Configuration("embedding.hashing_dim must be greater than zero".to_string()));
        }
        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        self.embedding.model_dir = resolve_with_base(base, self.embedding.model_dir.to_string_lossy());
        self.store.path = resolve_with_base(base, self.store.path.to_string_lossy());
        if let Some(source) = self.store.source.take() {
            self.store.source = Some(resolve_with_base(base, source.to_string_lossy()));
        }
    }
}

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
}

impl Config {
    /// Loads configuration from the current directory.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Merges, in increasing priority: built-in defaults, `config.toml`,
    /// `config.<env>.toml` for `RUST_ENV` (default `dev`), and `APP_*`
    /// environment variables with `__` as the nesting separator.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            other => tracing::debug!(env = other, "no environment-specific config file for RUST_ENV"),
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        Ok(Self { figment, base_dir: dir.to_path_buf() })
    }

    /// Extracts typed settings, validates them and resolves relative paths
    /// against the directory the configuration was loaded from.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings: Settings = self
            .figment
            .extract()
            .map_err(|e| Error::Configuration(e.to_string()))?;
        settings.validate()?;
        settings.resolve_paths(&self.base_dir);
        Ok(settings)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
