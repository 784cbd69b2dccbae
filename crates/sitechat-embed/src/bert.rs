use anyhow::{anyhow, ensure, Context};
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use tokenizers::Tokenizer;

use sitechat_core::config::EmbeddingSettings;
use sitechat_core::{Embedder, Error, Result};

use crate::device::select_device;
use crate::pool::masked_mean_l2;
use crate::tokenize::{configure_tokenizer, tokenize_batch};

/// Sentence-transformers BERT encoder (e.g. all-MiniLM-L6-v2) with mean
/// pooling and L2 normalization, run locally through candle.
///
/// Construction reads the tokenizer, config and full weights into memory and
/// takes on the order of a second on CPU. Build one per process and share it.
pub struct BertEmbedder {
    id: String,
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    dim: usize,
    max_len: usize,
    batch_size: usize,
    pad_id: u32,
}

impl BertEmbedder {
    pub fn load(settings: &EmbeddingSettings) -> Result<Self> {
        load_from_dir(settings).map_err(|e| Error::ModelLoad(format!("{e:#}")))
    }

    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        let encoded = tokenize_batch(&self.tokenizer, texts, self.pad_id, &self.device)?;
        let token_type_ids = encoded.input_ids.zeros_like()?;
        let hidden = self
            .model
            .forward(&encoded.input_ids, &token_type_ids, Some(&encoded.attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &encoded.attention_mask)?;
        Ok(pooled.to_device(&Device::Cpu)?.to_vec2::<f32>()?)
    }
}

impl Embedder for BertEmbedder {
    fn id(&self) -> &str {
        &self.id
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn max_len(&self) -> usize {
        self.max_len
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let start = Instant::now();
        let mut out = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            let vectors = self.embed_batch(batch).map_err(|e| Error::Embedding(format!("{e:#}")))?;
            out.extend(vectors);
        }
        if out.len() != texts.len() {
            return Err(Error::Embedding(format!("model returned {} vectors for {} inputs", out.len(), texts.len())));
        }
        if let Some((position, v)) = out.iter().enumerate().find(|(_, v)| v.len() != self.dim) {
            return Err(Error::DimensionMismatch { position, expected: self.dim, actual: v.len() });
        }
        tracing::debug!(count = texts.len(), elapsed_ms = start.elapsed().as_millis() as u64, "embedded texts");
        Ok(out)
    }
}

fn load_from_dir(settings: &EmbeddingSettings) -> anyhow::Result<BertEmbedder> {
    let model_dir = settings.model_dir.as_path();
    ensure!(model_dir.is_dir(), "model directory {} does not exist", model_dir.display());
    tracing::info!(model = %settings.model, dir = %model_dir.display(), "loading sentence embedding model");

    let device = select_device();

    let tokenizer_path = model_dir.join("tokenizer.json");
    let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
        .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
    let pad_id = configure_tokenizer(&mut tokenizer, settings.max_len)?;

    let config_path = model_dir.join("config.json");
    let raw_config = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    let config: BertConfig = serde_json::from_str(&raw_config)
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;
    let dim = serde_json::from_str::<serde_json::Value>(&raw_config)?
        .get("hidden_size")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| anyhow!("{} has no hidden_size", config_path.display()))? as usize;

    let weights = read_weights(model_dir, &device)?;
    let vb = VarBuilder::from_tensors(weights, DTYPE, &device);
    let model = BertModel::load(vb, &config).context("Failed to build BERT model from weights")?;

    tracing::info!(model = %settings.model, dim, max_len = settings.max_len, "embedding model loaded");
    Ok(BertEmbedder {
        id: settings.model.clone(),
        model,
        tokenizer,
        device,
        dim,
        max_len: settings.max_len,
        batch_size: settings.batch_size.max(1),
        pad_id,
    })
}

/// Prefers `model.safetensors`, falling back to a PyTorch pickle.
fn read_weights(model_dir: &Path, device: &Device) -> anyhow::Result<HashMap<String, Tensor>> {
    let safetensors = model_dir.join("model.safetensors");
    if safetensors.exists() {
        tracing::debug!(path = %safetensors.display(), "reading safetensors weights");
        return candle_core::safetensors::load(&safetensors, device)
            .with_context(|| format!("Failed to read {}", safetensors.display()));
    }
    let pickle = model_dir.join("pytorch_model.bin");
    ensure!(pickle.exists(), "no model.safetensors or pytorch_model.bin in {}", model_dir.display());
    tracing::debug!(path = %pickle.display(), "reading pytorch weights");
    let tensors = candle_core::pickle::read_all(&pickle)
        .with_context(|| format!("Failed to read {}", pickle.display()))?;
    tensors
        .into_iter()
        .map(|(name, t)| -> anyhow::Result<(String, Tensor)> { Ok((name, t.to_device(device)?)) })
        .collect()
}
