use anyhow::{anyhow, Result};
use candle_core::{Device, Tensor};
use tokenizers::{Tokenizer, TruncationParams};

/// Token ids and attention mask for a batch, each shaped `[batch, seq]`.
pub struct EncodedBatch {
    pub input_ids: Tensor,
    pub attention_mask: Tensor,
}

/// Makes `max_len` the effective token limit of `tokenizer` and returns the
/// id to pad batches with.
///
/// Truncation is delegated to the tokenizer so `[CLS]`/`[SEP]` survive it.
/// Any padding configured in `tokenizer.json` is switched off;
/// [`tokenize_batch`] pads to the longest sequence itself.
pub fn configure_tokenizer(tokenizer: &mut Tokenizer, max_len: usize) -> Result<u32> {
    let pad_id = tokenizer
        .get_padding()
        .map(|p| p.pad_id)
        .or_else(|| tokenizer.token_to_id("[PAD]"))
        .unwrap_or(0);
    tokenizer.with_padding(None);
    tokenizer
        .with_truncation(Some(TruncationParams { max_length: max_len, ..Default::default() }))
        .map_err(|e| anyhow!("Failed to set truncation to {max_len} tokens: {e}"))?;
    Ok(pad_id)
}

/// Encodes `texts` with special tokens and right-pads the batch to its
/// longest sequence with `pad_id` (mask 0).
pub fn tokenize_batch(tokenizer: &Tokenizer, texts: &[String], pad_id: u32, device: &Device) -> Result<EncodedBatch> {
    let mut rows = Vec::with_capacity(texts.len());
    for text in texts {
        let enc = tokenizer
            .encode(text.as_str(), true)
            .map_err(|e| anyhow!("Tokenization failed: {}", e))?;
        rows.push((enc.get_ids().to_vec(), enc.get_attention_mask().to_vec()));
    }

    let seq_len = rows.iter().map(|(ids, _)| ids.len()).max().unwrap_or(0).max(1);
    let mut flat_ids = Vec::with_capacity(rows.len() * seq_len);
    let mut flat_mask = Vec::with_capacity(rows.len() * seq_len);
    for (ids, mask) in rows {
        let pad = seq_len - ids.len();
        flat_ids.extend(ids.into_iter().chain(std::iter::repeat(pad_id).take(pad)));
        flat_mask.extend(mask.into_iter().chain(std::iter::repeat(0).take(pad)));
    }

    let batch = texts.len();
    let input_ids = Tensor::from_vec(flat_ids, (batch, seq_len), device)?;
    let attention_mask = Tensor::from_vec(flat_mask, (batch, seq_len), device)?;
    Ok(EncodedBatch { input_ids, attention_mask })
}
