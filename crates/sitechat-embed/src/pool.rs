use anyhow::{ensure, Result};
use candle_core::{DType, Tensor};

/// Mean of the hidden states over unmasked tokens, L2-normalized per row.
///
/// `hidden` is `[B, T, H]`, `attention_mask` is `[B, T]` of any numeric dtype.
/// Returns `[B, H]`.
pub fn masked_mean_l2(hidden: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
    let (batch, seq, hidden_dim) = hidden.dims3()?;
    ensure!(
        attention_mask.dims() == [batch, seq],
        "attention mask shape {:?} does not match hidden states [{batch}, {seq}, _]",
        attention_mask.dims()
    );

    let mask = attention_mask.to_device(hidden.device())?.to_dtype(hidden.dtype())?;
    let mask_3d = mask.unsqueeze(2)?.broadcast_as((batch, seq, hidden_dim))?;
    let sum = (hidden * &mask_3d)?.sum(1)?;
    // All-padding rows would divide by zero; clamp the token count to 1.
    let lengths = mask.sum_keepdim(1)?.maximum(1f64)?;
    let mean = sum.broadcast_div(&lengths)?;

    let eps = match hidden.dtype() {
        DType::F16 | DType::BF16 => 1e-6,
        _ => 1e-12,
    };
    let norm = mean.sqr()?.sum_keepdim(1)?.sqrt()?.affine(1.0, eps)?;
    Ok(mean.broadcast_div(&norm)?)
}
