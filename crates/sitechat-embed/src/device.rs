use candle_core::Device;

/// Picks the inference device: Metal when built with the `metal` feature and
/// a GPU is available, CPU otherwise.
pub fn select_device() -> Device {
    #[cfg(feature = "metal")]
    {
        if let Ok(dev) = Device::new_metal(0) {
            tracing::info!(device = "metal", "selected embedding device");
            return dev;
        }
        tracing::warn!("metal feature enabled but no Metal device found, falling back to CPU");
    }
    tracing::info!(device = "cpu", "selected embedding device");
    Device::Cpu
}
