use candle_core::Device;
use tracing::debug;

use super::error::EmbeddingError;

/// Selects the compute device for model inference.
///
/// Tries the GPU backends compiled in via the `cuda`/`metal` features and
/// falls back to CPU. Both the encoder and the pairwise classifier share
/// this selection.
pub fn select_device() -> Result<Device, EmbeddingError> {
    #[cfg(feature = "cuda")]
    match Device::new_cuda(0) {
        Ok(device) => {
            debug!("Using CUDA device");
            return Ok(device);
        }
        Err(e) => tracing::warn!(error = %e, "CUDA device unavailable, trying next backend"),
    }

    #[cfg(feature = "metal")]
    match Device::new_metal(0) {
        Ok(device) => {
            debug!("Using Metal device");
            return Ok(device);
        }
        Err(e) => tracing::warn!(error = %e, "Metal device unavailable, trying next backend"),
    }

    debug!("Using CPU device");
    Ok(Device::Cpu)
}
