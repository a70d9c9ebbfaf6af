//! GPU-specific platform code.
//!
//! NVIDIA cards are read through NVML when the `nvml` feature is enabled.
//! Without it every host reports no GPU.

#[cfg(feature = "nvml")]
mod nvidia;

#[cfg(feature = "nvml")]
pub use nvidia::NvidiaGpuProvider;

use crate::core::system_monitor::GpuProvider;
use crate::error::{BytedogError, Result};

/// First usable GPU provider, or `GpuNotAvailable`
pub fn get_gpu_provider() -> Result<Box<dyn GpuProvider>> {
    #[cfg(feature = "nvml")]
    {
        match NvidiaGpuProvider::open(0) {
            Ok(provider) => return Ok(Box::new(provider)),
            Err(e) => log::debug!("NVIDIA provider unavailable: {}", e),
        }
    }

    Err(BytedogError::gpu_not_available("no supported GPU found"))
}
