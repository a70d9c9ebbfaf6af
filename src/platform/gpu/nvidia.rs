//! NVIDIA cards through NVML.
//!
//! The card name is read once when the provider opens; every tick then asks
//! NVML for the utilization rate, memory use and core temperature. Boards
//! without a readable core sensor report no temperature rather than failing.

use nvml_wrapper::enum_wrappers::device::TemperatureSensor;
use nvml_wrapper::{Device, Nvml};

use crate::core::system_monitor::{GpuMetrics, GpuProvider, GpuVendor};
use crate::error::{BytedogError, Result};

pub struct NvidiaGpuProvider {
    nvml: Nvml,
    index: u32,
    name: String,
}

impl NvidiaGpuProvider {
    /// Load NVML and check that card `index` answers
    pub fn open(index: u32) -> Result<Self> {
        let nvml = Nvml::init()
            .map_err(|e| BytedogError::gpu_not_available(format!("NVML unavailable: {}", e)))?;

        let name = nvml
            .device_by_index(index)
            .map_err(|e| BytedogError::gpu_not_available(format!("no NVIDIA GPU {}: {}", index, e)))?
            .name()
            .unwrap_or_else(|_| format!("NVIDIA GPU {}", index));

        Ok(Self { nvml, index, name })
    }

    fn device(&self) -> Result<Device<'_>> {
        self.nvml.device_by_index(self.index).map_err(|e| {
            BytedogError::metric_collection(format!("NVIDIA GPU {} lost: {}", self.index, e))
        })
    }
}

impl GpuProvider for NvidiaGpuProvider {
    fn vendor(&self) -> GpuVendor {
        GpuVendor::Nvidia
    }

    fn collect_metrics(&mut self) -> Result<GpuMetrics> {
        let device = self.device()?;
        let memory = device
            .memory_info()
            .map_err(|e| BytedogError::metric_collection(format!("GPU memory read: {}", e)))?;

        Ok(GpuMetrics {
            vendor: GpuVendor::Nvidia,
            name: self.name.clone(),
            load_percent: device
                .utilization_rates()
                .map(|rates| rates.gpu as f32)
                .unwrap_or(0.0),
            memory_used_bytes: memory.used,
            memory_total_bytes: memory.total,
            memory_percent: share_percent(memory.used, memory.total),
            temperature_celsius: device.temperature(TemperatureSensor::Gpu).ok(),
        })
    }
}

fn share_percent(used: u64, total: u64) -> f32 {
    if total == 0 {
        return 0.0;
    }
    (used as f64 / total as f64 * 100.0) as f32
}
