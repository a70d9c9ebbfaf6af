use super::metrics::{GpuMetrics, GpuVendor};
use crate::error::Result;

/// One GPU the collector can read each tick.
///
/// Implementations live in the platform layer; a host without a supported
/// GPU simply has no provider and bundles carry no GPU section.
pub trait GpuProvider: Send {
    fn vendor(&self) -> GpuVendor;

    /// Current load, memory and temperature
    fn collect_metrics(&mut self) -> Result<GpuMetrics>;
}
