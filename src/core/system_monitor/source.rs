//! Host query seam.
//!
//! `MetricSource` is the only place the engine talks to the operating system.
//! [`MetricsCollector`](super::MetricsCollector) is the sysinfo-backed
//! implementation; tests script their own.

use super::metrics::{
    CpuMetrics, DiskMetrics, GpuMetrics, InterfaceInfo, MemoryMetrics, NetworkCounters,
    ProcessDetails, ProcessRecord,
};
use crate::error::Result;

pub trait MetricSource: Send {
    /// Aggregate and per-core CPU load since the previous call
    fn cpu(&mut self) -> Result<CpuMetrics>;

    /// Physical memory and swap usage
    fn memory(&mut self) -> Result<MemoryMetrics>;

    /// Monotonic network totals summed over all interfaces
    fn network(&mut self) -> Result<NetworkCounters>;

    /// Usage of every mounted filesystem
    fn disks(&mut self) -> Result<Vec<DiskMetrics>>;

    /// Interfaces and their IPv4 addresses
    fn interfaces(&mut self) -> Result<Vec<InterfaceInfo>>;

    /// GPU load, `None` when no provider is available
    fn gpu(&mut self) -> Option<GpuMetrics>;

    /// Enumerate the process table.
    ///
    /// Records come back in enumeration order (ascending pid for the sysinfo
    /// source) with `cpu_percent` set to 0. Processes that vanish or cannot be
    /// read while enumerating are left out.
    fn processes(&mut self) -> Result<Vec<ProcessRecord>>;

    /// Look up a single live process
    fn process_details(&mut self, pid: u32) -> Result<ProcessDetails>;
}
