//! System monitoring core functionality.
//!
//! Metric sources, the process-table cache, the background sampler and the
//! queue that hands its bundles to a consumer.

mod cache;
mod collector;
mod gpu;
mod handoff;
pub mod health;
mod history;
mod metrics;
mod process;
mod sampler;
mod source;

pub use cache::{SampleCache, DEFAULT_PROCESS_TTL, DEFAULT_SOURCE_WAIT};
pub use collector::{CollectorConfig, MetricsCollector};
pub use gpu::GpuProvider;
pub use handoff::{HandoffQueue, DEFAULT_QUEUE_CAPACITY};
pub use health::{HealthReport, LoadLevel, SystemHealth};
pub use history::{MetricsHistory, DEFAULT_HISTORY_SIZE};
pub use metrics::{
    CpuMetrics, DiskMetrics, GpuMetrics, GpuVendor, InterfaceInfo, MemoryMetrics, MetricBundle,
    NetworkCounters, ProcessDetails, ProcessRecord, ProcessSnapshot, ProcessStatus, SampleBundle,
};
pub use process::{sort_by_memory, sort_records, ProcessSortKey, ProcessView};
pub use sampler::{
    start_sampler, SamplerConfig, SamplerHandle, SamplerStats, DEFAULT_SAMPLE_INTERVAL,
    DEFAULT_TICK_TIMEOUT,
};
pub use source::MetricSource;
