#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytedog::core::system_monitor::{
    CpuMetrics, DiskMetrics, GpuMetrics, InterfaceInfo, MemoryMetrics, MetricSource,
    NetworkCounters, ProcessDetails, ProcessRecord, ProcessStatus,
};
use bytedog::{BytedogError, Result};

/// Handles the test keeps after the source moves into the cache
#[derive(Clone, Default)]
pub struct SourceControl {
    pub enumerations: Arc<AtomicUsize>,
    pub fail: Arc<AtomicBool>,
}

impl SourceControl {
    pub fn enumerations(&self) -> usize {
        self.enumerations.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }
}

/// In-memory metric source with a fixed process table
pub struct ScriptedSource {
    control: SourceControl,
    records: Vec<ProcessRecord>,
    delay: Duration,
}

impl ScriptedSource {
    pub fn new(records: Vec<ProcessRecord>) -> (Self, SourceControl) {
        let control = SourceControl::default();
        let source = Self {
            control: control.clone(),
            records,
            delay: Duration::ZERO,
        };
        (source, control)
    }

    /// Make every enumeration take at least `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl MetricSource for ScriptedSource {
    fn cpu(&mut self) -> Result<CpuMetrics> {
        if self.control.fail.load(Ordering::SeqCst) {
            return Err(BytedogError::metric_collection("scripted failure"));
        }
        Ok(CpuMetrics {
            global_usage: 25.0,
            per_core_usage: vec![20.0, 30.0],
        })
    }

    fn memory(&mut self) -> Result<MemoryMetrics> {
        Ok(MemoryMetrics {
            total_bytes: 8 * 1024 * 1024 * 1024,
            used_bytes: 4 * 1024 * 1024 * 1024,
            available_bytes: 4 * 1024 * 1024 * 1024,
            usage_percent: 50.0,
            ..Default::default()
        })
    }

    fn network(&mut self) -> Result<NetworkCounters> {
        Ok(NetworkCounters::default())
    }

    fn disks(&mut self) -> Result<Vec<DiskMetrics>> {
        Ok(Vec::new())
    }

    fn interfaces(&mut self) -> Result<Vec<InterfaceInfo>> {
        Ok(Vec::new())
    }

    fn gpu(&mut self) -> Option<GpuMetrics> {
        None
    }

    fn processes(&mut self) -> Result<Vec<ProcessRecord>> {
        std::thread::sleep(self.delay);
        self.control.enumerations.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.clone())
    }

    fn process_details(&mut self, pid: u32) -> Result<ProcessDetails> {
        Err(BytedogError::ProcessNotFound(pid))
    }
}

pub fn record(pid: u32, name: &str, memory_percent: f32) -> ProcessRecord {
    ProcessRecord {
        pid,
        name: name.to_string(),
        memory_percent,
        status: ProcessStatus::Sleeping,
        cpu_percent: 0.0,
    }
}

/// Poll `condition` every few milliseconds until it holds or `limit` passes
pub fn wait_until<F: Fn() -> bool>(limit: Duration, condition: F) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed() < limit {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    condition()
}
