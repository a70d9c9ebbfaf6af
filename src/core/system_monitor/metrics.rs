use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Host metrics captured at one sampling instant.
///
/// Built once per tick and never mutated afterwards; the next tick produces a
/// new bundle instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricBundle {
    pub captured_at: DateTime<Utc>,
    pub cpu: CpuMetrics,
    pub memory: MemoryMetrics,
    pub gpu: Option<GpuMetrics>,
    pub network: NetworkCounters,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CpuMetrics {
    pub global_usage: f32,
    /// One entry per logical core, empty when the OS does not report them
    pub per_core_usage: Vec<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryMetrics {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
    pub usage_percent: f32,
    pub swap_total_bytes: u64,
    pub swap_used_bytes: u64,
    pub swap_percent: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpuMetrics {
    pub vendor: GpuVendor,
    pub name: String,
    pub load_percent: f32,
    pub memory_used_bytes: u64,
    pub memory_total_bytes: u64,
    pub memory_percent: f32,
    pub temperature_celsius: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub enum GpuVendor {
    Nvidia,
    Amd,
    Intel,
    #[default]
    Unknown,
}

/// Network totals summed over every interface.
///
/// These are monotonic counters since boot, not per-tick deltas.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkCounters {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub packets_sent: u64,
    pub packets_recv: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiskMetrics {
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub usage_percent: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterfaceInfo {
    pub name: String,
    pub ipv4: Vec<String>,
}

/// OS-reported process state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessStatus {
    Running,
    Sleeping,
    Idle,
    DiskSleep,
    Stopped,
    Tracing,
    Zombie,
    Dead,
    Other(String),
}

impl ProcessStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Running => "running",
            Self::Sleeping => "sleeping",
            Self::Idle => "idle",
            Self::DiskSleep => "disk-sleep",
            Self::Stopped => "stopped",
            Self::Tracing => "tracing-stop",
            Self::Zombie => "zombie",
            Self::Dead => "dead",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub name: String,
    pub memory_percent: f32,
    pub status: ProcessStatus,
    /// Always 0: per-process CPU share is not computed by this layer.
    pub cpu_percent: f32,
}

/// One enumeration of the process table, shared by reference.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessSnapshot {
    #[serde(skip)]
    pub captured_at: Instant,
    pub taken_at: DateTime<Utc>,
    pub records: Vec<ProcessRecord>,
}

impl ProcessSnapshot {
    pub fn new(records: Vec<ProcessRecord>) -> Self {
        Self::captured(records, Instant::now())
    }

    pub fn captured(records: Vec<ProcessRecord>, captured_at: Instant) -> Self {
        Self {
            captured_at,
            taken_at: Utc::now(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, pid: u32) -> Option<&ProcessRecord> {
        self.records.iter().find(|record| record.pid == pid)
    }
}

/// Extended information for a single process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessDetails {
    pub pid: u32,
    pub name: String,
    pub status: ProcessStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub memory_percent: f32,
    pub thread_count: Option<usize>,
    pub exe: Option<String>,
}

/// Everything the sampler publishes for one tick
#[derive(Debug, Clone, Serialize)]
pub struct SampleBundle {
    pub tick: u64,
    pub metrics: MetricBundle,
    pub processes: Arc<ProcessSnapshot>,
}
