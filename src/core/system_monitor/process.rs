//! Process table extraction, ordering and filtering.
//!
//! All sorting here is stable: records that compare equal keep the order the
//! OS enumerated them in.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sysinfo::{Pid, Process, System};

use super::metrics::{ProcessRecord, ProcessStatus};
use crate::error::BytedogError;

/// Column a process table can be ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessSortKey {
    Pid,
    Name,
    Cpu,
    #[default]
    Memory,
    Status,
}

impl FromStr for ProcessSortKey {
    type Err = BytedogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pid" => Ok(Self::Pid),
            "name" => Ok(Self::Name),
            "cpu" => Ok(Self::Cpu),
            "memory" | "mem" => Ok(Self::Memory),
            "status" => Ok(Self::Status),
            other => Err(BytedogError::config(format!("unknown sort key '{}'", other))),
        }
    }
}

/// Active ordering and filter for a process table view.
///
/// Selecting the active key again flips the direction; selecting a new key
/// starts descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessView {
    pub sort_key: ProcessSortKey,
    pub descending: bool,
    pub filter: String,
}

impl Default for ProcessView {
    fn default() -> Self {
        Self {
            sort_key: ProcessSortKey::Memory,
            descending: true,
            filter: String::new(),
        }
    }
}

impl ProcessView {
    pub fn select_column(&mut self, key: ProcessSortKey) {
        if self.sort_key == key {
            self.descending = !self.descending;
        } else {
            self.sort_key = key;
            self.descending = true;
        }
    }

    pub fn set_filter<S: Into<String>>(&mut self, filter: S) {
        self.filter = filter.into();
    }

    /// Filter and order a copy of `records`
    pub fn apply(&self, records: &[ProcessRecord]) -> Vec<ProcessRecord> {
        let needle = self.filter.to_lowercase();
        let mut visible: Vec<ProcessRecord> = records
            .iter()
            .filter(|record| needle.is_empty() || record.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        sort_records(&mut visible, self.sort_key, self.descending);
        visible
    }
}

/// Stable sort by `key`
pub fn sort_records(records: &mut [ProcessRecord], key: ProcessSortKey, descending: bool) {
    records.sort_by(|a, b| {
        let ordering = compare(a, b, key);
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

/// Canonical table order: memory share, largest first
pub fn sort_by_memory(records: &mut [ProcessRecord]) {
    sort_records(records, ProcessSortKey::Memory, true);
}

fn compare(a: &ProcessRecord, b: &ProcessRecord, key: ProcessSortKey) -> Ordering {
    match key {
        ProcessSortKey::Pid => a.pid.cmp(&b.pid),
        ProcessSortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        ProcessSortKey::Cpu => a
            .cpu_percent
            .partial_cmp(&b.cpu_percent)
            .unwrap_or(Ordering::Equal),
        ProcessSortKey::Memory => a
            .memory_percent
            .partial_cmp(&b.memory_percent)
            .unwrap_or(Ordering::Equal),
        ProcessSortKey::Status => a.status.as_str().cmp(b.status.as_str()),
    }
}

pub(crate) fn map_status(status: sysinfo::ProcessStatus) -> ProcessStatus {
    match status {
        sysinfo::ProcessStatus::Run => ProcessStatus::Running,
        sysinfo::ProcessStatus::Sleep => ProcessStatus::Sleeping,
        sysinfo::ProcessStatus::Idle => ProcessStatus::Idle,
        sysinfo::ProcessStatus::UninterruptibleDiskSleep => ProcessStatus::DiskSleep,
        sysinfo::ProcessStatus::Stop => ProcessStatus::Stopped,
        sysinfo::ProcessStatus::Tracing => ProcessStatus::Tracing,
        sysinfo::ProcessStatus::Zombie => ProcessStatus::Zombie,
        sysinfo::ProcessStatus::Dead => ProcessStatus::Dead,
        other => ProcessStatus::Other(other.to_string().to_lowercase()),
    }
}

pub(crate) fn memory_percent(process: &Process, total_memory: u64) -> f32 {
    if total_memory > 0 {
        (process.memory() as f64 / total_memory as f64 * 100.0) as f32
    } else {
        0.0
    }
}

/// Extract the fixed field set from a refreshed `System`, in ascending pid order.
pub(crate) fn extract_records(system: &System) -> Vec<ProcessRecord> {
    let total_memory = system.total_memory();
    let mut pids: Vec<&Pid> = system.processes().keys().collect();
    pids.sort_unstable();

    pids.into_iter()
        .filter_map(|pid| system.process(*pid))
        // Linux keeps tasks from earlier detail refreshes in the same map.
        .filter(|process| process.thread_kind().is_none())
        .map(|process| ProcessRecord {
            pid: process.pid().as_u32(),
            name: process.name().to_string_lossy().to_string(),
            memory_percent: memory_percent(process, total_memory),
            status: map_status(process.status()),
            cpu_percent: 0.0,
        })
        .collect()
}
