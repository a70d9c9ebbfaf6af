//! Time-boxed cache in front of a [`MetricSource`].
//!
//! Host metrics are cheap and always sampled fresh. The process table is the
//! expensive read: it is kept in a single slot holding an `Arc` snapshot that
//! is swapped whole, never edited in place, so readers on other threads only
//! ever see a complete table.
//!
//! Every read other than a sampler tick waits at most `source_wait` for the
//! source. A tick stuck in the OS keeps holding it, so callers get a transient
//! error, or the stale table for cached reads, instead of blocking with it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use parking_lot::{Mutex, MutexGuard, RwLock};

use super::metrics::{
    DiskMetrics, InterfaceInfo, MetricBundle, ProcessDetails, ProcessSnapshot, SampleBundle,
};
use super::process::sort_by_memory;
use super::source::MetricSource;
use crate::error::{BytedogError, Result};

/// Default freshness window, matching the sampler cadence
pub const DEFAULT_PROCESS_TTL: Duration = Duration::from_secs(2);

/// How long a reader waits for a source held by a tick
pub const DEFAULT_SOURCE_WAIT: Duration = Duration::from_millis(500);

type SourceGuard<'a> = MutexGuard<'a, Box<dyn MetricSource>>;

pub struct SampleCache {
    source: Mutex<Box<dyn MetricSource>>,
    processes: RwLock<Option<Arc<ProcessSnapshot>>>,
    ttl: Duration,
    source_wait: Duration,
}

impl SampleCache {
    pub fn new<S: MetricSource + 'static>(source: S) -> Self {
        Self::with_ttl(source, DEFAULT_PROCESS_TTL)
    }

    pub fn with_ttl<S: MetricSource + 'static>(source: S, ttl: Duration) -> Self {
        Self {
            source: Mutex::new(Box::new(source)),
            processes: RwLock::new(None),
            ttl,
            source_wait: DEFAULT_SOURCE_WAIT,
        }
    }

    pub fn with_source_wait(mut self, wait: Duration) -> Self {
        self.source_wait = wait;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn source_wait(&self) -> Duration {
        self.source_wait
    }

    /// Fresh host metrics; never served from cache
    pub fn get_metrics(&self) -> Result<MetricBundle> {
        let mut source = self.acquire()?;
        collect_metrics(&mut **source)
    }

    /// Process table ordered by memory share, largest first.
    ///
    /// With `use_cache` the current entry is returned untouched while it is
    /// younger than the TTL. Otherwise the table is enumerated again and the
    /// entry replaced.
    pub fn get_processes(&self, use_cache: bool) -> Result<Arc<ProcessSnapshot>> {
        self.processes_at(use_cache, Instant::now())
    }

    pub(crate) fn processes_at(
        &self,
        use_cache: bool,
        now: Instant,
    ) -> Result<Arc<ProcessSnapshot>> {
        if use_cache {
            if let Some(snapshot) = self.fresh_entry(now) {
                return Ok(snapshot);
            }
        }

        let mut source = match self.acquire() {
            Ok(source) => source,
            Err(e) => {
                if use_cache {
                    if let Some(stale) = self.cached_processes() {
                        log::debug!("serving stale process table: {}", e);
                        return Ok(stale);
                    }
                }
                return Err(e);
            }
        };

        // Another reader may have refreshed the slot while we waited.
        if use_cache {
            if let Some(snapshot) = self.fresh_entry(now) {
                return Ok(snapshot);
            }
        }

        self.capture_processes(&mut **source, now)
    }

    /// Current entry regardless of age, without touching the OS
    pub fn cached_processes(&self) -> Option<Arc<ProcessSnapshot>> {
        self.processes.read().clone()
    }

    /// Drop the entry so the next cached read enumerates again
    pub fn invalidate(&self) {
        *self.processes.write() = None;
    }

    pub fn disks(&self) -> Result<Vec<DiskMetrics>> {
        self.acquire()?.disks()
    }

    pub fn interfaces(&self) -> Result<Vec<InterfaceInfo>> {
        self.acquire()?.interfaces()
    }

    pub fn process_details(&self, pid: u32) -> Result<ProcessDetails> {
        self.acquire()?.process_details(pid)
    }

    /// Everything one sampler tick needs, under a single hold of the source.
    ///
    /// The process table is always captured fresh and also refreshes the cache
    /// entry. Ticks run on the blocking pool and wait for the source without
    /// a bound.
    pub fn sample_bundle(&self, tick: u64) -> Result<SampleBundle> {
        let mut source = self.source.lock();
        let metrics = collect_metrics(&mut **source)?;
        let processes = self.capture_processes(&mut **source, Instant::now())?;

        Ok(SampleBundle {
            tick,
            metrics,
            processes,
        })
    }

    fn acquire(&self) -> Result<SourceGuard<'_>> {
        self.source.try_lock_for(self.source_wait).ok_or_else(|| {
            BytedogError::transient(format!(
                "metric source busy for more than {:?}",
                self.source_wait
            ))
        })
    }

    fn fresh_entry(&self, now: Instant) -> Option<Arc<ProcessSnapshot>> {
        let slot = self.processes.read();
        slot.as_ref()
            .filter(|snapshot| now.saturating_duration_since(snapshot.captured_at) < self.ttl)
            .cloned()
    }

    fn capture_processes(
        &self,
        source: &mut dyn MetricSource,
        now: Instant,
    ) -> Result<Arc<ProcessSnapshot>> {
        let mut records = source.processes()?;
        sort_by_memory(&mut records);

        let snapshot = Arc::new(ProcessSnapshot::captured(records, now));
        *self.processes.write() = Some(Arc::clone(&snapshot));

        log::trace!("process table captured: {} entries", snapshot.len());
        Ok(snapshot)
    }
}

fn collect_metrics(source: &mut dyn MetricSource) -> Result<MetricBundle> {
    Ok(MetricBundle {
        captured_at: Utc::now(),
        cpu: source.cpu()?,
        memory: source.memory()?,
        gpu: source.gpu(),
        network: source.network()?,
    })
}
