//! Entry point for front ends.
//!
//! `MonitorCore` wires the sample cache, process controller and view mode
//! together from one [`Config`].

use std::sync::Arc;
use std::time::Duration;

use crate::core::config::Config;
use crate::core::process_control::{ControlResult, ProcessController};
use crate::core::system_monitor::{
    start_sampler, DiskMetrics, InterfaceInfo, MetricBundle, MetricSource, MetricsCollector,
    ProcessDetails, ProcessSnapshot, SampleCache, SamplerConfig, SamplerHandle,
};
use crate::core::view_mode::ViewModeController;
use crate::error::Result;

pub struct MonitorCore {
    cache: Arc<SampleCache>,
    controller: ProcessController,
    view_mode: ViewModeController,
    config: Config,
}

impl MonitorCore {
    /// Monitor the local host
    pub fn new(config: Config) -> Self {
        Self::with_source(MetricsCollector::new(), config)
    }

    pub fn with_source<S: MetricSource + 'static>(source: S, config: Config) -> Self {
        Self {
            cache: Arc::new(
                SampleCache::with_ttl(source, config.process_cache_ttl())
                    .with_source_wait(config.source_wait()),
            ),
            controller: ProcessController::with_grace_period(config.terminate_grace()),
            view_mode: ViewModeController::new(config.view_mode),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sample_metrics(&self) -> Result<MetricBundle> {
        self.cache.get_metrics()
    }

    pub fn list_processes(&self, use_cache: bool) -> Result<Arc<ProcessSnapshot>> {
        self.cache.get_processes(use_cache)
    }

    pub fn cached_processes(&self) -> Option<Arc<ProcessSnapshot>> {
        self.cache.cached_processes()
    }

    pub fn invalidate_processes(&self) {
        self.cache.invalidate();
    }

    pub fn process_details(&self, pid: u32) -> Result<ProcessDetails> {
        self.cache.process_details(pid)
    }

    pub fn disks(&self) -> Result<Vec<DiskMetrics>> {
        self.cache.disks()
    }

    pub fn interfaces(&self) -> Result<Vec<InterfaceInfo>> {
        self.cache.interfaces()
    }

    /// Start a background sampler sharing this monitor's cache
    pub fn start_sampler(&self, interval: Duration) -> Result<SamplerHandle> {
        start_sampler(
            Arc::clone(&self.cache),
            SamplerConfig {
                interval,
                queue_capacity: self.config.queue_capacity,
                tick_timeout: self.config.tick_timeout(),
            },
        )
    }

    pub fn terminate(&self, pid: u32) -> ControlResult {
        self.controller.terminate(pid)
    }

    pub fn suspend(&self, pid: u32) -> ControlResult {
        self.controller.suspend(pid)
    }

    pub fn resume(&self, pid: u32) -> ControlResult {
        self.controller.resume(pid)
    }

    pub fn view_mode(&self) -> &ViewModeController {
        &self.view_mode
    }

    pub fn view_mode_mut(&mut self) -> &mut ViewModeController {
        &mut self.view_mode
    }
}
