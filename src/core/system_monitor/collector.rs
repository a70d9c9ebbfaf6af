use std::net::IpAddr;
use std::time::Instant;

use chrono::{DateTime, Utc};
use sysinfo::{
    CpuRefreshKind, Disks, MemoryRefreshKind, Networks, Pid, ProcessRefreshKind,
    ProcessesToUpdate, RefreshKind, System,
};

use crate::error::{BytedogError, Result};
use crate::platform::gpu::get_gpu_provider;

use super::gpu::GpuProvider;
use super::metrics::*;
use super::process::{extract_records, map_status, memory_percent};
use super::source::MetricSource;

/// Configuration for metrics collection
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub collect_gpu: bool,
    pub collect_per_core: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            collect_gpu: true,
            collect_per_core: true,
        }
    }
}

/// Collects host metrics through sysinfo
pub struct MetricsCollector {
    system: System,
    disks: Disks,
    networks: Networks,
    gpu_provider: Option<Box<dyn GpuProvider>>,
    config: CollectorConfig,
    last_cpu_refresh: Instant,
}

impl MetricsCollector {
    /// Create a new MetricsCollector with default configuration
    pub fn new() -> Self {
        Self::with_config(CollectorConfig::default())
    }

    /// Create a new MetricsCollector with custom configuration
    pub fn with_config(config: CollectorConfig) -> Self {
        let refresh_kind = RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::nothing().with_cpu_usage())
            .with_memory(MemoryRefreshKind::everything());

        // Prime the CPU counters; `cpu()` waits out the rest of
        // MINIMUM_CPU_UPDATE_INTERVAL before its first diff.
        let mut system = System::new_with_specifics(refresh_kind);
        system.refresh_cpu_usage();
        let last_cpu_refresh = Instant::now();

        let disks = Disks::new_with_refreshed_list();
        let networks = Networks::new_with_refreshed_list();

        // Try to initialize GPU provider (graceful failure)
        let gpu_provider = if config.collect_gpu {
            match get_gpu_provider() {
                Ok(provider) => {
                    log::info!("GPU monitoring enabled ({:?})", provider.vendor());
                    Some(provider)
                }
                Err(e) => {
                    log::warn!("GPU monitoring disabled: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            system,
            disks,
            networks,
            gpu_provider,
            config,
            last_cpu_refresh,
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSource for MetricsCollector {
    fn cpu(&mut self) -> Result<CpuMetrics> {
        // Two refreshes closer than the minimum interval yield a meaningless diff.
        let since_last = self.last_cpu_refresh.elapsed();
        if since_last < sysinfo::MINIMUM_CPU_UPDATE_INTERVAL {
            std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL - since_last);
        }
        self.system.refresh_cpu_usage();
        self.last_cpu_refresh = Instant::now();

        let per_core_usage = if self.config.collect_per_core {
            self.system.cpus().iter().map(|cpu| cpu.cpu_usage()).collect()
        } else {
            Vec::new()
        };

        Ok(CpuMetrics {
            global_usage: self.system.global_cpu_usage(),
            per_core_usage,
        })
    }

    fn memory(&mut self) -> Result<MemoryMetrics> {
        self.system.refresh_memory();

        let total = self.system.total_memory();
        if total == 0 {
            return Err(BytedogError::metric_collection(
                "OS reported zero total memory",
            ));
        }
        let used = self.system.used_memory();
        let swap_total = self.system.total_swap();
        let swap_used = self.system.used_swap();

        Ok(MemoryMetrics {
            total_bytes: total,
            used_bytes: used,
            available_bytes: self.system.available_memory(),
            usage_percent: (used as f32 / total as f32) * 100.0,
            swap_total_bytes: swap_total,
            swap_used_bytes: swap_used,
            swap_percent: if swap_total > 0 {
                (swap_used as f32 / swap_total as f32) * 100.0
            } else {
                0.0
            },
        })
    }

    fn network(&mut self) -> Result<NetworkCounters> {
        self.networks.refresh(true);

        Ok(self
            .networks
            .values()
            .fold(NetworkCounters::default(), |acc, data| NetworkCounters {
                bytes_sent: acc.bytes_sent + data.total_transmitted(),
                bytes_recv: acc.bytes_recv + data.total_received(),
                packets_sent: acc.packets_sent + data.total_packets_transmitted(),
                packets_recv: acc.packets_recv + data.total_packets_received(),
            }))
    }

    fn disks(&mut self) -> Result<Vec<DiskMetrics>> {
        self.disks.refresh(true);

        Ok(self
            .disks
            .iter()
            .map(|disk| {
                let total = disk.total_space();
                let used = total.saturating_sub(disk.available_space());

                DiskMetrics {
                    device: disk.name().to_string_lossy().to_string(),
                    mount_point: disk.mount_point().to_string_lossy().to_string(),
                    fs_type: disk.file_system().to_string_lossy().to_string(),
                    total_bytes: total,
                    used_bytes: used,
                    usage_percent: if total > 0 {
                        (used as f32 / total as f32) * 100.0
                    } else {
                        0.0
                    },
                }
            })
            .collect())
    }

    fn interfaces(&mut self) -> Result<Vec<InterfaceInfo>> {
        self.networks.refresh(true);

        let mut interfaces: Vec<InterfaceInfo> = self
            .networks
            .iter()
            .map(|(name, data)| InterfaceInfo {
                name: name.to_string(),
                ipv4: data
                    .ip_networks()
                    .iter()
                    .filter(|network| matches!(network.addr, IpAddr::V4(_)))
                    .map(|network| network.addr.to_string())
                    .collect(),
            })
            .collect();

        interfaces.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(interfaces)
    }

    fn gpu(&mut self) -> Option<GpuMetrics> {
        let provider = self.gpu_provider.as_mut()?;
        match provider.collect_metrics() {
            Ok(metrics) => Some(metrics),
            Err(e) => {
                log::debug!("GPU collection failed: {}", e);
                None
            }
        }
    }

    fn processes(&mut self) -> Result<Vec<ProcessRecord>> {
        self.system.refresh_memory();
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_memory().without_tasks(),
        );

        Ok(extract_records(&self.system))
    }

    fn process_details(&mut self, pid: u32) -> Result<ProcessDetails> {
        let sys_pid = Pid::from_u32(pid);
        self.system.refresh_memory();
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[sys_pid]),
            true,
            ProcessRefreshKind::everything(),
        );

        let process = self
            .system
            .process(sys_pid)
            .ok_or(BytedogError::ProcessNotFound(pid))?;

        Ok(ProcessDetails {
            pid,
            name: process.name().to_string_lossy().to_string(),
            status: map_status(process.status()),
            started_at: DateTime::<Utc>::from_timestamp(process.start_time() as i64, 0),
            memory_percent: memory_percent(process, self.system.total_memory()),
            thread_count: process.tasks().map(|tasks| tasks.len()),
            exe: process.exe().map(|path| path.to_string_lossy().to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collector() -> MetricsCollector {
        MetricsCollector::with_config(CollectorConfig {
            collect_gpu: false,
            collect_per_core: true,
        })
    }

    #[test]
    fn test_samples_metrics_without_nan() {
        let mut collector = collector();

        let cpu = collector.cpu().unwrap();
        assert!(cpu.global_usage.is_finite());
        assert!(cpu.per_core_usage.iter().all(|v| v.is_finite()));

        let memory = collector.memory().unwrap();
        assert!(memory.total_bytes > 0);
        assert!(memory.usage_percent.is_finite());
    }

    #[test]
    fn test_process_table_contains_current_process() {
        let mut collector = collector();
        let records = collector.processes().unwrap();

        let me = std::process::id();
        let record = records.iter().find(|r| r.pid == me);
        assert!(record.is_some(), "current process should be enumerated");
        assert!(records.iter().all(|r| r.cpu_percent == 0.0));
    }

    #[test]
    fn test_process_table_is_in_pid_order() {
        let mut collector = collector();
        let records = collector.processes().unwrap();

        assert!(records.windows(2).all(|w| w[0].pid < w[1].pid));
    }

    #[test]
    fn test_first_cpu_read_waits_for_minimum_interval() {
        let started = Instant::now();
        let mut collector = collector();

        collector.cpu().unwrap();
        assert!(started.elapsed() >= sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);

        // Later reads spaced by at least the interval do not sleep again.
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        let before = Instant::now();
        collector.cpu().unwrap();
        assert!(before.elapsed() < sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_threads_are_not_listed_as_processes() {
        use std::sync::{mpsc, Arc, Barrier};

        let ready = Arc::new(Barrier::new(5));
        let (release, parked) = mpsc::channel::<()>();
        let parked = Arc::new(parking_lot::Mutex::new(parked));
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let ready = Arc::clone(&ready);
                let parked = Arc::clone(&parked);
                std::thread::spawn(move || {
                    ready.wait();
                    let _ = parked.lock().recv();
                })
            })
            .collect();
        ready.wait();

        let me = std::process::id();
        let tids: Vec<u32> = std::fs::read_dir("/proc/self/task")
            .unwrap()
            .filter_map(|entry| entry.ok()?.file_name().to_str()?.parse().ok())
            .filter(|tid| *tid != me)
            .collect();
        assert!(tids.len() >= 4);

        let mut collector = collector();
        // A details refresh loads the task list of this process.
        collector.process_details(me).unwrap();
        let records = collector.processes().unwrap();

        drop(release);
        for worker in workers {
            worker.join().unwrap();
        }

        assert!(records.iter().any(|r| r.pid == me));
        let leaked: Vec<u32> = records
            .iter()
            .map(|r| r.pid)
            .filter(|pid| tids.contains(pid))
            .collect();
        assert!(leaked.is_empty(), "threads listed as processes: {:?}", leaked);
    }

    struct UnreadableGpu;

    impl GpuProvider for UnreadableGpu {
        fn vendor(&self) -> GpuVendor {
            GpuVendor::Nvidia
        }

        fn collect_metrics(&mut self) -> Result<GpuMetrics> {
            Err(BytedogError::metric_collection("device lost"))
        }
    }

    #[test]
    fn test_gpu_read_failure_yields_no_gpu_section() {
        let mut collector = collector();
        assert!(collector.gpu().is_none());

        collector.gpu_provider = Some(Box::new(UnreadableGpu));
        assert!(collector.gpu().is_none());
    }

    #[test]
    fn test_details_for_missing_process() {
        let mut collector = collector();
        let result = collector.process_details(u32::MAX - 1);
        assert!(matches!(result, Err(BytedogError::ProcessNotFound(_))));
    }
}
