use colored::*;

use crate::core::config::Config;
use crate::core::process_control::ControlResult;
use crate::core::system_monitor::health::{self, LoadLevel, SystemHealth};
use crate::core::system_monitor::{
    DiskMetrics, InterfaceInfo, MetricBundle, MetricsHistory, ProcessDetails, ProcessRecord,
    SampleBundle,
};
use crate::core::view_mode::ViewMode;

use super::formatters::{
    format_bytes, format_time, minimal_line, process_table_header, process_table_row,
    top_process_line,
};

const COMPACT_TOP_PROCESSES: usize = 8;
const DETAILED_TOP_PROCESSES: usize = 20;

fn colorize_percent(value: f32) -> ColoredString {
    let text = format!("{:.1}%", value);
    match LoadLevel::from_percent(value) {
        LoadLevel::Low => text.green(),
        LoadLevel::Moderate => text.yellow(),
        LoadLevel::High => text.red(),
    }
}

fn colorize_health(status: SystemHealth) -> ColoredString {
    let label = match status {
        SystemHealth::Good => "Good",
        SystemHealth::Fair => "Fair",
        SystemHealth::Poor => "Poor",
    };
    match status {
        SystemHealth::Good => label.green(),
        SystemHealth::Fair => label.yellow(),
        SystemHealth::Poor => label.red(),
    }
}

fn load_dot(level: LoadLevel) -> ColoredString {
    match level {
        LoadLevel::Low => "●".green(),
        LoadLevel::Moderate => "●".yellow(),
        LoadLevel::High => "●".red(),
    }
}

fn print_section_header(title: &str) {
    println!("\n{}", title.bold().green());
    println!("{}", "-".repeat(title.len()));
}

/// Render one sampler tick at the requested granularity
pub fn print_sample(sample: &SampleBundle, mode: ViewMode, history: &MetricsHistory) {
    let metrics = &sample.metrics;
    let report = health::evaluate(metrics);

    match mode {
        ViewMode::Minimal => {
            println!("{} {}", load_dot(report.load), minimal_line(metrics));
        }
        ViewMode::Compact => {
            println!(
                "\n{}  {}",
                format_time(metrics.captured_at).dimmed(),
                format!("Status: {}", colorize_health(report.health)).bold()
            );
            print_load_cards(metrics);
            print_top_processes(&sample.processes.records, COMPACT_TOP_PROCESSES);
        }
        ViewMode::Detailed => {
            println!(
                "\n{} {}  {}",
                "BYTEDOG".bold().bright_cyan(),
                format_time(metrics.captured_at).dimmed(),
                format!("Status: {}", colorize_health(report.health)).bold()
            );
            print_load_cards(metrics);
            print_per_core(metrics);
            print_memory(metrics);
            print_network(metrics);
            print_history(history);
            print_process_table(&sample.processes.records, DETAILED_TOP_PROCESSES);
        }
    }
}

fn print_load_cards(metrics: &MetricBundle) {
    println!("  CPU:    {}", colorize_percent(metrics.cpu.global_usage));
    println!("  Memory: {}", colorize_percent(metrics.memory.usage_percent));
    if let Some(gpu) = &metrics.gpu {
        println!("  GPU:    {}", colorize_percent(gpu.load_percent));
    }
}

fn print_per_core(metrics: &MetricBundle) {
    if metrics.cpu.per_core_usage.is_empty() {
        return;
    }
    print_section_header("CPU Cores");
    for (index, usage) in metrics.cpu.per_core_usage.iter().enumerate() {
        println!("  Core {}: {}", index, colorize_percent(*usage));
    }
}

fn print_memory(metrics: &MetricBundle) {
    let memory = &metrics.memory;
    print_section_header("Memory");
    println!(
        "  RAM:  {} / {} ({} available)",
        format_bytes(memory.used_bytes),
        format_bytes(memory.total_bytes),
        format_bytes(memory.available_bytes)
    );
    if memory.swap_total_bytes > 0 {
        println!(
            "  Swap: {} / {} ({})",
            format_bytes(memory.swap_used_bytes),
            format_bytes(memory.swap_total_bytes),
            colorize_percent(memory.swap_percent)
        );
    }

    if let Some(gpu) = &metrics.gpu {
        print_section_header("GPU");
        println!("  Name: {}", gpu.name);
        println!(
            "  Memory: {} / {} ({:.1}%)",
            format_bytes(gpu.memory_used_bytes),
            format_bytes(gpu.memory_total_bytes),
            gpu.memory_percent
        );
        if let Some(temp) = gpu.temperature_celsius {
            println!("  Temperature: {}°C", temp);
        }
    }
}

fn print_network(metrics: &MetricBundle) {
    let network = &metrics.network;
    print_section_header("Network");
    println!(
        "  Sent: {} ({} packets)",
        format_bytes(network.bytes_sent),
        network.packets_sent
    );
    println!(
        "  Received: {} ({} packets)",
        format_bytes(network.bytes_recv),
        network.packets_recv
    );
}

fn print_history(history: &MetricsHistory) {
    let (Some(cpu), Some(memory)) = (history.cpu_average(), history.memory_average()) else {
        return;
    };
    println!(
        "\n  {} over last {} samples: CPU {:.1}%, memory {:.1}%",
        "Average".dimmed(),
        history.cpu_usage.len(),
        cpu,
        memory
    );
}

fn print_top_processes(records: &[ProcessRecord], limit: usize) {
    println!("\n{}", "TOP PROCESSES (by Memory)".bold());
    println!("{}", "-".repeat(30));
    for record in records.iter().take(limit) {
        println!("{}", top_process_line(record));
    }
}

/// Full process table, first `limit` rows
pub fn print_process_table(records: &[ProcessRecord], limit: usize) {
    println!("\n{}", process_table_header().bold());
    for record in records.iter().take(limit) {
        println!("{}", process_table_row(record));
    }
    if records.len() > limit {
        println!("{}", format!("  ... {} more", records.len() - limit).dimmed());
    }
}

/// Detailed host view: loads, per-core, memory, disks, interfaces, health
pub fn print_host_info(metrics: &MetricBundle, disks: &[DiskMetrics], interfaces: &[InterfaceInfo]) {
    let report = health::evaluate(metrics);

    println!("\n{}", "SYSTEM STATUS".bold().bright_cyan());
    println!("{}", "=".repeat(60));
    println!(
        "  Status: {}  Load: {} (peak {:.1}%)",
        colorize_health(report.health),
        report.load,
        report.peak_percent
    );
    print_load_cards(metrics);
    print_per_core(metrics);
    print_memory(metrics);

    if !disks.is_empty() {
        print_section_header("Disks");
        for disk in disks {
            println!(
                "  {} on {} ({}): {} / {} ({})",
                disk.device,
                disk.mount_point,
                disk.fs_type,
                format_bytes(disk.used_bytes),
                format_bytes(disk.total_bytes),
                colorize_percent(disk.usage_percent)
            );
        }
    }

    print_network(metrics);
    for interface in interfaces.iter().filter(|i| !i.ipv4.is_empty()) {
        println!("  {}: {}", interface.name, interface.ipv4.join(", "));
    }

    println!();
}

pub fn print_process_details(details: &ProcessDetails) {
    print_section_header(&format!("Process {}", details.pid));
    println!("  Name: {}", details.name);
    println!("  Status: {}", details.status);
    if let Some(started) = details.started_at {
        println!("  Started: {}", format_time(started));
    }
    println!("  Memory: {:.2}%", details.memory_percent);
    if let Some(threads) = details.thread_count {
        println!("  Threads: {}", threads);
    }
    if let Some(exe) = &details.exe {
        println!("  Executable: {}", exe);
    }
}

pub fn print_control_result(result: &ControlResult) {
    let message = result.status_message();
    if result.succeeded {
        let suffix = if result.escalated { " (forced)" } else { "" };
        println!("{}{}", message.green(), suffix.dimmed());
    } else {
        let reason = result
            .failure
            .map(|failure| format!(": {}", failure))
            .unwrap_or_default();
        println!("{}{}", message.red(), reason);
    }
}

pub fn print_config(config: &Config) {
    print_section_header("Configuration");
    println!("  Update interval: {:.1} s", config.update_interval_secs);
    println!("  Process cache TTL: {} ms", config.process_cache_ttl_ms);
    println!("  Terminate grace: {} ms", config.terminate_grace_ms);
    println!("  Queue capacity: {}", config.queue_capacity);
    println!("  Poll interval: {} ms", config.poll_interval_ms);
    println!("  History capacity: {}", config.history_capacity);
    println!("  Tick timeout: {} ms", config.tick_timeout_ms);
    println!("  Source wait: {} ms", config.source_wait_ms);
    println!("  View mode: {}", config.view_mode);
}
