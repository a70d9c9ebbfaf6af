use chrono::{DateTime, Local, Utc};

use crate::core::system_monitor::{MetricBundle, ProcessRecord};

const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Human-readable size with two decimals, B through PB
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    for unit in BYTE_UNITS {
        if value < 1024.0 {
            return format!("{:.2} {}", value, unit);
        }
        value /= 1024.0;
    }
    format!("{:.2} PB", value)
}

/// Timestamp in local time (YYYY-MM-DD HH:MM:SS)
pub fn format_time(time: DateTime<Utc>) -> String {
    let local: DateTime<Local> = time.into();
    local.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Cut `name` to at most `width` characters
pub fn truncate_name(name: &str, width: usize) -> String {
    name.chars().take(width).collect()
}

/// Single status line for the minimal view
pub fn minimal_line(bundle: &MetricBundle) -> String {
    let mut line = format!(
        "CPU: {:.0}% | RAM: {:.0}%",
        bundle.cpu.global_usage, bundle.memory.usage_percent
    );
    if let Some(gpu) = &bundle.gpu {
        line.push_str(&format!(" | GPU: {:.0}%", gpu.load_percent));
    }
    line
}

/// Name and memory share, for the compact top list
pub fn top_process_line(record: &ProcessRecord) -> String {
    format!(
        "{:<15} {:>6.1}%",
        truncate_name(&record.name, 15),
        record.memory_percent
    )
}

pub fn process_table_header() -> String {
    format!(
        "{:>8}  {:<30} {:>6} {:>6}  {}",
        "PID", "NAME", "CPU%", "MEM%", "STATUS"
    )
}

pub fn process_table_row(record: &ProcessRecord) -> String {
    format!(
        "{:>8}  {:<30} {:>6.1} {:>6.1}  {}",
        record.pid,
        truncate_name(&record.name, 30),
        record.cpu_percent,
        record.memory_percent,
        record.status
    )
}
