//! Overall health and load classification of a metric bundle.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::metrics::MetricBundle;

/// Load above this counts as a poor condition
pub const POOR_THRESHOLD: f32 = 80.0;
const MODERATE_THRESHOLD: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemHealth {
    Good,
    Fair,
    Poor,
}

impl SystemHealth {
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemHealth::Good => "good",
            SystemHealth::Fair => "fair",
            SystemHealth::Poor => "poor",
        }
    }
}

impl fmt::Display for SystemHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LoadLevel {
    Low,
    Moderate,
    High,
}

impl LoadLevel {
    pub fn from_percent(percent: f32) -> Self {
        if percent < MODERATE_THRESHOLD {
            LoadLevel::Low
        } else if percent < POOR_THRESHOLD {
            LoadLevel::Moderate
        } else {
            LoadLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoadLevel::Low => "low",
            LoadLevel::Moderate => "moderate",
            LoadLevel::High => "high",
        }
    }
}

impl fmt::Display for LoadLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health and load summary for one bundle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub health: SystemHealth,
    pub load: LoadLevel,
    pub peak_percent: f32,
    pub core_levels: Vec<LoadLevel>,
}

/// CPU, memory and (when present) GPU load, in that order
fn load_readings(bundle: &MetricBundle) -> Vec<f32> {
    let mut readings = vec![bundle.cpu.global_usage, bundle.memory.usage_percent];
    if let Some(gpu) = &bundle.gpu {
        readings.push(gpu.load_percent);
    }
    readings
}

pub fn overall_health(bundle: &MetricBundle) -> SystemHealth {
    let readings = load_readings(bundle);
    let poor = readings.iter().filter(|&&v| v > POOR_THRESHOLD).count();

    if poor == 0 {
        SystemHealth::Good
    } else if poor < readings.len() {
        SystemHealth::Fair
    } else {
        SystemHealth::Poor
    }
}

/// Highest of the load readings
pub fn peak_load(bundle: &MetricBundle) -> f32 {
    load_readings(bundle).into_iter().fold(0.0, f32::max)
}

pub fn evaluate(bundle: &MetricBundle) -> HealthReport {
    let peak_percent = peak_load(bundle);
    HealthReport {
        health: overall_health(bundle),
        load: LoadLevel::from_percent(peak_percent),
        peak_percent,
        core_levels: bundle
            .cpu
            .per_core_usage
            .iter()
            .map(|&usage| LoadLevel::from_percent(usage))
            .collect(),
    }
}
