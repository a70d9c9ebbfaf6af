use std::collections::VecDeque;

use super::metrics::MetricBundle;

pub const DEFAULT_HISTORY_SIZE: usize = 60;

/// Rolling load history for graphs
#[derive(Debug, Clone)]
pub struct MetricsHistory {
    capacity: usize,
    pub cpu_usage: VecDeque<f32>,
    pub memory_usage: VecDeque<f32>,
    pub gpu_usage: VecDeque<f32>,
}

impl MetricsHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            cpu_usage: VecDeque::with_capacity(capacity),
            memory_usage: VecDeque::with_capacity(capacity),
            gpu_usage: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn push_cpu(&mut self, value: f32) {
        let capacity = self.capacity;
        Self::push_value(&mut self.cpu_usage, value, capacity);
    }

    pub fn push_memory(&mut self, value: f32) {
        let capacity = self.capacity;
        Self::push_value(&mut self.memory_usage, value, capacity);
    }

    pub fn push_gpu(&mut self, value: f32) {
        let capacity = self.capacity;
        Self::push_value(&mut self.gpu_usage, value, capacity);
    }

    /// Record one bundle; GPU history only grows when a GPU reading is present
    pub fn push_bundle(&mut self, bundle: &MetricBundle) {
        self.push_cpu(bundle.cpu.global_usage);
        self.push_memory(bundle.memory.usage_percent);
        if let Some(gpu) = &bundle.gpu {
            self.push_gpu(gpu.load_percent);
        }
    }

    fn push_value<T>(queue: &mut VecDeque<T>, value: T, capacity: usize) {
        if queue.len() >= capacity {
            queue.pop_front();
        }
        queue.push_back(value);
    }

    pub fn cpu_average(&self) -> Option<f32> {
        average(&self.cpu_usage)
    }

    pub fn memory_average(&self) -> Option<f32> {
        average(&self.memory_usage)
    }
}

impl Default for MetricsHistory {
    fn default() -> Self {
        Self::new()
    }
}

fn average(values: &VecDeque<f32>) -> Option<f32> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f32>() / values.len() as f32)
    }
}
