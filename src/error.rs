use std::io;
use thiserror::Error;

/// Custom error type for ByteDog
#[derive(Error, Debug)]
pub enum BytedogError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("GPU not available: {0}")]
    GpuNotAvailable(String),

    #[error("Metric collection failed: {0}")]
    MetricCollection(String),

    #[error("Sampling tick failed: {0}")]
    TransientSampleFailure(String),

    #[error("Handoff queue full, dropped {0} unread bundle(s)")]
    QueueSaturated(u64),

    #[error("Process {0} not found")]
    ProcessNotFound(u32),

    #[error("Access denied to process {0}")]
    ProcessAccessDenied(u32),
}

/// Result type alias for ByteDog
pub type Result<T> = std::result::Result<T, BytedogError>;

impl BytedogError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        BytedogError::Config(msg.into())
    }

    pub fn gpu_not_available<S: Into<String>>(msg: S) -> Self {
        BytedogError::GpuNotAvailable(msg.into())
    }

    pub fn metric_collection<S: Into<String>>(msg: S) -> Self {
        BytedogError::MetricCollection(msg.into())
    }

    pub fn transient<S: Into<String>>(msg: S) -> Self {
        BytedogError::TransientSampleFailure(msg.into())
    }

    /// True for failures the sampler absorbs and retries on the next tick
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            BytedogError::TransientSampleFailure(_)
                | BytedogError::MetricCollection(_)
                | BytedogError::QueueSaturated(_)
        )
    }
}
