//! Terminate, suspend and resume other processes.
//!
//! Every operation resolves to a [`ControlResult`]; nothing here returns an
//! error or panics. Termination asks politely first and escalates to a force
//! kill once the grace period runs out.

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::error::BytedogError;
use crate::platform::signal::{self, ProcessSignal};

pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(500);
const LIVENESS_POLL: Duration = Duration::from_millis(25);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ControlOperation {
    Terminate,
    Suspend,
    Resume,
}

impl ControlOperation {
    fn verb(&self) -> &'static str {
        match self {
            ControlOperation::Terminate => "kill",
            ControlOperation::Suspend => "suspend",
            ControlOperation::Resume => "resume",
        }
    }

    fn past_tense(&self) -> &'static str {
        match self {
            ControlOperation::Terminate => "Killed",
            ControlOperation::Suspend => "Suspended",
            ControlOperation::Resume => "Resumed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ControlFailure {
    NotFound,
    AccessDenied,
}

impl fmt::Display for ControlFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlFailure::NotFound => f.write_str("no such process"),
            ControlFailure::AccessDenied => f.write_str("access denied"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlResult {
    pub pid: u32,
    pub operation: ControlOperation,
    pub succeeded: bool,
    /// A force kill was sent after the grace period
    pub escalated: bool,
    pub failure: Option<ControlFailure>,
}

impl ControlResult {
    fn success(pid: u32, operation: ControlOperation, escalated: bool) -> Self {
        Self {
            pid,
            operation,
            succeeded: true,
            escalated,
            failure: None,
        }
    }

    fn failed(pid: u32, operation: ControlOperation, failure: ControlFailure) -> Self {
        Self {
            pid,
            operation,
            succeeded: false,
            escalated: false,
            failure: Some(failure),
        }
    }

    /// One-line status for the front end
    pub fn status_message(&self) -> String {
        if self.succeeded {
            format!("{} process {}", self.operation.past_tense(), self.pid)
        } else {
            format!("Failed to {} process {}", self.operation.verb(), self.pid)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProcessController {
    grace_period: Duration,
}

impl Default for ProcessController {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessController {
    pub fn new() -> Self {
        Self::with_grace_period(DEFAULT_GRACE_PERIOD)
    }

    pub fn with_grace_period(grace_period: Duration) -> Self {
        Self { grace_period }
    }

    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    pub fn terminate(&self, pid: u32) -> ControlResult {
        let operation = ControlOperation::Terminate;

        if let Err(e) = signal::send_signal(pid, ProcessSignal::Terminate) {
            return failure(pid, operation, e);
        }

        if self.wait_for_exit(pid) {
            log::info!("Process {} exited after SIGTERM", pid);
            return ControlResult::success(pid, operation, false);
        }

        log::info!(
            "Process {} still alive after {:?}, sending SIGKILL",
            pid,
            self.grace_period
        );
        match signal::send_signal(pid, ProcessSignal::Kill) {
            Ok(()) => ControlResult::success(pid, operation, true),
            // Exited between the last poll and the force kill.
            Err(BytedogError::ProcessNotFound(_)) => ControlResult::success(pid, operation, false),
            Err(e) => failure(pid, operation, e),
        }
    }

    pub fn suspend(&self, pid: u32) -> ControlResult {
        single_signal(pid, ControlOperation::Suspend, ProcessSignal::Stop)
    }

    pub fn resume(&self, pid: u32) -> ControlResult {
        single_signal(pid, ControlOperation::Resume, ProcessSignal::Continue)
    }

    fn wait_for_exit(&self, pid: u32) -> bool {
        let deadline = Instant::now() + self.grace_period;
        loop {
            if !signal::is_alive(pid) {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            thread::sleep(LIVENESS_POLL.min(deadline - now));
        }
    }
}

fn single_signal(pid: u32, operation: ControlOperation, sig: ProcessSignal) -> ControlResult {
    match signal::send_signal(pid, sig) {
        Ok(()) => {
            log::info!("{} process {}", operation.past_tense(), pid);
            ControlResult::success(pid, operation, false)
        }
        Err(e) => failure(pid, operation, e),
    }
}

fn failure(pid: u32, operation: ControlOperation, error: BytedogError) -> ControlResult {
    let kind = match error {
        BytedogError::ProcessNotFound(_) => ControlFailure::NotFound,
        _ => ControlFailure::AccessDenied,
    };
    log::warn!("Failed to {} process {}: {}", operation.verb(), pid, error);
    ControlResult::failed(pid, operation, kind)
}
