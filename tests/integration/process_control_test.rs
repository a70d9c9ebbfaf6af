#![cfg(unix)]

use std::process::{Child, Command};
use std::thread;
use std::time::Duration;

use bytedog::core::process_control::{ControlFailure, ControlOperation, ProcessController};
use bytedog::core::system_monitor::ProcessStatus;
use bytedog::{Config, MonitorCore};

use super::support::wait_until;

fn spawn_sleeper() -> Child {
    Command::new("sleep").arg("30").spawn().unwrap()
}

fn status_of(core: &MonitorCore, pid: u32) -> Option<ProcessStatus> {
    core.process_details(pid).ok().map(|details| details.status)
}

#[test]
fn test_suspend_then_resume() {
    let mut child = spawn_sleeper();
    let pid = child.id();
    let core = MonitorCore::new(Config::default());

    let suspended = core.suspend(pid);
    assert!(suspended.succeeded);
    assert_eq!(suspended.operation, ControlOperation::Suspend);
    assert!(wait_until(Duration::from_secs(2), || {
        status_of(&core, pid) == Some(ProcessStatus::Stopped)
    }));

    let resumed = core.resume(pid);
    assert!(resumed.succeeded);
    assert!(wait_until(Duration::from_secs(2), || {
        status_of(&core, pid) != Some(ProcessStatus::Stopped)
    }));

    child.kill().unwrap();
    child.wait().unwrap();
}

#[test]
fn test_terminate_cooperative_process_without_escalation() {
    let mut child = spawn_sleeper();
    let controller = ProcessController::new();

    let result = controller.terminate(child.id());
    assert!(result.succeeded);
    assert!(!result.escalated);
    assert_eq!(result.failure, None);
    assert_eq!(result.status_message(), format!("Killed process {}", child.id()));

    child.wait().unwrap();
}

#[test]
fn test_terminate_escalates_when_sigterm_is_ignored() {
    let mut child = Command::new("sh")
        .arg("-c")
        .arg("trap '' TERM; exec sleep 30")
        .spawn()
        .unwrap();
    // Give the shell time to install the trap before signalling.
    thread::sleep(Duration::from_millis(300));

    let controller = ProcessController::with_grace_period(Duration::from_millis(300));
    let result = controller.terminate(child.id());

    assert!(result.succeeded);
    assert!(result.escalated);
    child.wait().unwrap();
}

#[test]
fn test_operations_on_missing_process_fail() {
    let controller = ProcessController::new();
    let pid = i32::MAX as u32;

    for result in [
        controller.terminate(pid),
        controller.suspend(pid),
        controller.resume(pid),
    ] {
        assert!(!result.succeeded);
        assert_eq!(result.failure, Some(ControlFailure::NotFound));
        assert!(result.status_message().starts_with("Failed to"));
    }
}
