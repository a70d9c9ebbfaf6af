//! Signal delivery and liveness checks for other processes.
//!
//! Unix goes through `kill(2)` directly so errno can be mapped to the
//! not-found / access-denied split. Elsewhere sysinfo's portable signals are
//! used; a signal the platform cannot express is reported as access denied.

use sysinfo::{Pid, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System};

use crate::error::{BytedogError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessSignal {
    Terminate,
    Kill,
    Stop,
    Continue,
}

#[cfg(unix)]
pub fn send_signal(pid: u32, signal: ProcessSignal) -> Result<()> {
    let raw = i32::try_from(pid)
        .ok()
        .filter(|raw| *raw > 0)
        .ok_or(BytedogError::ProcessNotFound(pid))?;

    let signo = match signal {
        ProcessSignal::Terminate => libc::SIGTERM,
        ProcessSignal::Kill => libc::SIGKILL,
        ProcessSignal::Stop => libc::SIGSTOP,
        ProcessSignal::Continue => libc::SIGCONT,
    };

    // A positive pid addresses exactly one process, never a group.
    if unsafe { libc::kill(raw as libc::pid_t, signo) } == 0 {
        return Ok(());
    }

    let err = std::io::Error::last_os_error();
    match err.raw_os_error() {
        Some(libc::ESRCH) => Err(BytedogError::ProcessNotFound(pid)),
        Some(libc::EPERM) => Err(BytedogError::ProcessAccessDenied(pid)),
        _ => Err(BytedogError::Io(err)),
    }
}

#[cfg(not(unix))]
pub fn send_signal(pid: u32, signal: ProcessSignal) -> Result<()> {
    use sysinfo::Signal;

    if pid == 0 {
        return Err(BytedogError::ProcessNotFound(pid));
    }

    let sys_pid = Pid::from_u32(pid);
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[sys_pid]),
        true,
        ProcessRefreshKind::nothing(),
    );
    let process = system
        .process(sys_pid)
        .ok_or(BytedogError::ProcessNotFound(pid))?;

    let delivered = match signal {
        // No graceful stop on this platform: fall back to a plain kill.
        ProcessSignal::Terminate => process.kill_with(Signal::Term).or_else(|| Some(process.kill())),
        ProcessSignal::Kill => Some(process.kill()),
        ProcessSignal::Stop => process.kill_with(Signal::Stop),
        ProcessSignal::Continue => process.kill_with(Signal::Continue),
    };

    match delivered {
        Some(true) => Ok(()),
        _ => Err(BytedogError::ProcessAccessDenied(pid)),
    }
}

/// Whether `pid` names a process that has not exited; zombies count as exited
pub fn is_alive(pid: u32) -> bool {
    if pid == 0 {
        return false;
    }

    let sys_pid = Pid::from_u32(pid);
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[sys_pid]),
        true,
        ProcessRefreshKind::nothing(),
    );

    system
        .process(sys_pid)
        .is_some_and(|process| !matches!(process.status(), ProcessStatus::Zombie | ProcessStatus::Dead))
}
