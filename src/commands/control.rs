//! Per-process commands: details, kill, suspend, resume.

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::process_control::ControlOperation;
use crate::core::{Config, MonitorCore, ProcessController};
use crate::ui::system_formatters::{print_control_result, print_process_details};

fn pid_arg(matches: &ArgMatches) -> Result<u32> {
    matches
        .get_one::<u32>("pid")
        .copied()
        .context("PID argument is required")
}

pub fn execute_details(matches: &ArgMatches) -> Result<()> {
    let pid = pid_arg(matches)?;
    let core = MonitorCore::new(Config::load()?);
    let details = core
        .process_details(pid)
        .with_context(|| format!("Could not read process {}", pid))?;

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&details)?);
    } else {
        print_process_details(&details);
    }
    Ok(())
}

/// Send a control operation; exits non-zero when it fails
pub fn execute(matches: &ArgMatches, operation: ControlOperation) -> Result<()> {
    let pid = pid_arg(matches)?;
    let config = Config::load()?;
    let controller = ProcessController::with_grace_period(config.terminate_grace());

    let result = match operation {
        ControlOperation::Terminate => controller.terminate(pid),
        ControlOperation::Suspend => controller.suspend(pid),
        ControlOperation::Resume => controller.resume(pid),
    };

    print_control_result(&result);
    if !result.succeeded {
        std::process::exit(1);
    }
    Ok(())
}
