use anyhow::Result;
use clap::{Arg, ArgAction, Command};

use bytedog::commands;
use bytedog::core::process_control::ControlOperation;

fn pid_command(name: &'static str, about: &'static str) -> Command {
    Command::new(name).about(about).arg(
        Arg::new("pid")
            .help("Process ID")
            .required(true)
            .index(1)
            .value_parser(clap::value_parser!(u32)),
    )
}

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Output as JSON")
        .action(ArgAction::SetTrue)
}

fn build_cli() -> Command {
    Command::new("bytedog")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Lightweight system resource monitor")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("monitor")
                .about("Show live metrics from the background sampler")
                .arg(
                    Arg::new("interval")
                        .short('i')
                        .long("interval")
                        .value_name("SECONDS")
                        .help("Sampling interval (1.0-10.0, overrides the config)")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("count")
                        .short('n')
                        .long("count")
                        .value_name("N")
                        .help("Stop after N samples")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("view")
                        .long("view")
                        .value_name("MODE")
                        .help("View mode: minimal, compact or detailed"),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("ps")
                .about("List processes")
                .arg(
                    Arg::new("sort")
                        .short('s')
                        .long("sort")
                        .value_name("KEY")
                        .help("Sort by pid, name, cpu, memory or status (default: memory)"),
                )
                .arg(
                    Arg::new("asc")
                        .long("asc")
                        .help("Sort ascending")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("filter")
                        .short('f')
                        .long("filter")
                        .value_name("TEXT")
                        .help("Only show processes whose name contains TEXT"),
                )
                .arg(
                    Arg::new("limit")
                        .short('l')
                        .long("limit")
                        .value_name("N")
                        .help("Show at most N rows")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("info")
                .about("Detailed host view: cores, memory, disks, interfaces and health")
                .arg(json_flag()),
        )
        .subcommand(pid_command("details", "Show details for one process").arg(json_flag()))
        .subcommand(pid_command(
            "kill",
            "Terminate a process (SIGTERM, then SIGKILL after the grace period)",
        ))
        .subcommand(pid_command("suspend", "Suspend a process"))
        .subcommand(pid_command("resume", "Resume a suspended process"))
        .subcommand(
            Command::new("config")
                .about("Manage configuration")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("show").about("Show current configuration"))
                .subcommand(
                    Command::new("set-interval")
                        .about("Set the sampling interval in seconds")
                        .arg(
                            Arg::new("seconds")
                                .required(true)
                                .index(1)
                                .value_parser(clap::value_parser!(f64)),
                        ),
                )
                .subcommand(
                    Command::new("set-view")
                        .about("Set the default view mode")
                        .arg(Arg::new("mode").required(true).index(1)),
                )
                .subcommand(Command::new("reset").about("Restore default configuration")),
        )
}

fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    bytedog::init_logging(matches.get_count("verbose"));

    match matches.subcommand() {
        Some(("monitor", sub_matches)) => commands::monitor::execute(sub_matches),
        Some(("ps", sub_matches)) => commands::ps::execute(sub_matches),
        Some(("info", sub_matches)) => commands::info::execute(sub_matches),
        Some(("details", sub_matches)) => commands::control::execute_details(sub_matches),
        Some(("kill", sub_matches)) => {
            commands::control::execute(sub_matches, ControlOperation::Terminate)
        }
        Some(("suspend", sub_matches)) => {
            commands::control::execute(sub_matches, ControlOperation::Suspend)
        }
        Some(("resume", sub_matches)) => {
            commands::control::execute(sub_matches, ControlOperation::Resume)
        }
        Some(("config", sub_matches)) => commands::config::execute(sub_matches),
        _ => Ok(()),
    }
}
