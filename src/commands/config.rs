use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use crate::core::view_mode::ViewMode;
use crate::core::Config;
use crate::ui::system_formatters::print_config;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("show", _)) => {
            print_config(&Config::load()?);
            println!("\n  File: {}", Config::get_config_path()?.display());
            Ok(())
        }
        Some(("set-interval", sub_matches)) => set_interval(sub_matches),
        Some(("set-view", sub_matches)) => set_view(sub_matches),
        Some(("reset", _)) => {
            let mut config = Config::load()?;
            config.reset_to_defaults();
            config.save()?;
            println!("{}", "Configuration reset to defaults".green());
            Ok(())
        }
        _ => {
            println!("Use 'bytedog config --help' for more information.");
            Ok(())
        }
    }
}

fn set_interval(matches: &ArgMatches) -> Result<()> {
    let secs = matches
        .get_one::<f64>("seconds")
        .copied()
        .context("Interval argument is required")?;

    let mut config = Config::load()?;
    let stored = config.set_update_interval(secs);
    config.save()?;

    if (stored - secs).abs() > f64::EPSILON {
        println!(
            "{}",
            format!("Interval adjusted to {:.1} s (range 1.0-10.0, 0.5 steps)", stored).yellow()
        );
    } else {
        println!("{}", format!("Update interval set to {:.1} s", stored).green());
    }
    Ok(())
}

fn set_view(matches: &ArgMatches) -> Result<()> {
    let mode: ViewMode = matches
        .get_one::<String>("mode")
        .context("Mode argument is required")?
        .parse()?;

    let mut config = Config::load()?;
    config.view_mode = mode;
    config.save()?;

    println!("{}", format!("Default view set to {}", mode).green());
    Ok(())
}
