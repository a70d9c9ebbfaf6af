//! Live monitor command handler.
//!
//! Starts the background sampler and drains its queue on the configured poll
//! interval until Ctrl-C or the requested number of samples.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde_json::json;

use crate::core::system_monitor::{health, MetricsHistory, SampleBundle};
use crate::core::view_mode::ViewMode;
use crate::core::{Config, MonitorCore};
use crate::ui::system_formatters::print_sample;

const JSON_TOP_PROCESSES: usize = 10;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(secs) = matches.get_one::<f64>("interval") {
        config.set_update_interval(*secs);
    }

    let count = matches.get_one::<u64>("count").copied();
    let json_output = matches.get_flag("json");

    let mut core = MonitorCore::new(config);
    if let Some(view) = matches.get_one::<String>("view") {
        let mode: ViewMode = view.parse()?;
        core.view_mode_mut().set(mode);
    }

    let running = Arc::new(AtomicBool::new(true));
    let handler_flag = Arc::clone(&running);
    ctrlc::set_handler(move || handler_flag.store(false, Ordering::SeqCst))
        .context("Failed to install Ctrl-C handler")?;

    let sampler = core
        .start_sampler(core.config().update_interval())
        .context("Failed to start sampler")?;

    let mut history = MetricsHistory::with_capacity(core.config().history_capacity);
    let poll_interval = core.config().poll_interval();
    let mut shown: u64 = 0;

    while running.load(Ordering::SeqCst) {
        for sample in sampler.drain() {
            history.push_bundle(&sample.metrics);

            if json_output {
                println!("{}", sample_json(&sample)?);
            } else {
                print_sample(&sample, core.view_mode().current(), &history);
            }

            shown += 1;
            if count.is_some_and(|limit| shown >= limit) {
                running.store(false, Ordering::SeqCst);
                break;
            }
        }

        if running.load(Ordering::SeqCst) {
            thread::sleep(poll_interval);
        }
    }

    let stats = sampler.stats();
    log::info!(
        "Monitor finished: {} ticks, {} failed, {} dropped unread",
        stats.ticks,
        stats.failed,
        stats.dropped
    );
    sampler.shutdown();

    Ok(())
}

fn sample_json(sample: &SampleBundle) -> Result<String> {
    let top: Vec<_> = sample
        .processes
        .records
        .iter()
        .take(JSON_TOP_PROCESSES)
        .collect();

    let value = json!({
        "tick": sample.tick,
        "metrics": sample.metrics,
        "health": health::evaluate(&sample.metrics),
        "process_count": sample.processes.len(),
        "top_processes": top,
    });

    Ok(serde_json::to_string(&value)?)
}
