use anyhow::Result;
use clap::ArgMatches;
use serde_json::json;

use crate::core::system_monitor::health;
use crate::core::{Config, MonitorCore};
use crate::ui::system_formatters::print_host_info;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let core = MonitorCore::new(Config::load()?);
    let metrics = core.sample_metrics()?;
    let disks = core.disks()?;
    let interfaces = core.interfaces()?;

    if matches.get_flag("json") {
        let value = json!({
            "metrics": metrics,
            "health": health::evaluate(&metrics),
            "disks": disks,
            "interfaces": interfaces,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    print_host_info(&metrics, &disks, &interfaces);
    Ok(())
}
