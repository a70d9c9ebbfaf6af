use anyhow::Result;
use clap::ArgMatches;

use crate::core::system_monitor::{ProcessSortKey, ProcessView};
use crate::core::{Config, MonitorCore};
use crate::ui::system_formatters::print_process_table;

/// List the process table once
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let core = MonitorCore::new(Config::load()?);
    let snapshot = core.list_processes(false)?;

    let mut view = ProcessView::default();
    if let Some(key) = matches.get_one::<String>("sort") {
        view.sort_key = key.parse::<ProcessSortKey>()?;
    }
    view.descending = !matches.get_flag("asc");
    if let Some(filter) = matches.get_one::<String>("filter") {
        view.set_filter(filter.as_str());
    }

    let rows = view.apply(&snapshot.records);
    let limit = matches.get_one::<usize>("limit").copied().unwrap_or(rows.len());

    if matches.get_flag("json") {
        let visible: Vec<_> = rows.iter().take(limit).collect();
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    print_process_table(&rows, limit);
    Ok(())
}
