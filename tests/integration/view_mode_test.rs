use bytedog::core::view_mode::ViewMode;
use bytedog::{Config, MonitorCore};

use super::support::ScriptedSource;

#[test]
fn test_initial_mode_comes_from_config() {
    let (source, _) = ScriptedSource::new(Vec::new());
    let config = Config {
        view_mode: ViewMode::Detailed,
        ..Config::default()
    };
    let core = MonitorCore::with_source(source, config);

    assert_eq!(core.view_mode().current(), ViewMode::Detailed);
}

#[test]
fn test_cycle_visits_every_mode() {
    let (source, control) = ScriptedSource::new(Vec::new());
    let mut core = MonitorCore::with_source(source, Config::default());

    let visited: Vec<ViewMode> = (0..3).map(|_| core.view_mode_mut().cycle()).collect();
    assert_eq!(
        visited,
        vec![ViewMode::Compact, ViewMode::Detailed, ViewMode::Minimal]
    );

    // Switching views never touches the metric source.
    assert_eq!(control.enumerations(), 0);
}

#[test]
fn test_set_then_cycle() {
    let (source, _) = ScriptedSource::new(Vec::new());
    let mut core = MonitorCore::with_source(source, Config::default());

    core.view_mode_mut().set(ViewMode::Compact);
    assert_eq!(core.view_mode_mut().cycle(), ViewMode::Detailed);
}
