use std::time::{Duration, Instant};

use bytedog::{Config, MonitorCore};

use super::support::{record, wait_until, ScriptedSource};

fn core_with_queue(capacity: usize) -> (MonitorCore, super::support::SourceControl) {
    let (source, control) = ScriptedSource::new(vec![record(1, "init", 0.1), record(2, "sh", 0.3)]);
    let config = Config {
        queue_capacity: capacity,
        ..Config::default()
    };
    (MonitorCore::with_source(source, config), control)
}

#[test]
fn test_sampler_runs_without_consumer() {
    let (core, _) = core_with_queue(3);
    let sampler = core.start_sampler(Duration::from_millis(20)).unwrap();

    let start = Instant::now();
    assert!(wait_until(Duration::from_secs(10), || sampler.stats().ticks >= 10));
    assert!(start.elapsed() < Duration::from_secs(10));

    let stats = sampler.stats();
    assert!(stats.dropped >= 1);
    assert!(sampler.drain().len() <= 3);
    sampler.shutdown();
}

#[test]
fn test_bundles_arrive_at_the_configured_cadence() {
    let (core, _) = core_with_queue(8);
    let sampler = core.start_sampler(Duration::from_millis(200)).unwrap();

    std::thread::sleep(Duration::from_millis(500));
    let bundles = sampler.drain();
    assert!(bundles.len() >= 2, "got {} bundles", bundles.len());

    let bundle = &bundles[0];
    assert_eq!(bundle.metrics.cpu.global_usage, 25.0);
    assert_eq!(bundle.processes.records[0].pid, 2);
    sampler.shutdown();
}

#[test]
fn test_sampler_refreshes_process_cache() {
    let (core, control) = core_with_queue(8);
    assert!(core.cached_processes().is_none());

    let sampler = core.start_sampler(Duration::from_millis(50)).unwrap();
    assert!(wait_until(Duration::from_secs(5), || sampler.stats().published >= 1));

    let cached = core.cached_processes().unwrap();
    assert_eq!(cached.len(), 2);
    assert!(control.enumerations() >= 1);
    sampler.shutdown();
}

#[test]
fn test_failed_ticks_are_skipped_and_recovered() {
    let (core, control) = core_with_queue(8);
    control.set_failing(true);

    let sampler = core.start_sampler(Duration::from_millis(20)).unwrap();
    assert!(wait_until(Duration::from_secs(5), || sampler.stats().failed >= 3));
    assert!(sampler.poll_bundle().is_none());

    control.set_failing(false);
    assert!(wait_until(Duration::from_secs(5), || sampler.poll_bundle().is_some()));
    sampler.shutdown();
}

#[test]
fn test_interval_change_applies_to_following_sleeps() {
    let (core, _) = core_with_queue(64);
    let sampler = core.start_sampler(Duration::from_secs(30)).unwrap();

    assert!(wait_until(Duration::from_secs(5), || sampler.stats().ticks >= 1));
    sampler.set_interval(Duration::from_millis(20));
    assert_eq!(sampler.interval(), Duration::from_millis(20));

    // The 30 s sleep already in progress is not cut short.
    std::thread::sleep(Duration::from_millis(300));
    assert_eq!(sampler.stats().ticks, 1);
    sampler.shutdown();
}

#[test]
fn test_dropping_handle_stops_sampler() {
    let (core, control) = core_with_queue(4);
    let sampler = core.start_sampler(Duration::from_millis(20)).unwrap();
    assert!(wait_until(Duration::from_secs(5), || control.enumerations() >= 2));

    drop(sampler);
    let after_drop = control.enumerations();
    std::thread::sleep(Duration::from_millis(200));
    assert_eq!(control.enumerations(), after_drop);
}

#[test]
fn test_reads_stay_bounded_while_tick_hangs() {
    let (source, control) = ScriptedSource::new(vec![record(1, "init", 0.1)]);
    let config = Config {
        tick_timeout_ms: 200,
        source_wait_ms: 100,
        ..Config::default()
    };
    let core = MonitorCore::with_source(source.with_delay(Duration::from_secs(3)), config);

    let sampler = core.start_sampler(Duration::from_millis(50)).unwrap();
    // Let the first tick time out while its enumeration keeps the source.
    std::thread::sleep(Duration::from_millis(300));
    assert!(sampler.stats().failed >= 1);

    let start = Instant::now();
    let metrics = core.sample_metrics();
    assert!(start.elapsed() < Duration::from_millis(500));
    assert!(metrics.unwrap_err().is_transient());

    let start = Instant::now();
    assert!(core.list_processes(true).is_err());
    assert!(core.disks().is_err());
    assert!(start.elapsed() < Duration::from_millis(500));
    assert_eq!(control.enumerations(), 0);

    sampler.shutdown();
}
