use std::sync::Arc;
use std::thread;
use std::time::Duration;

use bytedog::{Config, MonitorCore};

use super::support::{record, ScriptedSource};

fn config_with_ttl(ttl_ms: u64) -> Config {
    Config {
        process_cache_ttl_ms: ttl_ms,
        ..Config::default()
    }
}

#[test]
fn test_cached_listing_reuses_snapshot_until_expiry() {
    let (source, control) = ScriptedSource::new(vec![record(1, "init", 0.1)]);
    let core = MonitorCore::with_source(source, config_with_ttl(300));

    let first = core.list_processes(true).unwrap();
    let second = core.list_processes(true).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(control.enumerations(), 1);

    thread::sleep(Duration::from_millis(400));

    let third = core.list_processes(true).unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
    assert!(third.taken_at >= first.taken_at);
    assert_eq!(control.enumerations(), 2);
}

#[test]
fn test_uncached_listing_always_enumerates() {
    let (source, control) = ScriptedSource::new(vec![record(1, "init", 0.1)]);
    let core = MonitorCore::with_source(source, config_with_ttl(60_000));

    let _ = core.list_processes(true).unwrap();
    let fresh = core.list_processes(false).unwrap();

    assert_eq!(control.enumerations(), 2);
    let cached = core.cached_processes().unwrap();
    assert!(Arc::ptr_eq(&cached, &fresh));
}

#[test]
fn test_listing_is_sorted_by_memory() {
    let (source, _) = ScriptedSource::new(vec![
        record(3, "small", 0.5),
        record(7, "large", 12.0),
        record(9, "medium", 4.0),
        record(11, "medium-too", 4.0),
    ]);
    let core = MonitorCore::with_source(source, Config::default());

    let snapshot = core.list_processes(false).unwrap();
    let pids: Vec<u32> = snapshot.records.iter().map(|r| r.pid).collect();
    assert_eq!(pids, vec![7, 9, 11, 3]);
    assert!(snapshot.records.iter().all(|r| r.cpu_percent == 0.0));
}

#[test]
fn test_concurrent_cached_reads_enumerate_once() {
    let (source, control) = ScriptedSource::new(vec![record(1, "init", 0.1)]);
    let source = source.with_delay(Duration::from_millis(50));
    let core = Arc::new(MonitorCore::with_source(source, config_with_ttl(60_000)));

    let readers: Vec<_> = (0..8)
        .map(|_| {
            let core = Arc::clone(&core);
            thread::spawn(move || core.list_processes(true).unwrap())
        })
        .collect();

    let snapshots: Vec<_> = readers.into_iter().map(|r| r.join().unwrap()).collect();

    assert_eq!(control.enumerations(), 1);
    assert!(snapshots.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[test]
fn test_invalidate_forces_next_cached_read() {
    let (source, control) = ScriptedSource::new(vec![record(1, "init", 0.1)]);
    let core = MonitorCore::with_source(source, config_with_ttl(60_000));

    let first = core.list_processes(true).unwrap();
    core.invalidate_processes();
    let second = core.list_processes(true).unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(control.enumerations(), 2);
}
