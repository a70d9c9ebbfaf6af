//! Background sampling loop.
//!
//! The sampler drives its own small Tokio runtime from a dedicated thread, so
//! the consumer does not need a runtime and may stop it from inside one. Each
//! tick collects a [`SampleBundle`] on the blocking pool under a timeout and
//! pushes it to a drop-oldest [`HandoffQueue`]. Tick failures are counted and
//! logged, never propagated.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{broadcast, watch};

use super::cache::SampleCache;
use super::handoff::{HandoffQueue, DEFAULT_QUEUE_CAPACITY};
use super::metrics::SampleBundle;
use crate::error::{BytedogError, Result};

pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_TICK_TIMEOUT: Duration = Duration::from_secs(5);

const MIN_SAMPLE_INTERVAL: Duration = Duration::from_millis(10);
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct SamplerConfig {
    pub interval: Duration,
    pub queue_capacity: usize,
    /// Upper bound on one tick's OS work
    pub tick_timeout: Duration,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_SAMPLE_INTERVAL,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            tick_timeout: DEFAULT_TICK_TIMEOUT,
        }
    }
}

#[derive(Debug, Default)]
struct TickCounters {
    completed: AtomicU64,
    published: AtomicU64,
    failed: AtomicU64,
}

/// Point-in-time view of the sampler's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SamplerStats {
    /// Ticks that finished, with or without a bundle
    pub ticks: u64,
    pub published: u64,
    pub failed: u64,
    /// Bundles evicted unread from the handoff queue
    pub dropped: u64,
}

/// Owner of a running sampler.
///
/// Dropping the handle and [`SamplerHandle::shutdown`] both stop the loop and
/// join the sampler thread. The join waits for a tick already in progress, so
/// it is bounded by the tick timeout plus the runtime's shutdown grace.
pub struct SamplerHandle {
    queue: Arc<HandoffQueue<SampleBundle>>,
    interval_tx: watch::Sender<Duration>,
    shutdown_tx: broadcast::Sender<()>,
    counters: Arc<TickCounters>,
    thread: Option<JoinHandle<()>>,
}

/// Spawn the sampling loop against `cache`
pub fn start_sampler(cache: Arc<SampleCache>, config: SamplerConfig) -> Result<SamplerHandle> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .max_blocking_threads(2)
        .enable_time()
        .thread_name("bytedog-sampler-worker")
        .build()?;

    let queue = Arc::new(HandoffQueue::new(config.queue_capacity));
    let counters = Arc::new(TickCounters::default());
    let (interval_tx, interval_rx) = watch::channel(clamp_interval(config.interval));
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);

    let sampling = sampling_loop(
        cache,
        Arc::clone(&queue),
        Arc::clone(&counters),
        interval_rx,
        shutdown_rx,
        config.tick_timeout,
    );
    let thread = std::thread::Builder::new()
        .name("bytedog-sampler".to_string())
        .spawn(move || {
            runtime.block_on(sampling);
            // Leaves a stuck blocking call behind instead of waiting on it.
            runtime.shutdown_timeout(SHUTDOWN_GRACE);
        })?;

    log::info!(
        "Sampler started (interval {:?}, queue capacity {})",
        config.interval,
        queue.capacity()
    );

    Ok(SamplerHandle {
        queue,
        interval_tx,
        shutdown_tx,
        counters,
        thread: Some(thread),
    })
}

impl SamplerHandle {
    /// Oldest unread bundle, without waiting
    pub fn poll_bundle(&self) -> Option<SampleBundle> {
        self.queue.try_pop()
    }

    /// All unread bundles, oldest first
    pub fn drain(&self) -> Vec<SampleBundle> {
        self.queue.drain()
    }

    /// Shared handle to the queue for a consumer on another thread
    pub fn queue(&self) -> Arc<HandoffQueue<SampleBundle>> {
        Arc::clone(&self.queue)
    }

    /// Change the cadence; applies from the next sleep on
    pub fn set_interval(&self, interval: Duration) {
        let interval = clamp_interval(interval);
        self.interval_tx.send_replace(interval);
        log::info!("Sampler interval set to {:?}", interval);
    }

    pub fn interval(&self) -> Duration {
        *self.interval_tx.borrow()
    }

    pub fn stats(&self) -> SamplerStats {
        SamplerStats {
            ticks: self.counters.completed.load(Ordering::Relaxed),
            published: self.counters.published.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
            dropped: self.queue.dropped(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.thread
            .as_ref()
            .is_some_and(|thread| !thread.is_finished())
    }

    /// Stop the loop and wait for it to exit
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };

        let _ = self.shutdown_tx.send(());
        if thread.join().is_err() {
            log::warn!("Sampler thread panicked");
        }

        log::info!("Sampler stopped");
    }
}

impl Drop for SamplerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn clamp_interval(interval: Duration) -> Duration {
    interval.max(MIN_SAMPLE_INTERVAL)
}

async fn sampling_loop(
    cache: Arc<SampleCache>,
    queue: Arc<HandoffQueue<SampleBundle>>,
    counters: Arc<TickCounters>,
    interval_rx: watch::Receiver<Duration>,
    mut shutdown: broadcast::Receiver<()>,
    tick_timeout: Duration,
) {
    let in_flight = Arc::new(AtomicBool::new(false));
    let mut tick: u64 = 0;

    loop {
        tick += 1;

        match run_tick(&cache, &in_flight, tick, tick_timeout).await {
            Ok(bundle) => {
                counters.published.fetch_add(1, Ordering::Relaxed);
                if queue.push(bundle).is_some() {
                    log::debug!("{}", BytedogError::QueueSaturated(queue.dropped()));
                }
            }
            Err(e) => {
                counters.failed.fetch_add(1, Ordering::Relaxed);
                log::log!(failure_level(&e), "Sampler tick {} failed: {}", tick, e);
            }
        }
        counters.completed.fetch_add(1, Ordering::Relaxed);

        let interval = *interval_rx.borrow();
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = shutdown.recv() => {
                break;
            }
        }
    }
}

/// Expected hiccups stay at debug; anything else is worth a warning
fn failure_level(error: &BytedogError) -> log::Level {
    if error.is_transient() {
        log::Level::Debug
    } else {
        log::Level::Warn
    }
}

async fn run_tick(
    cache: &Arc<SampleCache>,
    in_flight: &Arc<AtomicBool>,
    tick: u64,
    tick_timeout: Duration,
) -> Result<SampleBundle> {
    // A timed-out tick keeps running on the blocking pool; skip until it ends.
    if in_flight.swap(true, Ordering::AcqRel) {
        return Err(BytedogError::transient("previous tick still collecting"));
    }

    let cache = Arc::clone(cache);
    let guard = InFlightGuard(Arc::clone(in_flight));
    let work = tokio::task::spawn_blocking(move || {
        let _guard = guard;
        cache.sample_bundle(tick)
    });

    match tokio::time::timeout(tick_timeout, work).await {
        Ok(Ok(Ok(bundle))) => Ok(bundle),
        Ok(Ok(Err(e))) => Err(e),
        Ok(Err(e)) => Err(BytedogError::transient(format!("sampling task failed: {}", e))),
        Err(_) => Err(BytedogError::transient(format!(
            "tick exceeded {:?}",
            tick_timeout
        ))),
    }
}

struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
