//! Bounded, timer-driven publish loop.
//!
//! A `PublishLoop` asks its [`BatchSource`] for a batch on every tick, encodes
//! the batch as a JSON array and hands the bytes to a [`Sink`]. It keeps the
//! running totals of one session and stops after a fixed duration.
//!
//! Concurrency and shutdown:
//! - The loop runs on the calling thread and ticks never overlap. Tick `k`
//!   is due at `started + k * interval`, so time spent publishing does not
//!   push later ticks back; a late tick fires as soon as the previous one is done.
//! - `select!` multiplexes the next tick, a wall-clock deadline and the stop
//!   channel fed by [`Stopper`].
//! - The run ends after `duration / interval` ticks, when a stop signal
//!   arrives, or at the `duration + interval` deadline if ticks fall behind,
//!   whichever comes first.
//! - A tick that fails to encode or publish is logged and dropped; the loop
//!   keeps going. Nothing is retried.
//! - The sink is closed exactly once, after the last tick.

use crossbeam_channel::{Receiver, Sender, at, bounded, never, select};
use feed_common::FeedError;
use feed_common::Result;
use log::{debug, error, info, warn};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::sink::Sink;

/// Default interval between ticks.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(250);
/// Default overall run time.
pub const DEFAULT_DURATION: Duration = Duration::from_secs(30 * 60);

/// Produces the rows published on each tick.
pub trait BatchSource {
    /// Row type of a batch.
    type Row: Serialize;

    /// Return the rows for the next tick. An empty batch skips publishing.
    fn next_batch(&mut self) -> Vec<Self::Row>;
}

impl<F, R> BatchSource for F
where
    F: FnMut() -> Vec<R>,
    R: Serialize,
{
    type Row = R;

    fn next_batch(&mut self) -> Vec<R> {
        self()
    }
}

/// Runtime settings of a publish loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    /// Subject every batch is published on.
    pub subject: String,
    /// Time between ticks.
    pub interval: Duration,
    /// Overall run time.
    pub duration: Duration,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            subject: "feed".to_string(),
            interval: DEFAULT_INTERVAL,
            duration: DEFAULT_DURATION,
        }
    }
}

impl PublishConfig {
    /// Reject settings the loop cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.subject.trim().is_empty() {
            return Err(FeedError::InvalidConfig("subject must not be empty".to_string()));
        }
        if self.interval.is_zero() {
            return Err(FeedError::InvalidConfig("interval must be positive".to_string()));
        }
        if self.duration.is_zero() {
            return Err(FeedError::InvalidConfig("duration must be positive".to_string()));
        }
        Ok(())
    }

    /// Number of ticks that fit into the run time; always at least one.
    pub fn tick_budget(&self) -> u64 {
        let ticks = self.duration.as_nanos() / self.interval.as_nanos().max(1);
        u64::try_from(ticks).unwrap_or(u64::MAX).max(1)
    }
}

/// Lifecycle of a publish loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Created, not started yet.
    Idle,
    /// Ticks are being published.
    Running,
    /// Finished; terminal.
    Stopped,
}

/// Outcome of one publishing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PublishReport {
    /// Ticks attempted.
    pub ticks: u64,
    /// Ticks whose batch could not be encoded or published.
    pub failed_ticks: u64,
    /// Rows accepted by the sink.
    pub total_published: u64,
    /// Wall-clock time spent running.
    pub elapsed: Duration,
}

/// Cloneable handle that asks a running loop to stop.
///
/// Only the first call to [`Stopper::stop`] sends a signal; later calls are no-ops.
#[derive(Debug, Clone)]
pub struct Stopper {
    tx: Sender<()>,
    stopped: Arc<AtomicBool>,
}

impl Stopper {
    /// Request the loop to stop after the tick in flight, if any.
    pub fn stop(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        // The loop may already be gone; nothing left to stop then.
        let _ = self.tx.try_send(());
    }

    /// Whether a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Offset of tick `n` from the start of the run.
fn tick_offset(interval: Duration, n: u64) -> Duration {
    interval.saturating_mul(u32::try_from(n).unwrap_or(u32::MAX))
}

/// Channel firing once at `started + offset`; never fires if that instant is unrepresentable.
fn timer_after(started: Instant, offset: Duration) -> Receiver<Instant> {
    match started.checked_add(offset) {
        Some(when) => at(when),
        None => never(),
    }
}

/// Periodically publishes batches from a source to a sink.
pub struct PublishLoop<B, S> {
    source: B,
    sink: S,
    config: PublishConfig,
    state: LoopState,
    report: PublishReport,
    stop_tx: Sender<()>,
    stop_rx: Receiver<()>,
    stopped: Arc<AtomicBool>,
}

impl<B: BatchSource, S: Sink> PublishLoop<B, S> {
    /// Create an idle loop.
    pub fn new(config: PublishConfig, source: B, sink: S) -> Self {
        let (stop_tx, stop_rx) = bounded(1);
        Self {
            source,
            sink,
            config,
            state: LoopState::Idle,
            report: PublishReport::default(),
            stop_tx,
            stop_rx,
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle for stopping the loop from another thread or a signal handler.
    pub fn stopper(&self) -> Stopper {
        Stopper {
            tx: self.stop_tx.clone(),
            stopped: Arc::clone(&self.stopped),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Totals of the current or last session.
    pub fn report(&self) -> PublishReport {
        self.report
    }

    /// Run until the duration elapses or a stop is requested, then close the sink.
    ///
    /// Fails without publishing anything when the configuration is invalid or
    /// the loop has already run.
    pub fn run(&mut self) -> Result<PublishReport> {
        match self.state {
            LoopState::Idle => {}
            LoopState::Running | LoopState::Stopped => return Err(FeedError::LoopStopped),
        }
        self.config.validate()?;

        let interval = self.config.interval;
        let budget = self.config.tick_budget();
        let started = Instant::now();
        let stop_rx = self.stop_rx.clone();
        let deadline = timer_after(started, self.config.duration.saturating_add(interval));

        self.state = LoopState::Running;
        info!(
            "Publishing to \"{}\" every {:?} for {:?} ({} ticks)",
            self.config.subject, interval, self.config.duration, budget
        );

        loop {
            if self.stopped.load(Ordering::SeqCst) {
                info!("Stop requested. Stopping the publisher...");
                break;
            }
            let next_tick = timer_after(started, tick_offset(interval, self.report.ticks + 1));
            select! {
                recv(stop_rx) -> _ => {
                    info!("Stop requested. Stopping the publisher...");
                    break;
                },
                recv(deadline) -> _ => {
                    info!("Run duration reached. Stopping the publisher...");
                    break;
                },
                recv(next_tick) -> _ => {
                    self.run_tick();
                    if self.report.ticks >= budget {
                        info!("Run duration reached. Stopping the publisher...");
                        break;
                    }
                },
            }
        }

        self.report.elapsed = started.elapsed();
        self.shutdown();
        Ok(self.report)
    }

    fn run_tick(&mut self) {
        self.report.ticks += 1;
        match self.publish_batch() {
            Ok(0) => debug!("Tick {}: no rows to publish", self.report.ticks),
            Ok(rows) => {
                self.report.total_published += rows as u64;
                info!(
                    "Published to subject: \"{}\", rows: {}, total published: {}",
                    self.config.subject, rows, self.report.total_published
                );
            }
            Err(e) => {
                self.report.failed_ticks += 1;
                error!("Error publishing batch on tick {}: {}", self.report.ticks, e);
            }
        }
    }

    fn publish_batch(&mut self) -> Result<usize> {
        let batch = self.source.next_batch();
        if batch.is_empty() {
            return Ok(0);
        }
        let payload = serde_json::to_vec(&batch)?;
        self.sink.publish(&self.config.subject, &payload)?;

        if self.report.total_published == 0 {
            if let Ok(sample) = serde_json::to_string_pretty(&batch[0]) {
                debug!("Sample record: {}", sample);
            }
        }
        Ok(batch.len())
    }

    fn shutdown(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        self.state = LoopState::Stopped;
        if let Err(e) = self.sink.close() {
            warn!("Failed to close sink: {}", e);
        }
        info!(
            "Publisher stopped after {} ticks ({} failed), total rows published: {}",
            self.report.ticks, self.report.failed_ticks, self.report.total_published
        );
    }
}
