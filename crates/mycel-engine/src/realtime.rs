//! Background driver: tick a stepper on its own thread.
//!
//! The tick thread owns the [`SimulationStepper`] exclusively. After each
//! settled tick it publishes the field as the latest snapshot and offers
//! it on a bounded channel. The shutdown flag is checked only between
//! ticks, so a tick in flight always completes.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use mycel_core::StepError;
use mycel_grid::OwnedFieldSnapshot;
use tracing::{debug, error, info};

use crate::config::{InitError, RealtimeConfig};
use crate::stepper::SimulationStepper;

/// State shared between the handle and the tick thread.
struct Shared {
    shutdown: AtomicBool,
    ticks: AtomicU64,
    latest: Mutex<Option<Arc<OwnedFieldSnapshot>>>,
}

impl Shared {
    fn publish(&self, snapshot: Arc<OwnedFieldSnapshot>) {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
        self.ticks.fetch_add(1, Ordering::Release);
    }

    fn latest(&self) -> Option<Arc<OwnedFieldSnapshot>> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// What the tick thread hands back when it exits.
type DriverExit = (SimulationStepper, Option<StepError>);

/// Outcome of [`RealtimeSim::stop`].
#[derive(Debug)]
pub struct StopReport {
    /// The stepper, ready to be stepped or reset directly. `None` only if
    /// the tick thread panicked.
    pub stepper: Option<SimulationStepper>,
    /// The fatal error that ended the run early, if any.
    pub error: Option<StepError>,
    /// Ticks completed on the background thread.
    pub ticks: u64,
}

/// A simulation ticking on a background thread.
///
/// Dropping a running `RealtimeSim` stops it and discards the stepper.
pub struct RealtimeSim {
    shared: Arc<Shared>,
    snapshots: Receiver<Arc<OwnedFieldSnapshot>>,
    tick_thread: Option<JoinHandle<DriverExit>>,
}

impl RealtimeSim {
    /// Move `stepper` onto a new tick thread and start ticking.
    pub fn start(stepper: SimulationStepper, config: RealtimeConfig) -> Result<Self, InitError> {
        config.validate()?;
        let budget = config.tick_rate_hz.map(|hz| Duration::from_secs_f64(1.0 / hz));
        let (tx, rx) = crossbeam_channel::bounded(config.snapshot_capacity.max(1));
        let shared = Arc::new(Shared {
            shutdown: AtomicBool::new(false),
            ticks: AtomicU64::new(0),
            latest: Mutex::new(None),
        });

        let thread_shared = Arc::clone(&shared);
        let tick_thread = thread::Builder::new()
            .name("mycel-tick".into())
            .spawn(move || drive(stepper, &thread_shared, &tx, budget))
            .map_err(|e| InitError::ThreadPool {
                reason: format!("tick thread: {e}"),
            })?;

        info!(tick_rate_hz = ?config.tick_rate_hz, "realtime driver started");
        Ok(Self {
            shared,
            snapshots: rx,
            tick_thread: Some(tick_thread),
        })
    }

    /// Most recently published snapshot, or `None` before the first tick.
    pub fn latest_snapshot(&self) -> Option<Arc<OwnedFieldSnapshot>> {
        self.shared.latest()
    }

    /// Channel of published snapshots. Snapshots are dropped rather than
    /// queued when the channel is full.
    pub fn snapshots(&self) -> &Receiver<Arc<OwnedFieldSnapshot>> {
        &self.snapshots
    }

    /// Ticks completed so far.
    pub fn ticks_completed(&self) -> u64 {
        self.shared.ticks.load(Ordering::Acquire)
    }

    /// Whether the tick thread is still running. It exits on its own
    /// only after a fatal step error.
    pub fn is_running(&self) -> bool {
        self.tick_thread
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stop after the current tick, join the thread, and recover the
    /// stepper.
    pub fn stop(mut self) -> StopReport {
        self.shutdown()
    }

    fn shutdown(&mut self) -> StopReport {
        self.shared.shutdown.store(true, Ordering::Release);
        let (stepper, error) = match self.tick_thread.take() {
            Some(handle) => {
                // Wake the thread if it is parked between ticks.
                handle.thread().unpark();
                match handle.join() {
                    Ok((stepper, error)) => (Some(stepper), error),
                    Err(_) => (None, None),
                }
            }
            None => (None, None),
        };
        let ticks = self.ticks_completed();
        debug!(ticks, "realtime driver stopped");
        StopReport {
            stepper,
            error,
            ticks,
        }
    }
}

impl Drop for RealtimeSim {
    fn drop(&mut self) {
        if self.tick_thread.is_some() {
            self.shutdown();
        }
    }
}

/// Tick loop. Runs until the shutdown flag is set or a step fails.
fn drive(
    mut stepper: SimulationStepper,
    shared: &Shared,
    tx: &Sender<Arc<OwnedFieldSnapshot>>,
    budget: Option<Duration>,
) -> DriverExit {
    while !shared.shutdown.load(Ordering::Acquire) {
        let start = Instant::now();
        if let Err(e) = stepper.step().map(|_| ()) {
            error!(error = %e, "realtime driver halted");
            return (stepper, Some(e));
        }

        let snapshot = Arc::new(stepper.owned_snapshot());
        shared.publish(Arc::clone(&snapshot));
        // Full or disconnected: the consumer is behind or gone.
        let _ = tx.try_send(snapshot);

        if let Some(budget) = budget {
            if let Some(remaining) = budget.checked_sub(start.elapsed()) {
                thread::park_timeout(remaining);
            }
        }
    }
    (stepper, None)
}
