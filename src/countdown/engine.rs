//! Countdown engine.
//!
//! Runs a fixed-interval callback on a background tokio task until it is
//! stopped. An engine owns at most one tick source at a time; starting a new
//! one stops the previous one first.
//!
//! ```text
//! start(on_tick) ──► tokio::spawn ──► interval ─┬─► on_tick() ─► Continue
//!        │                                      └─► on_tick() ─► Break ─► exit
//!        └─► TickHandle ── stop() ──► CancellationToken::cancel() ─► exit
//! ```

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Notify;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Interval between ticks.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

// ============================================================================
// TickHandle
// ============================================================================

/// Stop capability for one tick source.
///
/// Cloning the handle does not create a new tick source; all clones stop the
/// same one.
#[derive(Debug, Clone)]
pub struct TickHandle {
    id: u64,
    token: CancellationToken,
    exited: Arc<Exited>,
}

#[derive(Debug, Default)]
struct Exited {
    flag: std::sync::atomic::AtomicBool,
    notify: Notify,
}

impl TickHandle {
    fn new(id: u64) -> Self {
        Self {
            id,
            token: CancellationToken::new(),
            exited: Arc::new(Exited::default()),
        }
    }

    /// Identifier assigned by the engine, unique per engine.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Requests the tick source to stop.
    ///
    /// Idempotent. An invocation already in flight may still complete.
    pub fn stop(&self) {
        if !self.token.is_cancelled() {
            debug!(tick_source = self.id, "Stopping tick source");
            self.token.cancel();
        }
    }

    /// Returns true once a stop was requested or the callback broke out.
    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Waits until the background task has exited.
    pub async fn stopped(&self) {
        loop {
            let notified = self.exited.notify.notified();
            if self.exited.flag.load(Ordering::SeqCst) {
                return;
            }
            notified.await;
        }
    }

    fn mark_exited(&self) {
        self.exited.flag.store(true, Ordering::SeqCst);
        self.exited.notify.notify_waiters();
    }
}

// ============================================================================
// CountdownEngine
// ============================================================================

/// Owns the single active tick source.
#[derive(Debug)]
pub struct CountdownEngine {
    period: Duration,
    active: Mutex<Option<TickHandle>>,
    next_id: AtomicU64,
}

impl Default for CountdownEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CountdownEngine {
    /// Creates an engine ticking once per second.
    pub fn new() -> Self {
        Self::with_period(DEFAULT_TICK_PERIOD)
    }

    /// Creates an engine with a custom tick period.
    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            active: Mutex::new(None),
            next_id: AtomicU64::new(1),
        }
    }

    /// Returns the tick period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Starts a tick source firing `on_tick` once per period.
    ///
    /// The first invocation happens one full period after this call. The
    /// callback runs on a spawned tokio task and invocations never overlap.
    /// Returning `ControlFlow::Break(())` stops the tick source.
    ///
    /// Any tick source previously started by this engine is stopped first.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn start<F>(&self, mut on_tick: F) -> TickHandle
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let handle = TickHandle::new(self.next_id.fetch_add(1, Ordering::Relaxed));

        {
            let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(previous) = active.replace(handle.clone()) {
                previous.stop();
            }
        }

        let period = self.period;
        let first_tick = Instant::now() + period;
        let task_handle = handle.clone();
        tokio::spawn(async move {
            let token = task_handle.token.clone();
            let mut ticker = interval_at(first_tick, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        // A stop may land between the wakeup and this point.
                        if token.is_cancelled() {
                            break;
                        }
                        trace!(tick_source = task_handle.id, "Tick");
                        if on_tick().is_break() {
                            token.cancel();
                            break;
                        }
                    }
                }
            }

            debug!(tick_source = task_handle.id, "Tick source exited");
            task_handle.mark_exited();
        });

        debug!(
            tick_source = handle.id,
            period_ms = period.as_millis() as u64,
            "Tick source started"
        );
        handle
    }

    /// Stops the active tick source, if any. Idempotent.
    pub fn stop(&self) {
        let active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = active.as_ref() {
            handle.stop();
        }
    }

    /// Returns true if a tick source is running.
    pub fn is_active(&self) -> bool {
        let active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        active.as_ref().is_some_and(|handle| !handle.is_stopped())
    }
}

// ============================================================================
// Tests
// ============================================================================
