//! Timer engine: owns the countdown state and its interval loop

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::{sync::watch, task::JoinHandle, time::Instant};
use tracing::{debug, info};

use super::{TimerPhase, TimerSnapshot, TimerState};
use crate::tasks::{countdown_task, TickOutcome};

/// Spacing between two countdown ticks
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Direction of a manual adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    Increase,
    Decrease,
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
        })
    }
}

/// Result of [`TimerEngine::adjust_when`], carrying the snapshot taken under the lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustOutcome {
    /// The phase did not allow adjusting; nothing was touched
    Refused(TimerSnapshot),
    /// Applied, but clamping left every value as it was
    Unchanged(TimerSnapshot),
    Changed(TimerSnapshot),
}

impl AdjustOutcome {
    pub fn snapshot(&self) -> TimerSnapshot {
        match *self {
            Self::Refused(snapshot) | Self::Unchanged(snapshot) | Self::Changed(snapshot) => snapshot,
        }
    }

    pub fn changed(&self) -> bool {
        matches!(self, Self::Changed(_))
    }
}

/// Handle to the countdown engine.
///
/// Cloning yields another handle to the same timer. When the last handle is
/// dropped the running countdown loop, if any, is cancelled. Intents that can
/// start the loop must be called from within a Tokio runtime.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    inner: Arc<EngineInner>,
}

#[derive(Debug)]
pub(crate) struct EngineInner {
    core: Mutex<EngineCore>,
    /// Derived display value (remaining while counting, configured while stopped)
    display_tx: watch::Sender<u64>,
    state_tx: watch::Sender<TimerPhase>,
    snapshot_tx: watch::Sender<TimerSnapshot>,
}

#[derive(Debug)]
struct EngineCore {
    timer: TimerState,
    /// Bumped on every cancellation; ticks from an older loop are discarded
    epoch: u64,
    active_loop: Option<JoinHandle<()>>,
}

impl TimerEngine {
    /// Create a stopped engine with the given configured duration
    pub fn new(configured_seconds: u64) -> Self {
        let timer = TimerState::new(configured_seconds);
        let snapshot = timer.snapshot();
        let (display_tx, _) = watch::channel(snapshot.display_seconds);
        let (state_tx, _) = watch::channel(snapshot.state);
        let (snapshot_tx, _) = watch::channel(snapshot);

        Self {
            inner: Arc::new(EngineInner {
                core: Mutex::new(EngineCore {
                    timer,
                    epoch: 0,
                    active_loop: None,
                }),
                display_tx,
                state_tx,
                snapshot_tx,
            }),
        }
    }

    /// Raise the adjustable quantity by `step`
    pub fn increase(&self, step: u64) {
        self.adjust_when(Adjustment::Increase, step, |_| true);
    }

    /// Lower the adjustable quantity by `step`, never below one second
    pub fn decrease(&self, step: u64) {
        self.adjust_when(Adjustment::Decrease, step, |_| true);
    }

    /// Apply an adjustment only if `allowed` accepts the current phase.
    ///
    /// The phase check and the change happen under one lock, so a concurrent
    /// start or stop cannot slip in between them.
    pub fn adjust_when<F>(&self, adjustment: Adjustment, step: u64, allowed: F) -> AdjustOutcome
    where
        F: FnOnce(TimerPhase) -> bool,
    {
        let mut core = self.inner.lock();
        let before = core.timer.snapshot();
        if !allowed(before.state) {
            debug!("Refusing to {} while {}", adjustment, before.state);
            return AdjustOutcome::Refused(before);
        }

        match adjustment {
            Adjustment::Increase => core.timer.increase(step),
            Adjustment::Decrease => core.timer.decrease(step),
        }
        let after = core.timer.snapshot();
        debug!(
            "Applied {} by {} ({}): configured={}, remaining={}",
            adjustment, step, after.state, after.configured_seconds, after.remaining_seconds
        );
        self.inner.publish(&core.timer);

        if after == before {
            AdjustOutcome::Unchanged(after)
        } else {
            AdjustOutcome::Changed(after)
        }
    }

    /// Start a fresh countdown or resume a paused one.
    ///
    /// Returns once the loop is scheduled; `false` if the timer was already
    /// running or has expired.
    pub fn start(&self) -> bool {
        let mut core = self.inner.lock();
        let Some(from) = core.timer.start() else {
            debug!("Ignoring start while {}", core.timer.phase());
            return false;
        };

        core.cancel_loop();
        let epoch = core.epoch;
        let first_tick = Instant::now() + TICK_INTERVAL;
        core.active_loop = Some(tokio::spawn(countdown_task(
            Arc::downgrade(&self.inner),
            epoch,
            first_tick,
        )));

        info!("Countdown running from {} seconds", from);
        self.inner.publish(&core.timer);
        true
    }

    /// Freeze a running countdown, keeping its remaining time
    pub fn pause(&self) -> bool {
        let mut core = self.inner.lock();
        if !core.timer.pause() {
            debug!("Ignoring pause while {}", core.timer.phase());
            return false;
        }

        core.cancel_loop();
        info!(
            "Countdown paused with {} seconds left",
            core.timer.remaining_seconds()
        );
        self.inner.publish(&core.timer);
        true
    }

    /// Discard the countdown and show the configured duration again
    pub fn stop(&self) -> bool {
        let mut core = self.inner.lock();
        if !core.timer.stop() {
            debug!("Ignoring stop while already stopped");
            return false;
        }

        core.cancel_loop();
        info!("Countdown stopped");
        self.inner.publish(&core.timer);
        true
    }

    /// Cancel the interval loop without touching the timer state
    pub fn shutdown(&self) {
        let mut core = self.inner.lock();
        if core.active_loop.is_some() {
            info!("Cancelling countdown loop for shutdown");
        }
        core.cancel_loop();
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.inner.lock().timer.snapshot()
    }

    pub fn phase(&self) -> TimerPhase {
        self.inner.lock().timer.phase()
    }

    /// Seconds to show: remaining while a countdown exists, configured otherwise
    pub fn display_seconds(&self) -> u64 {
        self.inner.lock().timer.display_seconds()
    }

    /// Whether an interval loop is currently scheduled
    pub fn has_active_loop(&self) -> bool {
        self.inner.lock().active_loop.is_some()
    }

    /// Subscribe to the displayed seconds; the receiver starts with the current value
    pub fn subscribe_display(&self) -> watch::Receiver<u64> {
        self.inner.display_tx.subscribe()
    }

    /// Subscribe to lifecycle transitions
    pub fn subscribe_state(&self) -> watch::Receiver<TimerPhase> {
        self.inner.state_tx.subscribe()
    }

    /// Subscribe to full snapshots, updated on every change
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.inner.snapshot_tx.subscribe()
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TimerState::default().configured_seconds())
    }
}

impl EngineInner {
    fn lock(&self) -> MutexGuard<'_, EngineCore> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply one tick from the loop started at `epoch`
    pub(crate) fn apply_tick(&self, epoch: u64) -> TickOutcome {
        let mut core = self.lock();
        if core.epoch != epoch {
            return TickOutcome::Stale;
        }

        let outcome = match core.timer.tick() {
            Some(0) => {
                // The loop ends on its own; dropping the handle just detaches it
                core.active_loop = None;
                TickOutcome::Expired
            }
            Some(remaining) => TickOutcome::Counting(remaining),
            None => return TickOutcome::Stale,
        };

        self.publish(&core.timer);
        outcome
    }

    /// Push the current values to every stream that changed
    fn publish(&self, timer: &TimerState) {
        let snapshot = timer.snapshot();
        self.state_tx
            .send_if_modified(|state| replace_if_changed(state, snapshot.state));
        self.display_tx
            .send_if_modified(|display| replace_if_changed(display, snapshot.display_seconds));
        self.snapshot_tx
            .send_if_modified(|current| replace_if_changed(current, snapshot));
    }
}

impl Drop for EngineInner {
    fn drop(&mut self) {
        let core = self.core.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = core.active_loop.take() {
            handle.abort();
        }
    }
}

impl EngineCore {
    fn cancel_loop(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        if let Some(handle) = self.active_loop.take() {
            handle.abort();
            debug!("Cancelled countdown loop");
        }
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intents_that_do_not_start_a_loop_work_without_a_runtime() {
        let engine = TimerEngine::new(5);
        engine.increase(2);
        engine.decrease(10);
        assert!(!engine.pause());
        assert!(!engine.stop());
        engine.shutdown();
        assert_eq!(engine.display_seconds(), 1);
        assert_eq!(engine.phase(), TimerPhase::Stopped);
    }

    #[test]
    fn subscribers_receive_current_value_immediately() {
        let engine = TimerEngine::new(7);
        engine.increase(1);

        assert_eq!(*engine.subscribe_display().borrow(), 8);
        assert_eq!(*engine.subscribe_state().borrow(), TimerPhase::Stopped);
        assert_eq!(engine.subscribe().borrow().configured_seconds, 8);
    }

    #[test]
    fn unchanged_values_do_not_notify() {
        let engine = TimerEngine::new(1);
        let mut display = engine.subscribe_display();
        let mut snapshots = engine.subscribe();

        engine.decrease(5);
        assert!(!display.has_changed().unwrap());
        assert!(!snapshots.has_changed().unwrap());

        engine.increase(1);
        assert!(display.has_changed().unwrap());
        assert_eq!(*display.borrow_and_update(), 2);
    }

    #[test]
    fn adjust_gate_sees_phase_under_the_same_lock() {
        let engine = TimerEngine::new(5);
        let only_paused = |phase: TimerPhase| phase == TimerPhase::Paused;

        let outcome = engine.adjust_when(Adjustment::Increase, 3, only_paused);
        assert!(matches!(outcome, AdjustOutcome::Refused(_)));
        assert_eq!(outcome.snapshot().configured_seconds, 5);
        assert_eq!(engine.snapshot().configured_seconds, 5);

        let mut seen = None;
        let outcome = engine.adjust_when(Adjustment::Increase, 3, |phase| {
            seen = Some(phase);
            true
        });
        assert_eq!(seen, Some(TimerPhase::Stopped));
        assert!(outcome.changed());
        assert_eq!(outcome.snapshot().configured_seconds, 8);
    }

    #[test]
    fn clamped_adjustment_reports_unchanged() {
        let engine = TimerEngine::new(1);
        let outcome = engine.adjust_when(Adjustment::Decrease, 4, |_| true);
        assert_eq!(outcome, AdjustOutcome::Unchanged(engine.snapshot()));
        assert!(!outcome.changed());
    }

    #[test]
    fn replace_if_changed_reports_changes() {
        let mut value = 3;
        assert!(!replace_if_changed(&mut value, 3));
        assert!(replace_if_changed(&mut value, 4));
        assert_eq!(value, 4);
    }
}
