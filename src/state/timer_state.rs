//! Timer lifecycle states and the countdown state machine

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// No countdown exists; the configured duration is shown
    #[default]
    Stopped,
    /// The countdown loop is ticking
    Running,
    /// The countdown is frozen at its remaining value
    Paused,
    /// The countdown reached zero; only stop leaves this state
    Expired,
}

impl TimerPhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Expired => "expired",
        }
    }

    /// Whether a countdown (live, paused or finished) currently exists
    pub const fn is_countdown(self) -> bool {
        !matches!(self, Self::Stopped)
    }
}

impl fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time view of the timer published to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub state: TimerPhase,
    pub configured_seconds: u64,
    pub remaining_seconds: u64,
    /// Remaining seconds while a countdown exists, configured seconds otherwise
    pub display_seconds: u64,
}

/// Countdown state machine without any scheduling attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    configured_seconds: u64,
    remaining_seconds: u64,
    phase: TimerPhase,
}

impl TimerState {
    /// Lowest value an adjustment can leave behind
    pub const MIN_SECONDS: u64 = 1;

    /// Create a stopped timer; durations below one second are raised to one
    pub fn new(configured_seconds: u64) -> Self {
        Self {
            configured_seconds: configured_seconds.max(Self::MIN_SECONDS),
            remaining_seconds: 0,
            phase: TimerPhase::Stopped,
        }
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn configured_seconds(&self) -> u64 {
        self.configured_seconds
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    /// The value a display should show for the current phase
    pub fn display_seconds(&self) -> u64 {
        if self.phase.is_countdown() {
            self.remaining_seconds
        } else {
            self.configured_seconds
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            state: self.phase,
            configured_seconds: self.configured_seconds,
            remaining_seconds: self.remaining_seconds,
            display_seconds: self.display_seconds(),
        }
    }

    /// Add `step` to the remaining time when paused, to the configured duration otherwise
    pub fn increase(&mut self, step: u64) {
        let value = self.adjustable_mut();
        *value = value.saturating_add(step);
    }

    /// Subtract `step` from the adjustable quantity, never going below one
    pub fn decrease(&mut self, step: u64) {
        let value = self.adjustable_mut();
        *value = value.saturating_sub(step).max(Self::MIN_SECONDS);
    }

    fn adjustable_mut(&mut self) -> &mut u64 {
        match self.phase {
            TimerPhase::Paused => &mut self.remaining_seconds,
            TimerPhase::Stopped | TimerPhase::Running | TimerPhase::Expired => {
                &mut self.configured_seconds
            }
        }
    }

    /// Enter `Running`, returning the value the countdown begins from.
    ///
    /// A stopped timer starts fresh from the configured duration, a paused one
    /// resumes from its remaining time. Returns `None` when already running or
    /// expired.
    pub fn start(&mut self) -> Option<u64> {
        match self.phase {
            TimerPhase::Stopped => {
                self.remaining_seconds = self.configured_seconds;
            }
            TimerPhase::Paused => {}
            TimerPhase::Running | TimerPhase::Expired => return None,
        }
        self.phase = TimerPhase::Running;
        Some(self.remaining_seconds)
    }

    /// Freeze a running countdown. Returns whether anything changed.
    pub fn pause(&mut self) -> bool {
        if self.phase != TimerPhase::Running {
            return false;
        }
        self.phase = TimerPhase::Paused;
        true
    }

    /// Discard any countdown and go back to showing the configured duration
    pub fn stop(&mut self) -> bool {
        if self.phase == TimerPhase::Stopped {
            return false;
        }
        self.phase = TimerPhase::Stopped;
        self.remaining_seconds = 0;
        true
    }

    /// Advance a running countdown by one second.
    ///
    /// Returns the new remaining value, or `None` if the timer is not running.
    /// Reaching zero moves the timer to `Expired`.
    pub fn tick(&mut self) -> Option<u64> {
        if self.phase != TimerPhase::Running {
            return None;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.phase = TimerPhase::Expired;
        }
        Some(self.remaining_seconds)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn paused_at(configured: u64, ticks: usize) -> TimerState {
        let mut timer = TimerState::new(configured);
        timer.start();
        for _ in 0..ticks {
            timer.tick();
        }
        timer.pause();
        timer
    }

    #[test]
    fn new_timer_is_stopped_and_shows_configured() {
        let timer = TimerState::new(5);
        assert_eq!(timer.phase(), TimerPhase::Stopped);
        assert_eq!(timer.remaining_seconds(), 0);
        assert_eq!(timer.display_seconds(), 5);
    }

    #[test]
    fn zero_duration_is_raised_to_minimum() {
        assert_eq!(TimerState::new(0).configured_seconds(), 1);
    }

    #[rstest]
    #[case(5, 0, 5)]
    #[case(5, 3, 2)]
    #[case(5, 4, 1)]
    #[case(5, 5, 1)]
    #[case(5, 100, 1)]
    #[case(1, 1, 1)]
    #[case(u64::MAX, u64::MAX, 1)]
    fn decrease_is_floored_at_one(#[case] start: u64, #[case] step: u64, #[case] expected: u64) {
        let mut timer = TimerState::new(start);
        timer.decrease(step);
        assert_eq!(timer.configured_seconds(), expected);

        let mut paused = paused_at(start.min(1_000), 0);
        paused.decrease(step);
        assert!(paused.remaining_seconds() >= TimerState::MIN_SECONDS);
    }

    #[rstest]
    #[case(10, 1)]
    #[case(10, 9)]
    #[case(2, 1)]
    #[case(500, 37)]
    fn increase_then_decrease_restores_value(#[case] start: u64, #[case] step: u64) {
        let mut timer = TimerState::new(start);
        timer.increase(step);
        timer.decrease(step);
        assert_eq!(timer.configured_seconds(), start);

        let mut paused = paused_at(start + 1, 1);
        assert_eq!(paused.remaining_seconds(), start);
        paused.increase(step);
        paused.decrease(step);
        assert_eq!(paused.remaining_seconds(), start);
    }

    #[test]
    fn increase_saturates() {
        let mut timer = TimerState::new(u64::MAX - 1);
        timer.increase(10);
        assert_eq!(timer.configured_seconds(), u64::MAX);
    }

    #[test]
    fn adjusting_while_paused_touches_remaining_only() {
        let mut timer = paused_at(5, 2);
        timer.increase(4);
        assert_eq!(timer.remaining_seconds(), 7);
        assert_eq!(timer.configured_seconds(), 5);
        assert_eq!(timer.display_seconds(), 7);
    }

    #[rstest]
    #[case::running(false)]
    #[case::expired(true)]
    fn adjusting_outside_pause_touches_configured(#[case] expire: bool) {
        let mut timer = TimerState::new(2);
        timer.start();
        if expire {
            timer.tick();
            timer.tick();
            assert_eq!(timer.phase(), TimerPhase::Expired);
        }
        let remaining = timer.remaining_seconds();
        timer.increase(3);
        assert_eq!(timer.configured_seconds(), 5);
        assert_eq!(timer.remaining_seconds(), remaining);
    }

    #[test]
    fn fresh_start_uses_configured_duration() {
        let mut timer = TimerState::new(5);
        assert_eq!(timer.start(), Some(5));
        assert_eq!(timer.phase(), TimerPhase::Running);
        assert_eq!(timer.display_seconds(), 5);
    }

    #[test]
    fn resume_continues_from_remaining() {
        let mut timer = paused_at(5, 2);
        assert_eq!(timer.remaining_seconds(), 3);
        assert_eq!(timer.start(), Some(3));
        assert_eq!(timer.tick(), Some(2));
    }

    #[test]
    fn start_is_ignored_while_running() {
        let mut timer = TimerState::new(5);
        timer.start();
        timer.tick();
        assert_eq!(timer.start(), None);
        assert_eq!(timer.remaining_seconds(), 4);
    }

    #[test]
    fn ticks_count_down_to_expired() {
        let mut timer = TimerState::new(3);
        timer.start();
        let ticks: Vec<_> = std::iter::from_fn(|| timer.tick()).collect();
        assert_eq!(ticks, vec![2, 1, 0]);
        assert_eq!(timer.phase(), TimerPhase::Expired);
        assert_eq!(timer.display_seconds(), 0);
    }

    #[test]
    fn expired_ignores_start_and_pause() {
        let mut timer = TimerState::new(1);
        timer.start();
        timer.tick();
        let before = timer.clone();

        assert_eq!(timer.start(), None);
        assert!(!timer.pause());
        assert_eq!(timer.tick(), None);
        assert_eq!(timer, before);

        assert!(timer.stop());
        assert_eq!(timer.phase(), TimerPhase::Stopped);
        assert_eq!(timer.display_seconds(), 1);
    }

    #[test]
    fn pause_and_stop_are_idempotent() {
        let mut timer = TimerState::new(5);
        timer.start();
        timer.tick();

        assert!(timer.pause());
        let once = timer.clone();
        assert!(!timer.pause());
        assert_eq!(timer, once);

        assert!(timer.stop());
        let once = timer.clone();
        assert!(!timer.stop());
        assert_eq!(timer, once);
    }

    #[rstest]
    #[case::stopped(TimerState::new(5))]
    #[case::paused(paused_at(5, 1))]
    fn tick_outside_running_is_ignored(#[case] before: TimerState) {
        let mut timer = before.clone();
        assert_eq!(timer.tick(), None);
        assert_eq!(timer, before);
    }

    #[test]
    fn stop_resets_remaining_and_shows_configured() {
        let mut timer = TimerState::new(5);
        timer.start();
        timer.tick();
        timer.stop();
        assert_eq!(timer.remaining_seconds(), 0);
        assert_eq!(timer.display_seconds(), 5);
        assert_eq!(timer.snapshot().state, TimerPhase::Stopped);
    }

    #[test]
    fn pause_while_stopped_is_a_no_op() {
        let mut timer = TimerState::new(5);
        assert!(!timer.pause());
        assert_eq!(timer.phase(), TimerPhase::Stopped);
    }
}
