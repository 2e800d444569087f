//! State management module
//!
//! This module contains the countdown state machine, the engine that drives
//! it, and the application state shared with the HTTP handlers.

pub mod app_state;
pub mod engine;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use engine::{AdjustOutcome, Adjustment, TimerEngine};
pub use timer_state::{TimerPhase, TimerSnapshot, TimerState};
