//! Countdown Timer - A tick-driven countdown engine with an HTTP control surface
//!
//! The engine owns a single countdown: a configured duration, the seconds
//! remaining, and a lifecycle state. While running it ticks once per second
//! and publishes every change on watch channels that a screen can follow.

pub mod config;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, TimerEngine, TimerPhase, TimerSnapshot};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
