//! Background tasks module
//!
//! This module contains the background tasks driven by the timer engine.

pub mod countdown;

// Re-export main items
pub use countdown::TickOutcome;
pub(crate) use countdown::countdown_task;
