//! Main application state management

use std::{
    sync::{Mutex, PoisonError},
    time::Instant,
};
use chrono::{DateTime, Utc};

use super::TimerEngine;

/// Application state shared by the HTTP handlers
#[derive(Debug)]
pub struct AppState {
    /// The single countdown timer
    pub engine: TimerEngine,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<(String, DateTime<Utc>)>>,
}

impl AppState {
    /// Create a new AppState around a stopped timer
    pub fn new(port: u16, host: String, configured_seconds: u64) -> Self {
        Self {
            engine: TimerEngine::new(configured_seconds),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
        }
    }

    /// Remember the most recent intent received from a client
    pub fn record_action(&self, action: &str) {
        let mut last_action = self.last_action.lock().unwrap_or_else(PoisonError::into_inner);
        *last_action = Some((action.to_string(), Utc::now()));
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().unwrap_or_else(PoisonError::into_inner);
        match last_action.as_ref() {
            Some((action, time)) => (Some(action.clone()), Some(*time)),
            None => (None, None),
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed().as_secs())
    }
}

fn format_uptime(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
