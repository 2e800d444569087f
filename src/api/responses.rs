//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::presentation::{ColorCue, Controls};
use crate::state::TimerSnapshot;

/// API response structure for intent endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Lifecycle state after the intent
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Whether the intent had any effect
    pub changed: bool,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(message: String, changed: bool, timer: TimerSnapshot) -> Self {
        Self {
            status: timer.state.to_string(),
            message,
            timestamp: Utc::now(),
            changed,
            timer,
        }
    }

    /// Response for an intent that did something
    pub fn applied(message: String, timer: TimerSnapshot) -> Self {
        Self::new(message, true, timer)
    }

    /// Response for an intent that was meaningless in the current state
    pub fn ignored(message: String, timer: TimerSnapshot) -> Self {
        Self::new(message, false, timer)
    }
}

/// Status response with presentation hints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub color: ColorCue,
    pub controls: Controls,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
