//! HTTP API module
//!
//! This module contains the endpoints a screen uses to drive the timer, the
//! response structures, and the mapping from timer state to display hints.

pub mod handlers;
pub mod presentation;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/start", post(start_handler))
        .route("/pause", post(pause_handler))
        .route("/stop", post(stop_handler))
        .route("/increase", post(increase_handler))
        .route("/decrease", post(decrease_handler))
        .route("/status", get(status_handler))
        .route("/events", get(events_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
