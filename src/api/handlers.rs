//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Query, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use serde::Deserialize;
use tracing::{debug, info};

use crate::state::{AdjustOutcome, Adjustment, AppState, TimerEngine};
use super::{
    presentation::{ColorCue, Controls},
    responses::{ApiResponse, HealthResponse, StatusResponse},
};

/// Query parameters for the adjustment endpoints
#[derive(Debug, Deserialize)]
pub struct StepParams {
    #[serde(default = "default_step")]
    pub step: u64,
}

fn default_step() -> u64 {
    1
}

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let changed = apply_intent(&state, "start", TimerEngine::start);
    let snapshot = state.engine.snapshot();
    Json(if changed {
        ApiResponse::applied(
            format!("Countdown running from {} seconds", snapshot.remaining_seconds),
            snapshot,
        )
    } else {
        ApiResponse::ignored(format!("Cannot start while {}", snapshot.state), snapshot)
    })
}

/// Handle POST /pause - Pause the running countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let changed = apply_intent(&state, "pause", TimerEngine::pause);
    let snapshot = state.engine.snapshot();
    Json(if changed {
        ApiResponse::applied(
            format!("Countdown paused at {} seconds", snapshot.remaining_seconds),
            snapshot,
        )
    } else {
        ApiResponse::ignored(format!("Cannot pause while {}", snapshot.state), snapshot)
    })
}

/// Handle POST /stop - Discard the countdown
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let changed = apply_intent(&state, "stop", TimerEngine::stop);
    let snapshot = state.engine.snapshot();
    Json(if changed {
        ApiResponse::applied("Countdown stopped".to_string(), snapshot)
    } else {
        ApiResponse::ignored("Timer is already stopped".to_string(), snapshot)
    })
}

/// Handle POST /increase?step=N - Raise the configured or paused value
pub async fn increase_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StepParams>,
) -> Json<ApiResponse> {
    Json(adjust(&state, "increase", Adjustment::Increase, params.step))
}

/// Handle POST /decrease?step=N - Lower the configured or paused value
pub async fn decrease_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StepParams>,
) -> Json<ApiResponse> {
    Json(adjust(&state, "decrease", Adjustment::Decrease, params.step))
}

/// Handle GET /status - Return the timer with presentation hints
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let timer = state.engine.snapshot();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer,
        color: ColorCue::for_seconds(timer.display_seconds),
        controls: Controls::for_phase(timer.state),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /events - Stream snapshots as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    debug!("Client subscribed to timer events");
    let rx = state.engine.subscribe();

    // First event is the current snapshot, then one per change
    let events = stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first && rx.changed().await.is_err() {
            return None;
        }
        let snapshot = *rx.borrow_and_update();
        Some((Event::default().event("timer").json_data(snapshot), (rx, false)))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

fn apply_intent(state: &AppState, action: &str, intent: fn(&TimerEngine) -> bool) -> bool {
    state.record_action(action);
    let changed = intent(&state.engine);
    info!("{} endpoint called (changed={})", action, changed);
    changed
}

fn adjust(state: &AppState, action: &str, adjustment: Adjustment, step: u64) -> ApiResponse {
    state.record_action(action);

    let outcome = state.engine.adjust_when(adjustment, step, |phase| {
        Controls::for_phase(phase).adjust_enabled
    });
    let snapshot = outcome.snapshot();

    match outcome {
        AdjustOutcome::Refused(_) => {
            debug!("Ignoring {} while {}", action, snapshot.state);
            ApiResponse::ignored(
                format!("Adjustment is disabled while {}", snapshot.state),
                snapshot,
            )
        }
        AdjustOutcome::Unchanged(_) => ApiResponse::ignored(
            format!("Timer stays at {} seconds", snapshot.display_seconds),
            snapshot,
        ),
        AdjustOutcome::Changed(_) => {
            info!(
                "{} endpoint called: timer now shows {} seconds",
                action, snapshot.display_seconds
            );
            ApiResponse::applied(
                format!("Timer set to {} seconds", snapshot.display_seconds),
                snapshot,
            )
        }
    }
}
