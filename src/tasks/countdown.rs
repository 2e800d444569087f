//! Countdown interval loop

use std::sync::Weak;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::state::engine::{EngineInner, TICK_INTERVAL};

/// Result of applying a single tick to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still counting, with this many seconds left
    Counting(u64),
    /// Reached zero; the loop ends
    Expired,
    /// The loop was cancelled after this tick was scheduled
    Stale,
}

/// Background task that decrements the engine once per tick until expiry.
///
/// Holds only a weak reference so a dropped engine ends the loop.
pub(crate) async fn countdown_task(engine: Weak<EngineInner>, epoch: u64, first_tick: Instant) {
    let mut interval = interval_at(first_tick, TICK_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let Some(inner) = engine.upgrade() else {
            debug!("Timer engine dropped, ending countdown loop");
            break;
        };

        match inner.apply_tick(epoch) {
            TickOutcome::Counting(remaining) => {
                debug!("Countdown tick: {} seconds left", remaining);
            }
            TickOutcome::Expired => {
                info!("Countdown expired");
                break;
            }
            TickOutcome::Stale => {
                debug!("Countdown loop {} was cancelled, exiting", epoch);
                break;
            }
        }
    }
}
