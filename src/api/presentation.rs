//! Mapping from timer outputs to what a screen shows

use serde::{Deserialize, Serialize};

use crate::state::TimerPhase;

/// Colour used to draw the displayed seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorCue {
    Green,
    Yellow,
    Red,
    Neutral,
}

impl ColorCue {
    /// Cue for the last seconds of a countdown
    pub fn for_seconds(seconds: u64) -> Self {
        match seconds {
            2 => Self::Green,
            1 => Self::Yellow,
            0 => Self::Red,
            _ => Self::Neutral,
        }
    }
}

/// Intent bound to the primary button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryAction {
    Start,
    Pause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Play,
    Pause,
}

/// Which controls are available in a given state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    /// `None` hides the primary button
    pub primary: Option<PrimaryAction>,
    pub primary_icon: Icon,
    pub stop_visible: bool,
    pub adjust_enabled: bool,
}

impl Controls {
    pub fn for_phase(phase: TimerPhase) -> Self {
        let primary = match phase {
            TimerPhase::Stopped | TimerPhase::Paused => Some(PrimaryAction::Start),
            TimerPhase::Running => Some(PrimaryAction::Pause),
            TimerPhase::Expired => None,
        };
        let primary_icon = match phase {
            TimerPhase::Stopped | TimerPhase::Paused => Icon::Play,
            TimerPhase::Running | TimerPhase::Expired => Icon::Pause,
        };

        Self {
            primary,
            primary_icon,
            stop_visible: phase.is_countdown(),
            adjust_enabled: matches!(phase, TimerPhase::Stopped | TimerPhase::Paused),
        }
    }
}
