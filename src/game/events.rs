//! Simulation Events
//!
//! Events generated during a frame, consumed by audio/render collaborators
//! and by replay logging.

use serde::{Serialize, Deserialize};
use crate::core::vec2::Vec2;
use crate::game::collision::Axis;

/// Simulation event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SimEventData {
    /// Agent reflected off a world edge
    BoundaryBounce {
        agent: usize,
    },

    /// Agent was pushed out of an obstacle and the overlap is cleared
    ObstacleHit {
        agent: usize,
        row: usize,
        col: usize,
        axis: Axis,
    },

    /// Agent picked up a kill power-up
    PowerUpCollected {
        agent: usize,
        row: usize,
        col: usize,
    },

    /// Armed agent eliminated an unarmed one
    Kill {
        killer: usize,
        victim: usize,
    },

    /// Two armed agents eliminated each other
    MutualKill {
        first: usize,
        second: usize,
    },

    /// Agent moved to a teleporter exit
    Teleported {
        agent: usize,
        exit_row: usize,
        exit_col: usize,
        position: Vec2,
    },

    /// First agent reached a finish tile
    WinLatched {
        agent: usize,
        latched_at: f64,
    },

    /// Grace period after the win expired
    SessionEnded {
        winner: usize,
    },
}

/// A simulation event with its frame number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimEvent {
    /// Frame when event occurred
    pub frame: u64,

    /// Event data
    pub data: SimEventData,
}

impl SimEvent {
    /// Create a new event.
    pub fn new(frame: u64, data: SimEventData) -> Self {
        Self { frame, data }
    }

    /// True for events that should trigger the kill sound.
    pub fn is_kill(&self) -> bool {
        matches!(
            self.data,
            SimEventData::Kill { .. } | SimEventData::MutualKill { .. }
        )
    }

    /// True for cleared obstacle collisions (audio feedback trigger).
    pub fn is_obstacle_hit(&self) -> bool {
        matches!(self.data, SimEventData::ObstacleHit { .. })
    }
}

/// Per-frame boolean summary for audio collaborators.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSignals {
    /// At least one obstacle collision cleared this frame
    pub obstacle_collision: bool,
    /// At least one agent bounced off a world edge
    pub boundary_bounce: bool,
    /// At least one kill happened
    pub kill: bool,
}

impl FrameSignals {
    /// Summarise a frame's events.
    pub fn from_events(events: &[SimEvent]) -> Self {
        let mut signals = Self::default();
        for event in events {
            match event.data {
                SimEventData::ObstacleHit { .. } => signals.obstacle_collision = true,
                SimEventData::BoundaryBounce { .. } => signals.boundary_bounce = true,
                SimEventData::Kill { .. } | SimEventData::MutualKill { .. } => signals.kill = true,
                _ => {}
            }
        }
        signals
    }
}
