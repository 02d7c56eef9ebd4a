//! Frame Snapshot
//!
//! Read-only view handed to render and audio collaborators after a frame
//! completes. JSON for tooling, bincode for compact recording.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::agent::{AgentState, DeadMarker, SquareColor};
use crate::game::events::FrameSignals;
use crate::game::state::SimulationState;
use crate::game::tick::FrameResult;
use crate::game::win::WinLatch;

/// Drawable state of one agent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentView {
    /// Spawn-order index
    pub index: usize,
    /// Top-left corner
    pub position: Vec2,
    /// Edge length
    pub size: f32,
    /// Palette colour
    pub color: SquareColor,
    /// False once killed
    pub alive: bool,
    /// Draw the armed overlay
    pub armed: bool,
    /// Oldest first
    pub trail: Vec<Vec2>,
}

impl From<&AgentState> for AgentView {
    fn from(agent: &AgentState) -> Self {
        Self {
            index: agent.index,
            position: agent.position,
            size: agent.size,
            color: agent.color,
            alive: agent.alive,
            armed: agent.overlay.is_some(),
            trail: agent.trail.points().copied().collect(),
        }
    }
}

/// Everything a collaborator may read for one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Frame number
    pub frame: u64,
    /// Tile codes, row-major
    pub tiles: Vec<Vec<i32>>,
    /// Tile edge length
    pub tile_size: f32,
    /// Agents in spawn order
    pub agents: Vec<AgentView>,
    /// Dead agents in order of death
    pub dead: Vec<DeadMarker>,
    /// Winner record, once latched
    pub win: Option<WinLatch>,
    /// End-of-round text once a winner is latched
    pub announcement: Option<String>,
    /// This frame's collision and kill signals
    pub signals: FrameSignals,
}

impl FrameSnapshot {
    /// Capture the state after `result`'s frame.
    pub fn capture(state: &SimulationState, result: &FrameResult) -> Self {
        Self {
            frame: state.frame,
            tiles: state.grid.to_codes(),
            tile_size: state.grid.tile_size(),
            agents: state.agents.iter().map(AgentView::from).collect(),
            dead: state.dead.clone(),
            win: state.win,
            announcement: state.win.map(|latch| latch.announcement()),
            signals: result.signals,
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Serialize to binary.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize from binary.
    pub fn from_bytes(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }
}
