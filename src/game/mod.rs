//! Simulation Module
//!
//! All per-frame simulation code. Deterministic for a given level, seed
//! and sequence of timestamps.
//!
//! ## Module Structure
//!
//! - `grid`: Tile codes and the tile grid
//! - `agent`: Square state, colours, trails
//! - `state`: The session aggregate
//! - `collision`: Edge reflection and obstacle resolution
//! - `powerup`: Kill power-up pickup and eliminations
//! - `teleport`: Entry-to-exit relocation
//! - `win`: Win latch and grace period
//! - `feedback`: Collision audio cue debounce
//! - `events`: Simulation events for collaborators and replay
//! - `snapshot`: Read-only frame view
//! - `tick`: The frame pipeline

pub mod grid;
pub mod agent;
pub mod state;
pub mod collision;
pub mod powerup;
pub mod teleport;
pub mod win;
pub mod feedback;
pub mod events;
pub mod snapshot;
pub mod tick;

// Re-export key types
pub use grid::{Tile, TileGrid, GridError};
pub use agent::{AgentState, DeadMarker, SquareColor, OverlayTag, Trail};
pub use state::SimulationState;
pub use win::WinLatch;
pub use feedback::{CollisionFeedback, FeedbackCue, FeedbackTiming};
pub use events::{SimEvent, SimEventData, FrameSignals};
pub use snapshot::{FrameSnapshot, AgentView};
pub use tick::{step, run_session, FrameResult, SimConfig, SimError};
