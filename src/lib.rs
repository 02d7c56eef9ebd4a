//! # Bounce Arena
//!
//! Frame-stepped simulation of bouncing squares on a tile grid.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       BOUNCE ARENA                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Primitives                                │
//! │  ├── vec2.rs     - 2D vector (add, scale, rotate, clamp)     │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  ├── hash.rs     - State hashing for replay checks           │
//! │  └── clock.rs    - Frame and wall clocks                     │
//! │                                                              │
//! │  game/           - Simulation                                │
//! │  ├── grid.rs     - Tile codes and grid                       │
//! │  ├── agent.rs    - Squares, colours, trails                  │
//! │  ├── state.rs    - Session aggregate                         │
//! │  ├── collision.rs- Edge reflection, obstacle push-out        │
//! │  ├── powerup.rs  - Kill power-ups and eliminations           │
//! │  ├── teleport.rs - Entry/exit routing                        │
//! │  ├── win.rs      - Win latch and grace period                │
//! │  ├── feedback.rs - Collision audio cues                      │
//! │  ├── snapshot.rs - Read-only frame view                      │
//! │  └── tick.rs     - Frame pipeline                            │
//! │                                                              │
//! │  level.rs        - CSV level loading                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! Velocity jitter is the only randomness and comes from a seeded
//! Xorshift128+ owned by the state. Time enters only through the
//! timestamp passed to [`game::step`]. Replaying a level with the same
//! seed on a [`core::FrameClock`] reproduces the same state hash.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod level;

// Re-export commonly used types
pub use core::vec2::Vec2;
pub use core::rng::DeterministicRng;
pub use game::grid::{Tile, TileGrid};
pub use game::state::SimulationState;
pub use game::tick::{step, SimConfig, SimError};
pub use level::{load_level, parse_level, LevelError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default simulation frame rate (Hz)
pub const FRAME_RATE: u32 = 60;
