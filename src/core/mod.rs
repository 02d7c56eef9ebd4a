//! Core primitives.
//!
//! Math, randomness, hashing and time sources shared by the simulation.
//! Nothing in here knows about tiles or squares.

pub mod vec2;
pub mod rng;
pub mod hash;
pub mod clock;

// Re-export core types
pub use vec2::Vec2;
pub use rng::DeterministicRng;
pub use hash::{compute_state_hash, StateHash, StateHasher};
pub use clock::{Clock, FrameClock, MonotonicClock};
