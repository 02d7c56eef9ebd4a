//! Agent State
//!
//! One bouncing square: kinematics, palette colour, trail and the
//! power-up/alive flags the pipeline stages read and write.

use std::collections::VecDeque;
use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::collision::Rect;

// =============================================================================
// COLOUR PALETTE
// =============================================================================

/// Fixed agent colour, assigned round-robin at spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum SquareColor {
    /// (255, 0, 0)
    Red = 0,
    /// (0, 0, 255)
    Blue = 1,
    /// (255, 255, 0)
    Yellow = 2,
    /// (128, 0, 128)
    Purple = 3,
    /// (255, 165, 0)
    Orange = 4,
}

impl SquareColor {
    /// Spawn palette in assignment order.
    pub const PALETTE: [SquareColor; 5] = [
        SquareColor::Red,
        SquareColor::Blue,
        SquareColor::Yellow,
        SquareColor::Purple,
        SquareColor::Orange,
    ];

    /// Colour for the `n`-th spawned agent.
    #[inline]
    pub fn for_spawn_index(n: usize) -> Self {
        Self::PALETTE[n % Self::PALETTE.len()]
    }

    /// RGB triple for renderers.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            SquareColor::Red => (255, 0, 0),
            SquareColor::Blue => (0, 0, 255),
            SquareColor::Yellow => (255, 255, 0),
            SquareColor::Purple => (128, 0, 128),
            SquareColor::Orange => (255, 165, 0),
        }
    }

    /// Lightened RGB used for contrails (+40 per channel, saturating).
    pub fn trail_rgb(self) -> (u8, u8, u8) {
        let (r, g, b) = self.rgb();
        (r.saturating_add(40), g.saturating_add(40), b.saturating_add(40))
    }
}

/// Opaque marker telling the renderer to draw the "armed" overlay.
///
/// The renderer owns the mapping from colour to its visual asset; the
/// simulation only carries the key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverlayTag(pub SquareColor);

// =============================================================================
// TRAIL
// =============================================================================

/// Bounded FIFO of recent positions (visual only).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    points: VecDeque<Vec2>,
    capacity: usize,
}

impl Trail {
    /// Default trail length.
    pub const DEFAULT_CAPACITY: usize = 10;

    /// Create an empty trail.
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a point, evicting the oldest past capacity.
    pub fn push(&mut self, point: Vec2) {
        if self.capacity == 0 {
            return;
        }
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    /// Points, oldest first.
    pub fn points(&self) -> impl Iterator<Item = &Vec2> {
        self.points.iter()
    }

    /// Number of stored points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when no point is stored.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Per-point `(alpha, size_fraction)` for contrail drawing, oldest first.
    ///
    /// Alpha fades from opaque at the oldest point; size grows from zero at
    /// the oldest point toward full size at the newest.
    pub fn fade_profile(&self) -> Vec<(u8, f32)> {
        let len = self.points.len();
        (0..len)
            .map(|i| {
                let alpha = (255.0 * (1.0 - i as f32 / len as f32)) as u8;
                let size = 1.0 - (len - i) as f32 / len as f32;
                (alpha, size)
            })
            .collect()
    }
}

impl Default for Trail {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

// =============================================================================
// AGENT STATE
// =============================================================================

/// State of a single square.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    /// Stable index in spawn (scan) order
    pub index: usize,

    /// Top-left corner in world units
    pub position: Vec2,

    /// Displacement per frame
    pub velocity: Vec2,

    /// Edge length of the square
    pub size: f32,

    /// Palette colour
    pub color: SquareColor,

    /// Recent positions
    pub trail: Trail,

    /// Cleared once on death, never set again
    pub alive: bool,

    /// Holding the kill power-up
    pub carrying_power_up: bool,

    /// Render hint mirroring `carrying_power_up`
    pub overlay: Option<OverlayTag>,
}

impl AgentState {
    /// Create a living, unarmed agent.
    pub fn new(index: usize, position: Vec2, velocity: Vec2, size: f32, color: SquareColor) -> Self {
        Self {
            index,
            position,
            velocity,
            size,
            color,
            trail: Trail::default(),
            alive: true,
            carrying_power_up: false,
            overlay: None,
        }
    }

    /// Bounding box at the current position.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.position, self.size, self.size)
    }

    /// Current speed (velocity magnitude).
    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Move by one frame of velocity. Dead agents stay put.
    pub fn advance(&mut self) {
        if !self.alive {
            return;
        }
        self.position = self.position + self.velocity;
    }

    /// Append the current position to the trail.
    pub fn record_trail(&mut self) {
        self.trail.push(self.position);
    }

    /// Pick up the kill power-up.
    pub fn arm(&mut self) {
        self.carrying_power_up = true;
        self.overlay = Some(OverlayTag(self.color));
    }

    /// Drop the power-up (spent on a kill).
    pub fn disarm(&mut self) {
        self.carrying_power_up = false;
        self.overlay = None;
    }

    /// Mark dead. Also clears any power-up.
    pub fn kill(&mut self) {
        self.alive = false;
        self.disarm();
    }

    /// Armed and still in play.
    #[inline]
    pub fn is_armed(&self) -> bool {
        self.alive && self.carrying_power_up
    }

    /// 1-based label used in end-of-round text.
    pub fn label(&self) -> String {
        format!("Square {}", self.index + 1)
    }
}

/// Frozen copy of a dead agent kept for terminal-state display.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeadMarker {
    /// Agent index
    pub index: usize,
    /// Position at death
    pub position: Vec2,
    /// Palette colour
    pub color: SquareColor,
}

impl From<&AgentState> for DeadMarker {
    fn from(agent: &AgentState) -> Self {
        Self {
            index: agent.index,
            position: agent.position,
            color: agent.color,
        }
    }
}
