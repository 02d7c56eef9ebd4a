//! Collision Detection and Resolution
//!
//! Agent-vs-world-edge reflection, agent-vs-obstacle resolution along the
//! axis of least penetration, and agent-vs-agent overlap tests.

use serde::{Serialize, Deserialize};

use crate::core::rng::DeterministicRng;
use crate::core::vec2::Vec2;
use crate::game::agent::AgentState;
use crate::game::grid::{Tile, TileGrid};

/// Axis-aligned rectangle (top-left origin, y down).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub origin: Vec2,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Create a rectangle.
    #[inline]
    pub const fn new(origin: Vec2, width: f32, height: f32) -> Self {
        Self { origin, width, height }
    }

    /// Left edge (x).
    #[inline]
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    /// Right edge (x).
    #[inline]
    pub fn right(&self) -> f32 {
        self.origin.x + self.width
    }

    /// Top edge (y).
    #[inline]
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    /// Bottom edge (y).
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.height
    }

    /// Centre point.
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.origin.x + self.width * 0.5,
            self.origin.y + self.height * 0.5,
        )
    }

    /// Area shared with `other`; zero when they do not overlap.
    #[inline]
    pub fn intersection_area(&self, other: &Rect) -> f32 {
        let w = self.right().min(other.right()) - self.left().max(other.left());
        let h = self.bottom().min(other.bottom()) - self.top().max(other.top());
        w.max(0.0) * h.max(0.0)
    }

    /// Strict overlap: rectangles sharing only an edge do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Axis along which a collision was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Horizontal
    X,
    /// Vertical
    Y,
}

/// Which world edges an agent bounced off this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoundaryBounce {
    /// Left or right edge
    pub x: bool,
    /// Top or bottom edge
    pub y: bool,
}

impl BoundaryBounce {
    /// True if any edge was hit.
    #[inline]
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Outcome of resolving one obstacle overlap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleContact {
    /// Obstacle row
    pub row: usize,
    /// Obstacle column
    pub col: usize,
    /// Axis the agent was pushed out along
    pub axis: Axis,
    /// Overlap cleared after jitter and re-clamp
    pub separated: bool,
}

/// Penetration depth on each axis between two overlapping rectangles.
///
/// Computed as half-extents sum minus centre distance, per axis.
#[inline]
pub fn penetration(a: &Rect, b: &Rect) -> (f32, f32) {
    let ca = a.center();
    let cb = b.center();
    let pen_x = (a.width + b.width) * 0.5 - (ca.x - cb.x).abs();
    let pen_y = (a.height + b.height) * 0.5 - (ca.y - cb.y).abs();
    (pen_x, pen_y)
}

/// Clamp an agent's top-left corner so the whole square stays in the world.
#[inline]
pub fn clamp_to_world(agent: &mut AgentState, world: Vec2) {
    let max = Vec2::new(
        (world.x - agent.size).max(0.0),
        (world.y - agent.size).max(0.0),
    );
    agent.position = agent.position.clamp(Vec2::ZERO, max);
}

/// Reflect an agent at the world edges, then clamp it back inside.
///
/// The reflected component always points back into the world, so an agent
/// that is already heading inward keeps its direction.
pub fn reflect_at_bounds(agent: &mut AgentState, world: Vec2) -> BoundaryBounce {
    let mut bounce = BoundaryBounce::default();

    if agent.position.x <= 0.0 {
        agent.velocity.x = agent.velocity.x.abs();
        bounce.x = true;
    } else if agent.position.x + agent.size >= world.x {
        agent.velocity.x = -agent.velocity.x.abs();
        bounce.x = true;
    }

    if agent.position.y <= 0.0 {
        agent.velocity.y = agent.velocity.y.abs();
        bounce.y = true;
    } else if agent.position.y + agent.size >= world.y {
        agent.velocity.y = -agent.velocity.y.abs();
        bounce.y = true;
    }

    clamp_to_world(agent, world);
    bounce
}

/// Push an agent out of one obstacle it overlaps.
///
/// Resolves along the axis with the smaller penetration (ties go to X),
/// places the agent flush against the obstacle edge, turns the velocity
/// component on that axis away from the obstacle, then rotates the velocity
/// by a random angle in `[-jitter, jitter]` keeping its magnitude.
/// Returns `None` when the two boxes do not overlap.
pub fn resolve_obstacle(
    agent: &mut AgentState,
    obstacle: &Rect,
    row: usize,
    col: usize,
    world: Vec2,
    rng: &mut DeterministicRng,
    jitter: f32,
) -> Option<ObstacleContact> {
    let rect = agent.rect();
    if !rect.overlaps(obstacle) {
        return None;
    }

    let (pen_x, pen_y) = penetration(&rect, obstacle);
    let agent_center = rect.center();
    let obstacle_center = obstacle.center();

    let axis = if pen_x <= pen_y {
        if agent_center.x < obstacle_center.x {
            agent.position.x = obstacle.left() - agent.size;
            agent.velocity.x = -agent.velocity.x.abs();
        } else {
            agent.position.x = obstacle.right();
            agent.velocity.x = agent.velocity.x.abs();
        }
        Axis::X
    } else {
        if agent_center.y < obstacle_center.y {
            agent.position.y = obstacle.top() - agent.size;
            agent.velocity.y = -agent.velocity.y.abs();
        } else {
            agent.position.y = obstacle.bottom();
            agent.velocity.y = agent.velocity.y.abs();
        }
        Axis::Y
    };

    if jitter > 0.0 {
        let angle = rng.next_f32_range(-jitter, jitter);
        agent.velocity = agent.velocity.rotate(angle);
    }

    clamp_to_world(agent, world);
    let separated = !agent.rect().overlaps(obstacle);

    Some(ObstacleContact { row, col, axis, separated })
}

/// Resolve every obstacle the agent overlaps, largest contact first.
///
/// Candidates are ordered by overlap area with the agent's box (ties keep
/// row-major order), so on a floor or wall built from several tiles the
/// main contact is resolved before a tile that is only clipped at a seam.
/// Each obstacle is re-tested against the agent's current position, so a
/// push-out from an earlier tile is never resolved twice. Tiles entered by
/// a push-out get one follow-up pass in row-major order.
pub fn resolve_obstacles(
    agent: &mut AgentState,
    grid: &TileGrid,
    rng: &mut DeterministicRng,
    jitter: f32,
) -> Vec<ObstacleContact> {
    let world = grid.world_size();
    let rect = agent.rect();

    let mut candidates: Vec<(usize, usize, f32)> = grid
        .overlapping_cells(&rect)
        .into_iter()
        .filter(|&(_, _, tile)| tile == Tile::Obstacle)
        .map(|(row, col, _)| (row, col, rect.intersection_area(&grid.tile_rect(row, col))))
        .collect();
    candidates.sort_by(|a, b| b.2.total_cmp(&a.2));

    let mut contacts = Vec::new();
    let mut visited: Vec<(usize, usize)> = Vec::with_capacity(candidates.len());
    for (row, col, _) in candidates {
        visited.push((row, col));
        let obstacle = grid.tile_rect(row, col);
        if let Some(contact) = resolve_obstacle(agent, &obstacle, row, col, world, rng, jitter) {
            contacts.push(contact);
        }
    }

    // A push-out can land the agent in a tile it was not touching before
    let pushed_into: Vec<(usize, usize)> = grid
        .overlapping_cells(&agent.rect())
        .into_iter()
        .filter(|&(row, col, tile)| tile == Tile::Obstacle && !visited.contains(&(row, col)))
        .map(|(row, col, _)| (row, col))
        .collect();
    for (row, col) in pushed_into {
        let obstacle = grid.tile_rect(row, col);
        if let Some(contact) = resolve_obstacle(agent, &obstacle, row, col, world, rng, jitter) {
            contacts.push(contact);
        }
    }

    contacts
}

/// Check if two living agents overlap.
#[inline]
pub fn agents_overlap(a: &AgentState, b: &AgentState) -> bool {
    if !a.alive || !b.alive {
        return false;
    }
    a.rect().overlaps(&b.rect())
}
