//! Simulation State
//!
//! The single aggregate every pipeline stage reads and writes: the tile grid,
//! the ordered agents, the win latch and the dead-agent display list.

use serde::{Serialize, Deserialize};
use tracing::info;

use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::rng::DeterministicRng;
use crate::game::agent::{AgentState, DeadMarker, SquareColor, Trail};
use crate::game::events::{SimEvent, SimEventData};
use crate::game::feedback::CollisionFeedback;
use crate::game::grid::TileGrid;
use crate::game::tick::SimConfig;
use crate::game::win::WinLatch;

/// Complete state of a simulation session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationState {
    /// Frames stepped so far
    pub frame: u64,

    /// RNG seed (for verification)
    pub rng_seed: u64,

    /// Velocity jitter source
    pub rng: DeterministicRng,

    /// Terrain and remaining power-ups
    pub grid: TileGrid,

    /// Agents in spawn order; never removed
    pub agents: Vec<AgentState>,

    /// Write-once winner record
    pub win: Option<WinLatch>,

    /// Dead agents in order of death
    pub dead: Vec<DeadMarker>,

    /// Audio cue debounce state
    pub feedback: CollisionFeedback,

    /// Set once the post-win grace period has expired
    pub session_ended: bool,

    /// Events generated this frame (cleared each frame)
    #[serde(skip)]
    pub pending_events: Vec<SimEvent>,
}

impl SimulationState {
    /// Create a session from a loaded grid.
    ///
    /// Every spawn marker becomes one agent at that tile's top-left corner,
    /// in row-major order, and the marker cell is cleared.
    pub fn new(mut grid: TileGrid, rng_seed: u64, config: &SimConfig) -> Self {
        let agents: Vec<AgentState> = grid
            .take_spawn_markers()
            .into_iter()
            .enumerate()
            .map(|(index, (row, col))| {
                let mut agent = AgentState::new(
                    index,
                    grid.tile_origin(row, col),
                    config.spawn_velocity,
                    config.agent_size,
                    SquareColor::for_spawn_index(index),
                );
                agent.trail = Trail::new(config.trail_capacity);
                agent
            })
            .collect();

        info!(
            agents = agents.len(),
            rows = grid.rows(),
            cols = grid.cols(),
            "Simulation initialised"
        );

        Self {
            frame: 0,
            rng_seed,
            rng: DeterministicRng::new(rng_seed),
            grid,
            agents,
            win: None,
            dead: Vec::new(),
            feedback: CollisionFeedback::default(),
            session_ended: false,
            pending_events: Vec::new(),
        }
    }

    /// Get an agent by index.
    pub fn agent(&self, index: usize) -> Option<&AgentState> {
        self.agents.get(index)
    }

    /// Number of agents still alive.
    pub fn alive_count(&self) -> usize {
        self.agents.iter().filter(|a| a.alive).count()
    }

    /// True once a win is latched: nothing moves any more.
    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.win.is_some()
    }

    /// Latch the win for `agent` at `now` unless a winner already exists.
    ///
    /// Returns true if this call set the latch.
    pub fn latch_win(&mut self, agent: usize, now: f64) -> bool {
        if self.win.is_some() {
            return false;
        }
        self.win = Some(WinLatch::new(agent, now));
        self.push_event(SimEvent::new(
            self.frame,
            SimEventData::WinLatched { agent, latched_at: now },
        ));
        true
    }

    /// Kill an agent and append its display marker.
    ///
    /// No-op for an agent that is already dead.
    pub fn eliminate(&mut self, index: usize) {
        let Some(agent) = self.agents.get_mut(index) else {
            return;
        };
        if !agent.alive {
            return;
        }
        agent.kill();
        self.dead.push(DeadMarker::from(&*agent));
    }

    /// Compute hash of current state for replay verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.frame, self.rng_seed, |hasher| {
            for (_, _, tile) in self.grid.cells() {
                hasher.update_i32(tile.code());
            }

            for agent in &self.agents {
                hasher.update_u32(agent.index as u32);
                hasher.update_vec2(agent.position);
                hasher.update_vec2(agent.velocity);
                hasher.update_bool(agent.alive);
                hasher.update_bool(agent.carrying_power_up);
            }

            match &self.win {
                Some(latch) => {
                    hasher.update_bool(true);
                    hasher.update_u32(latch.winner as u32);
                    hasher.update_f64(latch.latched_at);
                }
                None => hasher.update_bool(false),
            }

            for marker in &self.dead {
                hasher.update_u32(marker.index as u32);
                hasher.update_vec2(marker.position);
            }

            hasher.update_bool(self.session_ended);

            let [s0, s1] = self.rng.state();
            hasher.update_u64(s0);
            hasher.update_u64(s1);
        })
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a simulation event.
    pub fn push_event(&mut self, event: SimEvent) {
        self.pending_events.push(event);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec2::Vec2;
    use crate::game::grid::Tile;

    fn level() -> TileGrid {
        let mut codes = vec![vec![-1; 8]; 6];
        codes[1][1] = 6;
        codes[1][5] = 6;
        codes[4][2] = 6;
        TileGrid::from_codes(&codes, 25.0).unwrap()
    }

    #[test]
    fn test_spawn_in_scan_order() {
        let state = SimulationState::new(level(), 7, &SimConfig::default());

        assert_eq!(state.agents.len(), 3);
        assert_eq!(state.agents[0].position, Vec2::new(25.0, 25.0));
        assert_eq!(state.agents[1].position, Vec2::new(125.0, 25.0));
        assert_eq!(state.agents[2].position, Vec2::new(50.0, 100.0));

        assert_eq!(state.agents[0].color, SquareColor::Red);
        assert_eq!(state.agents[1].color, SquareColor::Blue);
        assert_eq!(state.agents[2].color, SquareColor::Yellow);

        for agent in &state.agents {
            assert_eq!(agent.velocity, Vec2::new(5.0, 5.0));
            assert!(agent.alive);
        }
    }

    #[test]
    fn test_spawn_markers_consumed() {
        let state = SimulationState::new(level(), 7, &SimConfig::default());
        assert!(state.grid.find_tiles_with_code(Tile::SpawnMarker).is_empty());
        assert_eq!(state.grid.tile_at(1, 1), Ok(Tile::Empty));
    }

    #[test]
    fn test_latch_is_write_once() {
        let mut state = SimulationState::new(level(), 7, &SimConfig::default());
        assert!(state.latch_win(1, 2.5));
        assert!(!state.latch_win(2, 3.0));

        let latch = state.win.unwrap();
        assert_eq!(latch.winner, 1);
        assert_eq!(latch.latched_at, 2.5);
        assert_eq!(state.take_events().len(), 1);
    }

    #[test]
    fn test_eliminate_once() {
        let mut state = SimulationState::new(level(), 7, &SimConfig::default());
        state.eliminate(0);
        state.eliminate(0);

        assert!(!state.agents[0].alive);
        assert_eq!(state.dead.len(), 1);
        assert_eq!(state.alive_count(), 2);
    }

    #[test]
    fn test_state_hash_determinism() {
        let a = SimulationState::new(level(), 99, &SimConfig::default());
        let b = SimulationState::new(level(), 99, &SimConfig::default());
        assert_eq!(a.compute_hash(), b.compute_hash());

        let c = SimulationState::new(level(), 100, &SimConfig::default());
        assert_ne!(a.compute_hash(), c.compute_hash());
    }
}
