//! Win Detection
//!
//! First living agent to touch a finish tile wins. The latch is write-once;
//! the session ends a fixed grace period after it is set.

use serde::{Serialize, Deserialize};
use tracing::info;

use crate::game::grid::Tile;
use crate::game::state::SimulationState;

/// Winner record.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WinLatch {
    /// Winning agent index
    pub winner: usize,
    /// Timestamp when the latch was set
    pub latched_at: f64,
}

impl WinLatch {
    /// Create a latch.
    pub fn new(winner: usize, latched_at: f64) -> Self {
        Self { winner, latched_at }
    }

    /// Time at which the session ends.
    #[inline]
    pub fn ends_at(&self, grace_period: f64) -> f64 {
        self.latched_at + grace_period
    }

    /// True once `now` has reached the end of the grace period.
    #[inline]
    pub fn is_expired(&self, now: f64, grace_period: f64) -> bool {
        now >= self.ends_at(grace_period)
    }

    /// End-of-round text, e.g. "Square 2 Wins!".
    pub fn announcement(&self) -> String {
        format!("Square {} Wins!", self.winner + 1)
    }
}

/// Latch the win for the first living agent (by index) on a finish tile.
pub fn detect_win(state: &mut SimulationState, now: f64) {
    if state.win.is_some() {
        return;
    }

    let winner = state.agents.iter().find(|agent| {
        agent.alive
            && state
                .grid
                .overlapping_cells(&agent.rect())
                .iter()
                .any(|&(_, _, tile)| tile == Tile::Finish)
    });

    if let Some(index) = winner.map(|agent| agent.index) {
        if state.latch_win(index, now) {
            info!(agent = index, at = now, "Win latched");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec2::Vec2;
    use crate::game::grid::TileGrid;
    use crate::game::tick::SimConfig;

    fn state_with_finish() -> SimulationState {
        let mut codes = vec![vec![-1; 10]; 10];
        codes[5][5] = 5;
        codes[0][0] = 6;
        codes[0][9] = 6;
        SimulationState::new(TileGrid::from_codes(&codes, 25.0).unwrap(), 1, &SimConfig::default())
    }

    #[test]
    fn test_latch_on_finish() {
        let mut state = state_with_finish();
        state.agents[1].position = Vec2::new(120.0, 120.0);

        detect_win(&mut state, 4.0);
        let latch = state.win.unwrap();
        assert_eq!(latch.winner, 1);
        assert_eq!(latch.latched_at, 4.0);
    }

    #[test]
    fn test_lowest_index_wins_same_frame() {
        let mut state = state_with_finish();
        state.agents[0].position = Vec2::new(130.0, 130.0);
        state.agents[1].position = Vec2::new(120.0, 120.0);

        detect_win(&mut state, 1.0);
        assert_eq!(state.win.unwrap().winner, 0);
    }

    #[test]
    fn test_dead_agent_cannot_win() {
        let mut state = state_with_finish();
        state.agents[0].position = Vec2::new(125.0, 125.0);
        state.eliminate(0);

        detect_win(&mut state, 1.0);
        assert!(state.win.is_none());
    }

    #[test]
    fn test_latch_not_overwritten() {
        let mut state = state_with_finish();
        state.agents[0].position = Vec2::new(125.0, 125.0);
        detect_win(&mut state, 1.0);

        state.agents[0].position = Vec2::ZERO;
        state.agents[1].position = Vec2::new(125.0, 125.0);
        detect_win(&mut state, 2.0);

        assert_eq!(state.win, Some(WinLatch::new(0, 1.0)));
    }

    #[test]
    fn test_grace_period() {
        let latch = WinLatch::new(2, 10.0);
        assert!(!latch.is_expired(14.9, 5.0));
        assert!(latch.is_expired(15.0, 5.0));
        assert_eq!(latch.announcement(), "Square 3 Wins!");
    }
}
