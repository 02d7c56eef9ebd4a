//! Kill Power-Up and Elimination
//!
//! Per-agent state machine:
//!
//! ```text
//! unarmed --(touch power-up tile)--> armed
//! armed   --(touch unarmed agent)--> unarmed      (other agent dies)
//! armed   --(touch armed agent)----> dead         (both die)
//! ```
//!
//! `dead` is terminal.

use tracing::{debug, info};

use crate::game::collision::agents_overlap;
use crate::game::events::{SimEvent, SimEventData};
use crate::game::grid::{GridError, Tile};
use crate::game::state::SimulationState;

/// Arm `agent` with every power-up tile it overlaps and clear those tiles.
///
/// A tile is consumed by the first agent to touch it; touching another
/// tile while already armed still consumes it.
pub fn collect_power_ups(state: &mut SimulationState, agent: usize) -> Result<(), GridError> {
    let Some(current) = state.agents.get(agent) else {
        return Ok(());
    };
    if !current.alive {
        return Ok(());
    }

    let pickups: Vec<(usize, usize)> = state
        .grid
        .overlapping_cells(&current.rect())
        .into_iter()
        .filter(|&(_, _, tile)| tile == Tile::KillPowerUp)
        .map(|(row, col, _)| (row, col))
        .collect();

    for (row, col) in pickups {
        state.grid.set_tile(row, col, Tile::Empty)?;
        state.agents[agent].arm();
        debug!(agent, row, col, "Power-up collected");
        state.push_event(SimEvent::new(
            state.frame,
            SimEventData::PowerUpCollected { agent, row, col },
        ));
    }

    Ok(())
}

/// Result of one armed agent touching another living agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Elimination {
    /// Both were armed; both die
    Mutual { first: usize, second: usize },
    /// `killer` was armed, `victim` was not
    OneSided { killer: usize, victim: usize },
}

/// Decide what happens when armed agent `i` touches agent `j`.
///
/// Returns `None` unless `i` is armed, `j` is a different living agent and
/// the two overlap.
pub fn check_elimination(state: &SimulationState, i: usize, j: usize) -> Option<Elimination> {
    if i == j {
        return None;
    }
    let a = state.agents.get(i)?;
    let b = state.agents.get(j)?;

    if !a.is_armed() || !agents_overlap(a, b) {
        return None;
    }

    if b.is_armed() {
        Some(Elimination::Mutual { first: i, second: j })
    } else {
        Some(Elimination::OneSided { killer: i, victim: j })
    }
}

/// Apply an elimination to the state.
///
/// Dead agents are appended to the display list victim-first, matching
/// the order the kill is announced.
pub fn apply_elimination(state: &mut SimulationState, elimination: Elimination) {
    let frame = state.frame;
    match elimination {
        Elimination::Mutual { first, second } => {
            state.eliminate(second);
            state.eliminate(first);
            info!(first, second, "Mutual kill");
            state.push_event(SimEvent::new(frame, SimEventData::MutualKill { first, second }));
        }
        Elimination::OneSided { killer, victim } => {
            state.eliminate(victim);
            state.agents[killer].disarm();
            info!(killer, victim, "Kill");
            state.push_event(SimEvent::new(frame, SimEventData::Kill { killer, victim }));
        }
    }
}

/// Run every pairwise armed-agent check in index order.
///
/// Each armed agent spends its power-up on the first agent it touches, so a
/// three-way pile-up resolves as a sequence of pairwise kills.
pub fn process_eliminations(state: &mut SimulationState) {
    let count = state.agents.len();
    for i in 0..count {
        for j in 0..count {
            if !state.agents[i].is_armed() {
                break;
            }
            if let Some(elimination) = check_elimination(state, i, j) {
                apply_elimination(state, elimination);
            }
        }
    }
}
