//! Teleport Routing
//!
//! Any agent touching an entry tile is moved to the first exit tile in
//! row-major scan order. The lookup is a full grid scan every time; the
//! first-match order is observable, so it is not cached.

use tracing::{debug, trace};

use crate::game::events::{SimEvent, SimEventData};
use crate::game::grid::{Tile, TileGrid};
use crate::game::state::SimulationState;
use crate::game::tick::SimError;

/// First teleporter exit in row-major order.
pub fn route_exit(grid: &TileGrid) -> Result<(usize, usize), SimError> {
    grid.find_tiles_with_code(Tile::TeleportExit)
        .into_iter()
        .next()
        .ok_or(SimError::NoTeleportExit)
}

/// True if the agent's box overlaps any teleporter entry.
fn touches_entry(state: &SimulationState, index: usize) -> bool {
    let agent = &state.agents[index];
    agent.alive
        && state
            .grid
            .overlapping_cells(&agent.rect())
            .iter()
            .any(|&(_, _, tile)| tile == Tile::TeleportEntry)
}

/// Relocate every living agent standing on an entry tile.
///
/// Velocity is unchanged. Agents routed to the same exit stack on it. With
/// no exit on the grid this is a no-op.
pub fn process_teleports(state: &mut SimulationState) -> Result<(), SimError> {
    let view: &SimulationState = state;
    let travellers: Vec<usize> = (0..view.agents.len())
        .filter(|&i| touches_entry(view, i))
        .collect();

    if travellers.is_empty() {
        return Ok(());
    }

    let (exit_row, exit_col) = match route_exit(&state.grid) {
        Ok(exit) => exit,
        Err(SimError::NoTeleportExit) => {
            debug!(agents = travellers.len(), "Entry touched but grid has no exit");
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    let position = state.grid.tile_origin(exit_row, exit_col);

    for agent in travellers {
        state.agents[agent].position = position;
        trace!(agent, exit_row, exit_col, "Teleported");
        state.push_event(SimEvent::new(
            state.frame,
            SimEventData::Teleported { agent, exit_row, exit_col, position },
        ));
    }

    Ok(())
}
