//! Frame Step
//!
//! The per-frame pipeline. Stages run over all agents in index order:
//!
//! 1. Advance living agents and record their trails
//! 2. Per agent: world-edge reflection, obstacle resolution, power-up pickup
//! 3. Armed-agent eliminations
//! 4. Teleports
//! 5. Win detection
//! 6. Collision feedback cue and grace-period expiry
//!
//! Stages 1-5 are skipped once a win is latched. Given the same level, seed
//! and timestamps, the pipeline is fully deterministic.

use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::info;
#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::core::clock::{Clock, FrameClock};
use crate::core::vec2::Vec2;
use crate::game::collision::{reflect_at_bounds, resolve_obstacles};
use crate::game::events::{FrameSignals, SimEvent, SimEventData};
use crate::game::feedback::{FeedbackCue, FeedbackTiming};
use crate::game::grid::GridError;
use crate::game::powerup::{collect_power_ups, process_eliminations};
use crate::game::state::SimulationState;
use crate::game::teleport::process_teleports;
use crate::game::win::detect_win;

/// Simulation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// A stage addressed a tile outside the grid. Contract violation.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// An entry tile was touched but the grid holds no exit.
    #[error("teleporter entry touched but the grid has no exit tile")]
    NoTeleportExit,
}

/// Tunables for a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Tile edge length in world units
    pub tile_size: f32,
    /// Agent edge length in world units
    pub agent_size: f32,
    /// Velocity every agent spawns with
    pub spawn_velocity: Vec2,
    /// Trail points kept per agent
    pub trail_capacity: usize,
    /// Maximum velocity rotation after an obstacle hit (radians)
    pub jitter: f32,
    /// Time from win latch to session end
    pub win_grace_period: f64,
    /// Collision audio cue timing
    pub feedback: FeedbackTiming,
    /// Frames per second for [`FrameClock`]-driven runs
    pub frame_rate: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tile_size: 25.0,
            agent_size: 25.0,
            spawn_velocity: Vec2::new(5.0, 5.0),
            trail_capacity: 10,
            jitter: 0.087, // ~5 degrees
            win_grace_period: 5.0,
            feedback: FeedbackTiming::default(),
            frame_rate: crate::FRAME_RATE,
        }
    }
}

/// Result of one frame.
#[derive(Debug, Default)]
pub struct FrameResult {
    /// Frame number just completed
    pub frame: u64,
    /// Events generated this frame
    pub events: Vec<SimEvent>,
    /// Boolean summary of `events`
    pub signals: FrameSignals,
    /// Audio cue to apply, if any
    pub feedback_cue: Option<FeedbackCue>,
    /// Grace period has expired; the caller should stop stepping
    pub session_ended: bool,
}

/// Run one frame at time `now`.
///
/// `now` is read only for the feedback debounce and the win latch, so any
/// monotonic source works. An `Err` means the grid was addressed out of
/// bounds and the session cannot continue.
pub fn step(
    state: &mut SimulationState,
    now: f64,
    config: &SimConfig,
) -> Result<FrameResult, SimError> {
    if state.session_ended {
        return Ok(FrameResult {
            frame: state.frame,
            session_ended: true,
            ..FrameResult::default()
        });
    }

    state.frame += 1;

    if !state.is_frozen() {
        advance_agents(state);

        for index in 0..state.agents.len() {
            resolve_terrain(state, index, config)?;
        }

        process_eliminations(state);
        process_teleports(state)?;
        detect_win(state, now);
    }

    let signals = FrameSignals::from_events(&state.pending_events);
    let feedback_cue = state
        .feedback
        .update(now, signals.obstacle_collision, &config.feedback);

    check_session_end(state, now, config);

    #[cfg(feature = "debug-tracing")]
    trace!(
        frame = state.frame,
        alive = state.alive_count(),
        events = state.pending_events.len(),
        "Frame complete"
    );

    Ok(FrameResult {
        frame: state.frame,
        events: state.take_events(),
        signals,
        feedback_cue,
        session_ended: state.session_ended,
    })
}

/// Move every living agent by its velocity.
fn advance_agents(state: &mut SimulationState) {
    for agent in state.agents.iter_mut().filter(|a| a.alive) {
        agent.advance();
        agent.record_trail();
    }
}

/// World edges, obstacles and power-ups for a single agent.
fn resolve_terrain(
    state: &mut SimulationState,
    index: usize,
    config: &SimConfig,
) -> Result<(), SimError> {
    if !state.agents[index].alive {
        return Ok(());
    }

    let world = state.grid.world_size();
    let frame = state.frame;

    if reflect_at_bounds(&mut state.agents[index], world).any() {
        state.push_event(SimEvent::new(frame, SimEventData::BoundaryBounce { agent: index }));
    }

    let contacts = resolve_obstacles(
        &mut state.agents[index],
        &state.grid,
        &mut state.rng,
        config.jitter,
    );

    // Wedged agents stay silent until they actually come free
    for contact in contacts.into_iter().filter(|c| c.separated) {
        state.push_event(SimEvent::new(
            frame,
            SimEventData::ObstacleHit {
                agent: index,
                row: contact.row,
                col: contact.col,
                axis: contact.axis,
            },
        ));
    }

    collect_power_ups(state, index)?;
    Ok(())
}

/// Flag the session as over once the grace period has run out.
fn check_session_end(state: &mut SimulationState, now: f64, config: &SimConfig) {
    let Some(latch) = state.win else {
        return;
    };
    if state.session_ended || !latch.is_expired(now, config.win_grace_period) {
        return;
    }

    state.session_ended = true;
    info!(winner = latch.winner, at = now, "{}", latch.announcement());
    state.push_event(SimEvent::new(
        state.frame,
        SimEventData::SessionEnded { winner: latch.winner },
    ));
}

/// Step a session on a [`FrameClock`] until it ends or `max_frames` pass.
///
/// Returns the final state and every event in order.
pub fn run_session(
    initial_state: SimulationState,
    config: &SimConfig,
    max_frames: u64,
) -> Result<(SimulationState, Vec<SimEvent>), SimError> {
    let mut state = initial_state;
    let mut clock = FrameClock::new(config.frame_rate);
    let mut all_events = Vec::new();

    for _ in 0..max_frames {
        let result = step(&mut state, clock.now(), config)?;
        all_events.extend(result.events);
        clock.advance();

        if result.session_ended {
            break;
        }
    }

    Ok((state, all_events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::grid::TileGrid;

    fn level(features: &[(usize, usize, i32)]) -> SimulationState {
        let mut codes = vec![vec![-1; 10]; 10];
        codes[0][0] = 6;
        for &(row, col, code) in features {
            codes[row][col] = code;
        }
        SimulationState::new(TileGrid::from_codes(&codes, 25.0).unwrap(), 12345, &SimConfig::default())
    }

    #[test]
    fn test_step_determinism() {
        let config = SimConfig::default();
        let features = [(2, 2, 1), (5, 7, 1), (7, 3, 1), (4, 4, 2)];
        let mut a = level(&features);
        let mut b = level(&features);

        for f in 0..600 {
            let now = f as f64 / 60.0;
            step(&mut a, now, &config).unwrap();
            step(&mut b, now, &config).unwrap();
        }

        assert_eq!(a.frame, 600);
        assert_eq!(a.compute_hash(), b.compute_hash());
        assert_eq!(a.agents[0].position, b.agents[0].position);
    }

    #[test]
    fn test_obstacle_hit_starts_feedback() {
        // Diagonal path from (0,0) clips the obstacle at (2,2) on frame 6
        let config = SimConfig::default();
        let mut state = level(&[(2, 2, 1)]);

        let mut first_hit = None;
        for f in 1..=20 {
            let result = step(&mut state, f as f64, &config).unwrap();
            if result.signals.obstacle_collision {
                first_hit = Some((result.frame, result.feedback_cue));
                break;
            }
        }

        let (frame, cue) = first_hit.unwrap();
        assert_eq!(frame, 6);
        assert_eq!(cue, Some(FeedbackCue::Resume { from: 0.0 }));
        assert!(state.agents[0].velocity.x < 0.0);
        assert_eq!(state.agents[0].position.x, 25.0);
    }

    #[test]
    fn test_wedged_agent_raises_no_collision_signal() {
        // Obstacle flush with the right world edge; the agent is pinned on it
        let config = SimConfig { jitter: 0.0, ..SimConfig::default() };
        let mut state = level(&[(4, 9, 1)]);
        state.agents[0].position = Vec2::new(220.0, 100.0);
        state.agents[0].velocity = Vec2::new(5.0, 0.0);

        for f in 1..=10 {
            let result = step(&mut state, f as f64, &config).unwrap();
            assert!(!result.signals.obstacle_collision, "frame {f}");
            assert_eq!(result.feedback_cue, None);
            assert!(result.events.iter().all(|e| !e.is_obstacle_hit()));
        }
        assert_eq!(state.agents[0].position, Vec2::new(225.0, 100.0));
        assert!(!state.feedback.is_active());
    }

    #[test]
    fn test_floor_seam_bounces_vertically() {
        let config = SimConfig { jitter: 0.0, ..SimConfig::default() };
        let mut state = level(&[(5, 3, 1), (5, 4, 1)]);
        state.agents[0].position = Vec2::new(102.0, 99.0);
        state.agents[0].velocity = Vec2::new(-5.0, 5.0);

        let result = step(&mut state, 0.0, &config).unwrap();

        assert!(result.signals.obstacle_collision);
        assert_eq!(state.agents[0].position, Vec2::new(97.0, 100.0));
        assert_eq!(state.agents[0].velocity, Vec2::new(-5.0, -5.0));
    }

    #[test]
    fn test_win_freezes_and_ends_session() {
        // Finish at (4,4): first overlap on frame 16
        let config = SimConfig::default();
        let mut state = level(&[(4, 4, 5)]);

        for f in 1..=16 {
            step(&mut state, f as f64, &config).unwrap();
        }
        let latch = state.win.unwrap();
        assert_eq!(latch.winner, 0);
        assert_eq!(latch.latched_at, 16.0);

        let frozen_at = state.agents[0].position;
        for f in 17..21 {
            let result = step(&mut state, f as f64, &config).unwrap();
            assert!(!result.session_ended);
            assert_eq!(state.agents[0].position, frozen_at);
        }

        let result = step(&mut state, 21.0, &config).unwrap();
        assert!(result.session_ended);
        assert!(result
            .events
            .iter()
            .any(|e| e.data == SimEventData::SessionEnded { winner: 0 }));

        // Further steps are inert
        let result = step(&mut state, 22.0, &config).unwrap();
        assert!(result.session_ended);
        assert!(result.events.is_empty());
    }

    #[test]
    fn test_dead_agent_frozen() {
        let config = SimConfig::default();
        let mut state = level(&[]);
        state.agents[0].position = Vec2::new(100.0, 100.0);
        state.eliminate(0);

        for f in 0..50 {
            step(&mut state, f as f64, &config).unwrap();
        }
        assert_eq!(state.agents[0].position, Vec2::new(100.0, 100.0));
        assert!(state.agents[0].trail.is_empty());
    }

    #[test]
    fn test_boundary_bounce_event() {
        let config = SimConfig::default();
        let mut state = level(&[]);
        state.agents[0].position = Vec2::new(222.0, 100.0);

        let result = step(&mut state, 0.0, &config).unwrap();
        assert!(result.signals.boundary_bounce);
        assert_eq!(state.agents[0].position.x, 225.0);
        assert_eq!(state.agents[0].velocity.x, -5.0);
    }

    #[test]
    fn test_run_session_stops_at_end() {
        let config = SimConfig::default();
        let state = level(&[(4, 4, 5)]);

        let (final_state, events) = run_session(state, &config, 10_000).unwrap();
        assert!(final_state.session_ended);
        assert!(matches!(
            events.last().map(|e| &e.data),
            Some(SimEventData::SessionEnded { winner: 0 })
        ));
        // Latched on frame 16, grace period of 5 s at 60 fps
        assert!(final_state.frame < 16 + 5 * 60 + 2);
    }
}
