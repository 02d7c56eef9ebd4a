//! Bounce Arena Runner
//!
//! Headless runner: loads a level, steps it on a frame clock until the
//! post-win grace period expires, then replays it to check determinism.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use bounce_arena::{
    FRAME_RATE, VERSION,
    core::clock::{Clock, FrameClock},
    game::{
        events::SimEventData,
        grid::TileGrid,
        snapshot::FrameSnapshot,
        state::SimulationState,
        tick::{run_session, step, SimConfig},
    },
    level::load_level,
};

/// Runner settings from the environment.
#[derive(Debug, Clone)]
struct RunnerConfig {
    /// Level file; the built-in demo level is used when unset
    level: Option<PathBuf>,
    /// Jitter RNG seed
    seed: u64,
    /// Hard stop if nobody wins
    max_frames: u64,
    /// Print a JSON snapshot every N frames (0 = never)
    snapshot_every: u64,
}

impl RunnerConfig {
    /// Load from `BOUNCE_*` environment variables.
    fn from_env() -> Result<Self> {
        Ok(Self {
            level: std::env::var("BOUNCE_LEVEL").ok().map(PathBuf::from),
            seed: env_or("BOUNCE_SEED", 12345)?,
            max_frames: env_or("BOUNCE_MAX_FRAMES", 60 * FRAME_RATE as u64 * 10)?,
            snapshot_every: env_or("BOUNCE_SNAPSHOT_EVERY", 0)?,
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{key}={value:?} is not a valid value")),
        Err(_) => Ok(default),
    }
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let mut runner = RunnerConfig::from_env()?;
    if let Some(path) = std::env::args().nth(1) {
        runner.level = Some(PathBuf::from(path));
    }

    info!("Bounce Arena v{}", VERSION);
    info!("Frame Rate: {} Hz", FRAME_RATE);

    let config = SimConfig::default();
    let grid = match &runner.level {
        Some(path) => load_level(path, config.tile_size)
            .with_context(|| format!("loading {}", path.display()))?,
        None => {
            info!("No level given, using the demo level");
            demo_level(config.tile_size)?
        }
    };

    run(grid, &runner, &config)
}

/// Run a session and verify it by replay.
fn run(grid: TileGrid, runner: &RunnerConfig, config: &SimConfig) -> Result<()> {
    info!("=== Starting Session ===");
    info!("RNG Seed: {}", runner.seed);

    let initial = SimulationState::new(grid, runner.seed, config);
    if initial.agents.is_empty() {
        warn!("Level has no spawn markers; nothing will move");
    }
    for agent in &initial.agents {
        info!("{} ({:?}) at {}", agent.label(), agent.color, agent.position);
    }

    let mut state = initial.clone();
    let mut clock = FrameClock::new(config.frame_rate);
    let mut total_events = 0;

    for _ in 0..runner.max_frames {
        let result = step(&mut state, clock.now(), config)?;
        total_events += result.events.len();

        for event in &result.events {
            match &event.data {
                SimEventData::Kill { killer, victim } => {
                    info!("Frame {}: Square {} killed Square {}", event.frame, killer + 1, victim + 1);
                }
                SimEventData::MutualKill { first, second } => {
                    info!("Frame {}: Squares {} and {} killed each other", event.frame, first + 1, second + 1);
                }
                SimEventData::WinLatched { agent, latched_at } => {
                    info!("Frame {}: Square {} reached the finish at {:.2}s", event.frame, agent + 1, latched_at);
                }
                _ => {}
            }
        }

        if runner.snapshot_every > 0 && state.frame % runner.snapshot_every == 0 {
            println!("{}", FrameSnapshot::capture(&state, &result).to_json()?);
        }

        clock.advance();
        if result.session_ended {
            break;
        }
    }

    // Print final results
    info!("=== Session Results ===");
    match state.win {
        Some(latch) => info!("{}", latch.announcement()),
        None => info!("No winner after {} frames", state.frame),
    }
    info!("Alive: {}/{}", state.alive_count(), state.agents.len());
    info!("Total events: {}", total_events);

    let hash = state.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let (replay_final, _) = run_session(initial, config, state.frame)?;
    let replay_hash = replay_final.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash == replay_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
    } else {
        warn!("DETERMINISM FAILURE: Hashes differ!");
    }

    Ok(())
}

/// Built-in 32x24 level: walls, two power-ups, a teleporter and a finish.
fn demo_level(tile_size: f32) -> Result<TileGrid> {
    let mut codes = vec![vec![-1; 32]; 24];

    for col in 6..14 {
        codes[8][col] = 1;
    }
    for row in 12..20 {
        codes[row][20] = 1;
    }
    codes[4][24] = 1;
    codes[15][9] = 1;

    codes[10][4] = 2;
    codes[6][27] = 2;
    codes[18][6] = 3;
    codes[2][16] = 4;
    codes[21][28] = 5;

    codes[1][1] = 6;
    codes[1][30] = 6;
    codes[22][1] = 6;
    codes[12][15] = 6;

    TileGrid::from_codes(&codes, tile_size).context("building demo level")
}
