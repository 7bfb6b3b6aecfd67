//! Asteroid Field headless runner
//!
//! Drives the simulation with the attract-mode autopilot at a fixed frame
//! rate and reports what happened. Handy for tuning configs without a renderer.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use asteroid_field::GameConfig;
use asteroid_field::consts::MAX_FRAME_DT;
use asteroid_field::sim::{
    Destroyed, GameState, ScoreReason, Spawned, TickEvents, TickInput, autopilot_input, tick,
};

#[derive(Debug, Parser)]
#[command(name = "asteroid-field", about = "Run the asteroid field simulation headless")]
struct Cli {
    /// JSON config file (defaults to built-in tuning)
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed for the asteroid field
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Simulated frame rate
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Print the effective config as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Print the final frame snapshot as JSON
    #[arg(long)]
    snapshot: bool,
}

/// Running totals for the end-of-run summary
#[derive(Debug, Default)]
struct RunStats {
    shots: u64,
    dry_fires: u64,
    kills: u64,
    deaths: u64,
    warps: u64,
}

impl RunStats {
    fn record(&mut self, events: &TickEvents) {
        self.dry_fires += u64::from(events.shots_dropped);
        for spawned in &events.spawned {
            match spawned {
                Spawned::Bullet { .. } => self.shots += 1,
                Spawned::Ship => self.warps += 1,
            }
        }
        for destroyed in &events.destroyed {
            if let Destroyed::Ship { .. } = destroyed {
                self.deaths += 1;
            }
        }
        self.kills += events
            .score_changes
            .iter()
            .filter(|c| c.reason == ScoreReason::Kill)
            .count() as u64;
    }
}

/// Game instance holding all state
struct Game {
    state: GameState,
    input: TickInput,
    stats: RunStats,
}

impl Game {
    fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            state: GameState::new(config, seed),
            input: TickInput::default(),
            stats: RunStats::default(),
        }
    }

    /// Run one frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(MAX_FRAME_DT);
        self.input = autopilot_input(&self.state, &self.input);
        let events = tick(&mut self.state, &self.input, dt);

        for change in &events.score_changes {
            log::debug!(
                "Tick {}: {:?} {:+}",
                self.state.time_ticks(),
                change.reason,
                change.delta
            );
        }
        self.stats.record(&events);

        if !events.destroyed.is_empty() && self.state.asteroids().active_count() == 0 {
            log::info!(
                "Field cleared at tick {}, rolling a new one",
                self.state.time_ticks()
            );
            self.state.reset_asteroids();
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };

    if cli.dump_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    anyhow::ensure!(
        cli.fps.is_finite() && cli.fps > 0.0,
        "--fps must be positive, got {}",
        cli.fps
    );
    let dt = 1.0 / cli.fps;

    log::info!(
        "Asteroid Field starting: seed={}, ticks={}, dt={:.4}, shot accounting={}",
        cli.seed,
        cli.ticks,
        dt,
        config.scoring.shot_accounting.as_str()
    );

    let mut game = Game::new(config, cli.seed);
    for _ in 0..cli.ticks {
        game.update(dt);
    }

    let stats = &game.stats;
    println!(
        "ticks={} score={} shots={} dry_fires={} kills={} deaths={} warps={}",
        game.state.time_ticks(),
        game.state.score(),
        stats.shots,
        stats.dry_fires,
        stats.kills,
        stats.deaths,
        stats.warps
    );

    if cli.snapshot {
        let json = serde_json::to_string_pretty(&game.state.snapshot())
            .context("failed to serialize snapshot")?;
        println!("{json}");
    }

    Ok(())
}
