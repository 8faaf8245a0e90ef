//! Shard Player - runner game binary
//!
//! Usage:
//!   shard-player [--config <shard.toml>] [--headless] [--frames N] [--spectator] [--seed N]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use shard_player::{run_headless, PlayerApp, PlayerConfig};
use winit::event_loop::{ControlFlow, EventLoop};

#[derive(Parser)]
#[command(name = "shard-player")]
#[command(about = "Shard runner - dodge the obstacles, press R after a crash")]
struct Args {
    /// Path to a TOML config with [loop], [course] and [runner] tables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run without a window at a fixed 60 Hz
    #[arg(long)]
    headless: bool,

    /// Frames to run in headless mode
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Restart immediately after a loss in headless mode
    #[arg(long)]
    auto_restart: bool,

    /// No player: the camera drifts down the course
    #[arg(long)]
    spectator: bool,

    /// Override the course seed
    #[arg(long)]
    seed: Option<u32>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PlayerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PlayerConfig::default(),
    };
    if args.spectator {
        config.game.player_enabled = false;
    }
    if let Some(seed) = args.seed {
        config.course.seed = seed;
    }

    if args.headless {
        let summary = run_headless(&config, args.frames, args.auto_restart)
            .context("Headless run failed")?;
        println!(
            "{} frames, {} losses, {:.2}s game time, reached z = {:.1}",
            summary.frames, summary.losses, summary.elapsed, summary.distance
        );
        return Ok(());
    }

    println!("Controls:");
    println!("  Left/Right, A/D - Steer");
    println!("  Space           - Jump");
    println!("  P, Escape       - Pause");
    println!("  R               - Restart after a crash");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = PlayerApp::new(config);
    event_loop.run_app(&mut app)?;

    if let Some(err) = app.take_error() {
        return Err(err).context("Game loop halted");
    }
    Ok(())
}
