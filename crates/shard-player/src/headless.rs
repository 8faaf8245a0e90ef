//! Deterministic windowless runner
//!
//! Fires a fixed number of frames at exactly 1/60 s apart through a manual
//! time source and scheduler. Useful for soak runs and for checking a course
//! config without opening a window.

use std::time::Duration;

use log::info;
use shard_core::{Result, ShardError};
use shard_runtime::{
    Camera, FrameOutcome, GameClock, ManualScheduler, ManualTimeSource, Viewport,
};

use crate::config::PlayerConfig;
use crate::setup::{build_game, HostParts};
use crate::sim::{FixedSizer, LogPresentation, LogSink, Steering};

pub const FRAME_STEP: Duration = Duration::from_nanos(16_666_667);

/// Autopilot jump interval for headless runs, in seconds
const AUTOPILOT_JUMP_PERIOD: f64 = 1.2;
/// Autopilot steer amplitude for headless runs
const AUTOPILOT_WEAVE: f32 = 0.6;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlessSummary {
    pub frames: u64,
    pub advanced: u64,
    pub frozen: u64,
    pub losses: u64,
    pub restarts: u64,
    /// Game time at the end of the run
    pub elapsed: f64,
    /// Camera z at the end of the run
    pub distance: f32,
}

/// Run `frames` frames. With `auto_restart`, a lost run restarts right away.
pub fn run_headless(
    config: &PlayerConfig,
    frames: u64,
    auto_restart: bool,
) -> Result<HeadlessSummary> {
    let time = ManualTimeSource::new();
    let scheduler = ManualScheduler::new();

    let parts = HostParts {
        sink: Box::new(LogSink { every: 60 }),
        sizer: Box::new(FixedSizer::new(Viewport::default())),
        presentation: Box::new(LogPresentation::default()),
        scheduler: Box::new(scheduler.clone()),
        clock: GameClock::with_source(time.clone()),
        steering: Steering::Autopilot {
            jump_period: AUTOPILOT_JUMP_PERIOD,
            weave: AUTOPILOT_WEAVE,
        },
    };
    let mut game = build_game(config, parts)?;
    let mut summary = HeadlessSummary::default();

    for _ in 0..frames {
        let handle = scheduler.pending().ok_or_else(|| {
            ShardError::RuntimeError("frame chain ended before the run finished".into())
        })?;
        time.advance(FRAME_STEP);

        let was_lost = game.lifecycle().has_lost();
        match game.on_frame(handle)? {
            FrameOutcome::Advanced { .. } => summary.advanced += 1,
            FrameOutcome::Frozen(_) => summary.frozen += 1,
            FrameOutcome::Stale => {}
        }
        summary.frames += 1;

        if game.lifecycle().has_lost() {
            if !was_lost {
                summary.losses += 1;
            }
            if auto_restart && game.restart().is_applied() {
                summary.restarts += 1;
            }
        }
    }

    summary.elapsed = game.clock().elapsed_time();
    summary.distance = game.camera().position().z;
    game.shutdown();

    info!(
        "headless run done: {} frames ({} advanced, {} frozen), {} losses, {:.2}s, z {:.1}",
        summary.frames,
        summary.advanced,
        summary.frozen,
        summary.losses,
        summary.elapsed,
        summary.distance
    );
    Ok(summary)
}
