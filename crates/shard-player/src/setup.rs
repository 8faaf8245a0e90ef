//! Builds a game loop from config plus host-specific parts

use log::info;
use shard_core::{Result, Vec3};
use shard_runtime::{
    Camera, FrameScheduler, GameClock, GameLoop, PlayerMode, Presentation, Subsystems,
    ViewportSizer,
};

use crate::config::PlayerConfig;
use crate::sim::{
    Ground, ObstacleCourse, PerspectiveCamera, PhysicsWorld, ReportSink, RunnerController,
    SharedPhysics, StatsRenderer, Steering,
};

pub const GRAVITY: f32 = 9.81;

/// Pieces that differ between the windowed and headless hosts
pub struct HostParts {
    pub sink: Box<dyn ReportSink>,
    pub sizer: Box<dyn ViewportSizer>,
    pub presentation: Box<dyn Presentation>,
    pub scheduler: Box<dyn FrameScheduler>,
    pub clock: GameClock,
    pub steering: Steering,
}

pub fn build_game(config: &PlayerConfig, parts: HostParts) -> Result<GameLoop> {
    let viewport = parts.sizer.viewport();

    let physics = SharedPhysics::new(PhysicsWorld::new(
        GRAVITY,
        Ground {
            height: 0.0,
            half_width: config.course.lane_half_width,
        },
    ));

    let mut camera = PerspectiveCamera::new(&viewport, config.game.default_yaw);
    camera.set_position(
        Vec3::from_array(config.runner.spawn) + Vec3::UP * config.runner.eye_height,
    );

    let mode = if config.game.player_enabled {
        PlayerMode::Controlled(Box::new(RunnerController::new(
            physics.handle(),
            config.runner.clone(),
            parts.steering,
        )))
    } else {
        PlayerMode::spectator(&config.game)
    };

    let world = ObstacleCourse::new(config.course.clone(), physics.handle());
    info!(
        "course ready: {} obstacles, {} shards, seed {}",
        world.obstacles().len(),
        world.shards().len(),
        config.course.seed
    );

    let subsystems = Subsystems {
        physics: Box::new(physics),
        world: Box::new(world),
        renderer: Box::new(StatsRenderer::new(viewport, parts.sink)),
        camera: Box::new(camera),
        sizer: parts.sizer,
        presentation: parts.presentation,
    };

    GameLoop::new(subsystems, mode, parts.clock, parts.scheduler, &config.game)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{FixedSizer, LogPresentation, LogSink};
    use shard_runtime::{ManualScheduler, Viewport};

    fn parts(scheduler: &ManualScheduler) -> HostParts {
        HostParts {
            sink: Box::new(LogSink { every: 0 }),
            sizer: Box::new(FixedSizer::new(Viewport::default())),
            presentation: Box::new(LogPresentation::default()),
            scheduler: Box::new(scheduler.clone()),
            clock: GameClock::new(),
            steering: Steering::Autopilot {
                jump_period: 1.0,
                weave: 0.6,
            },
        }
    }

    #[test]
    fn builds_player_game_with_first_frame_pending() {
        let scheduler = ManualScheduler::new();
        let game = build_game(&PlayerConfig::default(), parts(&scheduler)).unwrap();

        assert!(game.has_player());
        assert_eq!(game.pending_frame(), scheduler.pending());
        assert!(game.clock().is_running());
        assert!(!game.lifecycle().has_started());
    }

    #[test]
    fn player_disabled_builds_spectator() {
        let mut config = PlayerConfig::default();
        config.game.player_enabled = false;
        let scheduler = ManualScheduler::new();
        let game = build_game(&config, parts(&scheduler)).unwrap();

        assert!(!game.has_player());
        assert!(game.player().is_none());
    }

    #[test]
    fn camera_starts_at_eye_height_facing_the_course() {
        let scheduler = ManualScheduler::new();
        let game = build_game(&PlayerConfig::default(), parts(&scheduler)).unwrap();

        assert!((game.camera().position().y - 1.1).abs() < 1e-5);
        assert!((game.camera().rotation().y - std::f32::consts::PI).abs() < 1e-6);
    }
}
