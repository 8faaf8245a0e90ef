//! Game loop: drives the subsystems once per scheduled frame.
//!
//! Every frame the loop re-registers itself, draws, and then either freezes
//! the clock (paused or lost) or advances physics, the player (or the
//! spectator camera), and the world, in that order. Lifecycle actions and
//! resizes come in from the host between frames.

use log::{debug, error, info};
use shard_core::{Result, Vec3};

use crate::clock::GameClock;
use crate::config::LoopConfig;
use crate::event::{EventBus, GameEvent};
use crate::lifecycle::{LifecycleState, Phase, Transition};
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::subsystem::{
    Camera, Physics, PlayerController, Presentation, Renderer, ViewportSizer, World,
};
use crate::viewport::Viewport;

/// The fixed set of subsystems a loop drives for its whole lifetime
pub struct Subsystems {
    pub physics: Box<dyn Physics>,
    pub world: Box<dyn World>,
    pub renderer: Box<dyn Renderer>,
    pub camera: Box<dyn Camera>,
    pub sizer: Box<dyn ViewportSizer>,
    pub presentation: Box<dyn Presentation>,
}

/// How the loop moves the view each active frame, chosen once at startup
pub enum PlayerMode {
    /// A controller advances after physics and its state feeds the world.
    Controlled(Box<dyn PlayerController>),
    /// No player: the camera drifts along +z and the world runs without player context.
    Spectator { drift_speed: f32 },
}

impl PlayerMode {
    pub fn spectator(config: &LoopConfig) -> Self {
        PlayerMode::Spectator {
            drift_speed: config.spectator_drift_speed,
        }
    }
}

/// What a call to [`GameLoop::on_frame`] did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// Simulation advanced by `delta` seconds; `elapsed` is total game time.
    Advanced { delta: f64, elapsed: f64 },
    /// Drawn only; simulation held by the given phase.
    Frozen(Phase),
    /// The handle was not the pending registration; nothing ran.
    Stale,
}

pub struct GameLoop {
    subsystems: Subsystems,
    mode: PlayerMode,
    lifecycle: LifecycleState,
    clock: GameClock,
    scheduler: Box<dyn FrameScheduler>,
    pending: Option<FrameHandle>,
    events: EventBus,
    default_rotation: Vec3,
    frames: u64,
}

impl GameLoop {
    /// Wire up the subsystems, start the clock, and register the first frame.
    pub fn new(
        mut subsystems: Subsystems,
        mode: PlayerMode,
        mut clock: GameClock,
        scheduler: Box<dyn FrameScheduler>,
        config: &LoopConfig,
    ) -> Result<Self> {
        if config.post_fx {
            let viewport = subsystems.sizer.viewport();
            subsystems.renderer.init_post_fx(&viewport)?;
        }
        if let PlayerMode::Controlled(player) = &mode {
            subsystems.renderer.add_renderable(player.renderable());
        }

        clock.set_max_delta(config.delta_clamp());
        clock.start();

        let mut game = Self {
            subsystems,
            mode,
            lifecycle: LifecycleState::new(),
            clock,
            scheduler,
            pending: None,
            events: EventBus::new(),
            default_rotation: Vec3::new(0.0, config.default_yaw, 0.0),
            frames: 0,
        };
        game.pending = Some(game.scheduler.request_frame());

        info!(
            "game loop ready ({} mode, post-fx {})",
            if game.has_player() { "player" } else { "spectator" },
            if config.post_fx { "on" } else { "off" }
        );
        Ok(game)
    }

    pub fn lifecycle(&self) -> &LifecycleState {
        &self.lifecycle
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn camera(&self) -> &dyn Camera {
        self.subsystems.camera.as_ref()
    }

    pub fn player(&self) -> Option<&dyn PlayerController> {
        match &self.mode {
            PlayerMode::Controlled(player) => Some(player.as_ref()),
            PlayerMode::Spectator { .. } => None,
        }
    }

    pub fn has_player(&self) -> bool {
        matches!(self.mode, PlayerMode::Controlled(_))
    }

    /// The registration the host should fire next, or `None` once halted
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn is_halted(&self) -> bool {
        self.pending.is_none()
    }

    /// Frames run so far (stale callbacks excluded)
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Run one frame for the callback registered as `handle`.
    ///
    /// A subsystem error cancels the next registration and is returned as is.
    pub fn on_frame(&mut self, handle: FrameHandle) -> Result<FrameOutcome> {
        if self.pending != Some(handle) {
            debug!("ignoring stale frame callback {}", handle.id());
            return Ok(FrameOutcome::Stale);
        }

        self.pending = Some(self.scheduler.request_frame());
        self.frames += 1;

        self.step().inspect_err(|err| {
            error!("frame {} failed, halting loop: {err}", self.frames);
            self.shutdown();
        })
    }

    fn step(&mut self) -> Result<FrameOutcome> {
        self.subsystems
            .renderer
            .draw(self.subsystems.camera.as_ref())?;

        if self.lifecycle.is_frozen() {
            self.clock.stop();
            return Ok(FrameOutcome::Frozen(self.lifecycle.phase()));
        }

        // First active frame after a pause: new sample point, elapsed kept
        self.clock.resume();
        let delta = self.clock.delta();
        let elapsed = self.clock.elapsed_time();

        self.subsystems.physics.advance(delta)?;

        match &mut self.mode {
            PlayerMode::Controlled(player) => {
                player.advance(delta, self.subsystems.camera.as_mut(), &mut self.events)?;
                let state = player.state();
                self.subsystems
                    .world
                    .advance(delta, elapsed, Some(&state), &mut self.events)?;
            }
            PlayerMode::Spectator { drift_speed } => {
                let mut position = self.subsystems.camera.position();
                position.z += delta as f32 * *drift_speed;
                self.subsystems.camera.set_position(position);
                self.subsystems
                    .world
                    .advance(delta, elapsed, None, &mut self.events)?;
            }
        }

        self.apply_events();
        Ok(FrameOutcome::Advanced { delta, elapsed })
    }

    fn apply_events(&mut self) {
        for event in self.events.drain() {
            match event {
                GameEvent::PlayerStarted => {
                    if self.lifecycle.mark_started().is_applied() {
                        info!("run started");
                    }
                }
                GameEvent::PlayerLost => {
                    let _ = self.lose();
                }
            }
        }
    }

    /// End the run: show the game-over surface and release pointer capture.
    ///
    /// Repeated calls are ignored, so the signals fire once per loss.
    pub fn lose(&mut self) -> Transition {
        let transition = self.lifecycle.lose();
        if transition.is_applied() {
            info!("run lost at {:.2}s", self.clock.elapsed_time());
            self.subsystems.presentation.show_game_over();
            self.subsystems.presentation.release_pointer_capture();
        }
        transition
    }

    /// Pause or unpause. Ignored while lost.
    pub fn toggle_pause(&mut self) -> Transition {
        let transition = self.lifecycle.toggle_pause();
        match transition {
            Transition::Applied => debug!("paused: {}", self.lifecycle.is_paused()),
            Transition::Ignored => debug!("pause toggle ignored while lost"),
        }
        transition
    }

    /// Reset the run after a loss. Ignored unless lost.
    ///
    /// The world is fully rebuilt before the flags clear and the clock
    /// restarts, so no frame sees a half-reset world with a live delta.
    pub fn restart(&mut self) -> Transition {
        if !self.lifecycle.has_lost() {
            debug!("restart ignored: run not lost");
            return Transition::Ignored;
        }

        if let PlayerMode::Controlled(player) = &mut self.mode {
            let spawn = player.spawn_position();
            player.teleport(spawn);
            player.set_can_jump(false);
        }
        self.subsystems.camera.set_rotation(self.default_rotation);

        let world = &mut self.subsystems.world;
        world.reset_obstacles();
        world.fill_obstacles();
        world.clear_geometry();
        world.generate_geometry();

        let transition = self.lifecycle.restart();
        self.clock.stop();
        self.clock.start();
        self.subsystems.presentation.hide_game_over();

        info!("run restarted");
        transition
    }

    /// Propagate a display resize: sizer, then camera, then renderer.
    pub fn resize(&mut self) -> Result<Viewport> {
        let viewport = self.subsystems.sizer.resize();
        self.subsystems.camera.resize(&viewport);
        self.subsystems
            .renderer
            .resize(&viewport, self.subsystems.camera.as_ref())?;

        info!(
            "resized to {}x{} @{}x",
            viewport.width, viewport.height, viewport.pixel_ratio
        );
        Ok(viewport)
    }

    /// Cancel the pending registration, ending the frame chain.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }
}
