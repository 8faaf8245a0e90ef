//! Recording stub subsystems for driving the loop in tests

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use shard_core::{Result, ShardError, Vec3};

use crate::clock::{GameClock, ManualTimeSource};
use crate::config::LoopConfig;
use crate::event::{EventBus, GameEvent};
use crate::game_loop::{FrameOutcome, GameLoop, PlayerMode, Subsystems};
use crate::scheduler::ManualScheduler;
use crate::subsystem::{
    Camera, Physics, PlayerController, PlayerState, Presentation, Renderable, Renderer,
    ViewportSizer, World,
};
use crate::viewport::Viewport;

/// One observed subsystem call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    PostFx(Viewport),
    AddRenderable(String),
    Draw,
    Physics(f64),
    Player(f64),
    World {
        dt: f64,
        elapsed: f64,
        player: Option<PlayerState>,
    },
    ResetObstacles,
    FillObstacles,
    ClearGeometry,
    GenerateGeometry,
    Teleport(Vec3),
    CanJump(bool),
    SizerResize,
    CameraResize(Viewport),
    RendererResize(Viewport),
    ShowGameOver,
    HideGameOver,
    ReleasePointer,
}

impl Call {
    pub fn is_advance(&self) -> bool {
        matches!(self, Call::Physics(_) | Call::Player(_) | Call::World { .. })
    }
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

/// Player speed along +z used by [`StubPlayer`]
pub const STUB_PLAYER_SPEED: f32 = 5.0;

pub struct StubPhysics {
    log: CallLog,
    fail: Rc<Cell<bool>>,
}

impl Physics for StubPhysics {
    fn advance(&mut self, dt: f64) -> Result<()> {
        if self.fail.get() {
            return Err(ShardError::PhysicsError("malformed body state".into()));
        }
        self.log.borrow_mut().push(Call::Physics(dt));
        Ok(())
    }
}

pub struct StubPlayer {
    log: CallLog,
    state: PlayerState,
    spawn: Vec3,
    can_jump: bool,
    started: bool,
}

impl PlayerController for StubPlayer {
    fn advance(&mut self, dt: f64, camera: &mut dyn Camera, events: &mut EventBus) -> Result<()> {
        self.log.borrow_mut().push(Call::Player(dt));
        if !self.started {
            self.started = true;
            events.push(GameEvent::PlayerStarted);
        }
        self.state.velocity = Vec3::FORWARD * STUB_PLAYER_SPEED;
        self.state.position += self.state.velocity * dt as f32;
        self.state.grounded = self.can_jump;
        camera.set_position(self.state.position + Vec3::UP);
        camera.set_rotation(camera.rotation() + Vec3::new(0.0, 0.1, 0.0));
        Ok(())
    }

    fn state(&self) -> PlayerState {
        self.state
    }

    fn renderable(&self) -> Renderable {
        Renderable {
            name: "stub-player".into(),
            radius: 0.5,
        }
    }

    fn spawn_position(&self) -> Vec3 {
        self.spawn
    }

    fn set_spawn_position(&mut self, position: Vec3) {
        self.spawn = position;
    }

    fn teleport(&mut self, position: Vec3) {
        self.log.borrow_mut().push(Call::Teleport(position));
        self.state.position = position;
        self.state.velocity = Vec3::ZERO;
    }

    fn set_can_jump(&mut self, can_jump: bool) {
        self.log.borrow_mut().push(Call::CanJump(can_jump));
        self.can_jump = can_jump;
    }
}

pub struct StubWorld {
    log: CallLog,
    /// Events emitted on the next advance
    script: Rc<RefCell<Vec<GameEvent>>>,
}

impl World for StubWorld {
    fn advance(
        &mut self,
        dt: f64,
        elapsed: f64,
        player: Option<&PlayerState>,
        events: &mut EventBus,
    ) -> Result<()> {
        self.log.borrow_mut().push(Call::World {
            dt,
            elapsed,
            player: player.copied(),
        });
        for event in self.script.borrow_mut().drain(..) {
            events.push(event);
        }
        Ok(())
    }

    fn reset_obstacles(&mut self) {
        self.log.borrow_mut().push(Call::ResetObstacles);
    }

    fn fill_obstacles(&mut self) {
        self.log.borrow_mut().push(Call::FillObstacles);
    }

    fn clear_geometry(&mut self) {
        self.log.borrow_mut().push(Call::ClearGeometry);
    }

    fn generate_geometry(&mut self) {
        self.log.borrow_mut().push(Call::GenerateGeometry);
    }
}

pub struct StubRenderer {
    log: CallLog,
    fail_draw: Rc<Cell<bool>>,
}

impl Renderer for StubRenderer {
    fn init_post_fx(&mut self, viewport: &Viewport) -> Result<()> {
        self.log.borrow_mut().push(Call::PostFx(*viewport));
        Ok(())
    }

    fn add_renderable(&mut self, renderable: Renderable) {
        self.log.borrow_mut().push(Call::AddRenderable(renderable.name));
    }

    fn draw(&mut self, _camera: &dyn Camera) -> Result<()> {
        if self.fail_draw.get() {
            return Err(ShardError::RenderError("surface lost".into()));
        }
        self.log.borrow_mut().push(Call::Draw);
        Ok(())
    }

    fn resize(&mut self, viewport: &Viewport, _camera: &dyn Camera) -> Result<()> {
        self.log.borrow_mut().push(Call::RendererResize(*viewport));
        Ok(())
    }
}

pub struct StubCamera {
    log: CallLog,
    position: Vec3,
    rotation: Vec3,
    aspect: f32,
}

impl Camera for StubCamera {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn rotation(&self) -> Vec3 {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
    }

    fn resize(&mut self, viewport: &Viewport) {
        self.aspect = viewport.aspect();
        self.log.borrow_mut().push(Call::CameraResize(*viewport));
    }

    fn projection_matrix(&self) -> [[f32; 4]; 4] {
        [
            [1.0 / self.aspect, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, -1.0, -1.0],
            [0.0, 0.0, 0.0, 0.0],
        ]
    }
}

pub struct StubSizer {
    log: CallLog,
    /// Dimensions reported by the next resize
    surface: Rc<Cell<Viewport>>,
    current: Viewport,
}

impl ViewportSizer for StubSizer {
    fn resize(&mut self) -> Viewport {
        self.log.borrow_mut().push(Call::SizerResize);
        self.current = self.surface.get();
        self.current
    }

    fn viewport(&self) -> Viewport {
        self.current
    }
}

pub struct StubPresentation {
    log: CallLog,
}

impl Presentation for StubPresentation {
    fn show_game_over(&mut self) {
        self.log.borrow_mut().push(Call::ShowGameOver);
    }

    fn hide_game_over(&mut self) {
        self.log.borrow_mut().push(Call::HideGameOver);
    }

    fn release_pointer_capture(&mut self) {
        self.log.borrow_mut().push(Call::ReleasePointer);
    }
}

/// A loop wired to recording stubs, a manual clock, and a manual scheduler
pub struct Harness {
    pub game: GameLoop,
    pub log: CallLog,
    pub time: ManualTimeSource,
    pub scheduler: ManualScheduler,
    pub world_script: Rc<RefCell<Vec<GameEvent>>>,
    pub surface: Rc<Cell<Viewport>>,
    pub physics_fail: Rc<Cell<bool>>,
    pub draw_fail: Rc<Cell<bool>>,
}

pub const SPAWN: Vec3 = Vec3::new(0.0, 1.0, -2.0);

impl Harness {
    pub fn with_player() -> Self {
        Self::build(LoopConfig::default())
    }

    pub fn spectator() -> Self {
        Self::build(LoopConfig {
            player_enabled: false,
            ..LoopConfig::default()
        })
    }

    pub fn build(config: LoopConfig) -> Self {
        let log: CallLog = Rc::default();
        let time = ManualTimeSource::new();
        let scheduler = ManualScheduler::new();
        let world_script = Rc::new(RefCell::new(Vec::new()));
        let surface = Rc::new(Cell::new(Viewport::default()));
        let physics_fail = Rc::new(Cell::new(false));
        let draw_fail = Rc::new(Cell::new(false));

        let subsystems = Subsystems {
            physics: Box::new(StubPhysics {
                log: log.clone(),
                fail: physics_fail.clone(),
            }),
            world: Box::new(StubWorld {
                log: log.clone(),
                script: world_script.clone(),
            }),
            renderer: Box::new(StubRenderer {
                log: log.clone(),
                fail_draw: draw_fail.clone(),
            }),
            camera: Box::new(StubCamera {
                log: log.clone(),
                position: Vec3::ZERO,
                rotation: Vec3::new(0.0, config.default_yaw, 0.0),
                aspect: 16.0 / 9.0,
            }),
            sizer: Box::new(StubSizer {
                log: log.clone(),
                surface: surface.clone(),
                current: Viewport::default(),
            }),
            presentation: Box::new(StubPresentation { log: log.clone() }),
        };

        let mode = if config.player_enabled {
            PlayerMode::Controlled(Box::new(StubPlayer {
                log: log.clone(),
                state: PlayerState {
                    position: SPAWN,
                    ..PlayerState::default()
                },
                spawn: SPAWN,
                can_jump: true,
                started: false,
            }))
        } else {
            PlayerMode::spectator(&config)
        };

        let clock = GameClock::with_source(time.clone());
        let game = GameLoop::new(
            subsystems,
            mode,
            clock,
            Box::new(scheduler.clone()),
            &config,
        )
        .expect("stub subsystems never fail at startup");

        Self {
            game,
            log,
            time,
            scheduler,
            world_script,
            surface,
            physics_fail,
            draw_fail,
        }
    }

    /// Advance time by `step` and fire the pending frame
    pub fn frame(&mut self, step: Duration) -> Result<FrameOutcome> {
        self.time.advance(step);
        let handle = self
            .scheduler
            .pending()
            .expect("loop always has a pending frame while running");
        self.game.on_frame(handle)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.log.borrow_mut().clear();
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.log.borrow().iter().filter(|c| pred(*c)).count()
    }
}

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
