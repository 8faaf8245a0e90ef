//! Player application implementing winit ApplicationHandler
//!
//! The window's redraw requests stand in for display-refresh callbacks: the
//! loop registers a frame by asking for a redraw and runs it when
//! `RedrawRequested` arrives.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use log::{error, info};
use shard_core::ShardError;
use shard_runtime::{
    FrameHandle, FrameScheduler, GameClock, GameLoop, Presentation, Viewport, ViewportSizer,
};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

use crate::config::PlayerConfig;
use crate::setup::{build_game, HostParts};
use crate::sim::{FrameReport, ReportSink, RunnerInput, Steering};

const TITLE: &str = "Shard";

/// Registers frames as window redraw requests
struct WindowScheduler {
    window: Arc<Window>,
    next_id: u64,
}

impl FrameScheduler for WindowScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        self.window.request_redraw();
        FrameHandle::new(self.next_id)
    }

    // A requested redraw cannot be withdrawn; the loop drops the handle so the
    // callback, when it arrives, finds nothing pending.
    fn cancel_frame(&mut self, _handle: FrameHandle) {}
}

/// Measures the window's inner size in logical pixels
struct WindowSizer {
    window: Arc<Window>,
    current: Viewport,
}

impl WindowSizer {
    fn new(window: Arc<Window>) -> Self {
        let current = measure(&window);
        Self { window, current }
    }
}

fn measure(window: &Window) -> Viewport {
    let scale = window.scale_factor();
    let size = window.inner_size().to_logical::<f64>(scale);
    Viewport::new(size.width.round() as u32, size.height.round() as u32, scale)
}

impl ViewportSizer for WindowSizer {
    fn resize(&mut self) -> Viewport {
        self.current = measure(&self.window);
        self.current
    }

    fn viewport(&self) -> Viewport {
        self.current
    }
}

struct WindowPresentation {
    window: Arc<Window>,
    game_over: Rc<Cell<bool>>,
}

impl Presentation for WindowPresentation {
    fn show_game_over(&mut self) {
        self.game_over.set(true);
        self.window
            .set_title(&format!("{TITLE} | GAME OVER | R to restart"));
    }

    fn hide_game_over(&mut self) {
        self.game_over.set(false);
        self.window.set_title(TITLE);
    }

    fn release_pointer_capture(&mut self) {
        release_cursor(&self.window);
    }
}

/// Shows distance travelled in the window title
struct TitleSink {
    window: Arc<Window>,
    game_over: Rc<Cell<bool>>,
}

impl ReportSink for TitleSink {
    fn report(&mut self, report: &FrameReport) {
        if report.frame % 30 == 0 && !self.game_over.get() {
            self.window.set_title(&format!(
                "{TITLE} | {:.0} m",
                report.camera_position.z.max(0.0)
            ));
        }
    }
}

fn capture_cursor(window: &Window) {
    // Try confined first, then locked
    let _ = window
        .set_cursor_grab(CursorGrabMode::Confined)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
    window.set_cursor_visible(false);
}

fn release_cursor(window: &Window) {
    let _ = window.set_cursor_grab(CursorGrabMode::None);
    window.set_cursor_visible(true);
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum KeyAction {
    TogglePause,
    Restart,
    SteerLeft,
    SteerRight,
    Jump,
}

fn key_action(key: KeyCode) -> Option<KeyAction> {
    match key {
        KeyCode::KeyP | KeyCode::Escape => Some(KeyAction::TogglePause),
        KeyCode::KeyR => Some(KeyAction::Restart),
        KeyCode::ArrowLeft | KeyCode::KeyA => Some(KeyAction::SteerLeft),
        KeyCode::ArrowRight | KeyCode::KeyD => Some(KeyAction::SteerRight),
        KeyCode::Space | KeyCode::ArrowUp | KeyCode::KeyW => Some(KeyAction::Jump),
        _ => None,
    }
}

/// Steer value for the held keys. Facing +z, screen-right is -x.
fn steer_value(left: bool, right: bool) -> f32 {
    match (left, right) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}

pub struct PlayerApp {
    config: PlayerConfig,
    window: Option<Arc<Window>>,
    game: Option<GameLoop>,
    input: Rc<RunnerInput>,
    left_held: bool,
    right_held: bool,
    error: Option<ShardError>,
}

impl PlayerApp {
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            config,
            window: None,
            game: None,
            input: Rc::new(RunnerInput::default()),
            left_held: false,
            right_held: false,
            error: None,
        }
    }

    /// The error that stopped the game, if any
    pub fn take_error(&mut self) -> Option<ShardError> {
        self.error.take()
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ShardError> {
        let window_attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(LogicalSize::new(1280.0, 720.0));
        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .map_err(|e| ShardError::RuntimeError(format!("failed to create window: {e}")))?,
        );

        let game_over = Rc::new(Cell::new(false));
        let parts = HostParts {
            sink: Box::new(TitleSink {
                window: window.clone(),
                game_over: game_over.clone(),
            }),
            sizer: Box::new(WindowSizer::new(window.clone())),
            presentation: Box::new(WindowPresentation {
                window: window.clone(),
                game_over,
            }),
            scheduler: Box::new(WindowScheduler {
                window: window.clone(),
                next_id: 0,
            }),
            clock: GameClock::new(),
            steering: Steering::Manual(self.input.clone()),
        };

        self.game = Some(build_game(&self.config, parts)?);
        capture_cursor(&window);
        self.window = Some(window);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: ShardError) {
        error!("{err}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool, repeat: bool) {
        let Some(action) = key_action(key) else {
            return;
        };
        let Some(game) = self.game.as_mut() else {
            return;
        };

        match action {
            KeyAction::SteerLeft => self.left_held = pressed,
            KeyAction::SteerRight => self.right_held = pressed,
            KeyAction::Jump if pressed => self.input.jump.set(true),
            KeyAction::TogglePause if pressed && !repeat => {
                let _ = game.toggle_pause();
            }
            KeyAction::Restart if pressed && !repeat => {
                if game.restart().is_applied() {
                    if let Some(window) = &self.window {
                        capture_cursor(window);
                    }
                }
            }
            _ => {}
        }
        self.input
            .steer
            .set(steer_value(self.left_held, self.right_held));
    }
}

impl ApplicationHandler for PlayerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.initialize(event_loop) {
                self.fail(event_loop, err);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(game) = self.game.as_mut() {
                    game.shutdown();
                }
                info!("window closed");
                event_loop.exit();
            }

            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(game) = self.game.as_mut() {
                    if let Err(err) = game.resize() {
                        self.fail(event_loop, err);
                    }
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    let pressed = event.state == ElementState::Pressed;
                    self.handle_key(key_code, pressed, event.repeat);
                }
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if let Some(window) = &self.window {
                    capture_cursor(window);
                }
            }

            WindowEvent::RedrawRequested => {
                let Some(game) = self.game.as_mut() else {
                    return;
                };
                let Some(handle) = game.pending_frame() else {
                    return;
                };
                if let Err(err) = game.on_frame(handle) {
                    self.fail(event_loop, err);
                }
            }

            _ => {}
        }
    }
}
