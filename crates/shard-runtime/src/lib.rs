//! Shard Runtime - Game loop infrastructure
//!
//! Provides the per-frame control loop and the pieces it is built from:
//! - `GameClock` - elapsed/delta time with freeze and lossless resume
//! - `LifecycleState` - started/lost/paused flags and their transitions
//! - `FrameScheduler` - registration of the next display-refresh callback
//! - `GameEvent` / `EventBus` - subsystem requests to the lifecycle
//! - Subsystem contracts (`Physics`, `PlayerController`, `World`, `Renderer`,
//!   `Camera`, `ViewportSizer`, `Presentation`)
//! - `GameLoop` - drives all of the above in a fixed order every frame

mod clock;
mod config;
mod event;
mod game_loop;
mod lifecycle;
mod scheduler;
mod subsystem;
mod viewport;

#[cfg(test)]
mod testing;

pub use clock::{GameClock, ManualTimeSource, SystemTimeSource, TimeSource};
pub use config::LoopConfig;
pub use event::{EventBus, GameEvent};
pub use game_loop::{FrameOutcome, GameLoop, PlayerMode, Subsystems};
pub use lifecycle::{LifecycleState, Phase, Transition};
pub use scheduler::{FrameHandle, FrameScheduler, ManualScheduler};
pub use subsystem::{
    Camera, Physics, PlayerController, PlayerState, Presentation, Renderable, Renderer,
    ViewportSizer, World,
};
pub use viewport::{Viewport, MAX_PIXEL_RATIO};
