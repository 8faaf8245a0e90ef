//! Contracts for the subsystems driven by the game loop
//!
//! The loop owns one instance of each and calls them in a fixed order every
//! active frame: physics, then player, then world. Internals are up to the
//! implementor; a call either succeeds or returns an error that halts the
//! frame chain.

use crate::event::EventBus;
use crate::viewport::Viewport;
use shard_core::{Result, Vec3};

/// Snapshot of the player after its advancement call this frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub grounded: bool,
}

/// Something the renderer should draw, registered once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct Renderable {
    pub name: String,
    /// Bounding radius in world units
    pub radius: f32,
}

/// Rigid-body simulation
pub trait Physics {
    /// Step the simulation by `dt` seconds
    fn advance(&mut self, dt: f64) -> Result<()>;
}

/// Player character controller
pub trait PlayerController {
    /// Advance the controller by `dt` seconds. May move or turn the camera.
    fn advance(&mut self, dt: f64, camera: &mut dyn Camera, events: &mut EventBus) -> Result<()>;

    /// Position, velocity and grounded state as of the last advance
    fn state(&self) -> PlayerState;

    /// Representation added to the renderer's scene at startup
    fn renderable(&self) -> Renderable;

    fn spawn_position(&self) -> Vec3;

    fn set_spawn_position(&mut self, position: Vec3);

    /// Move instantly, clearing any velocity
    fn teleport(&mut self, position: Vec3);

    /// Set or clear the grounded/can-jump latch
    fn set_can_jump(&mut self, can_jump: bool);
}

/// Procedurally maintained world: obstacle pool plus decorative geometry
pub trait World {
    /// Advance by `dt` seconds at total game time `elapsed`.
    ///
    /// `player` is the state the controller reported this same frame, or
    /// `None` in spectator mode.
    fn advance(
        &mut self,
        dt: f64,
        elapsed: f64,
        player: Option<&PlayerState>,
        events: &mut EventBus,
    ) -> Result<()>;

    /// Return the obstacle pool to its initial configuration
    fn reset_obstacles(&mut self);

    /// Populate the obstacle pool
    fn fill_obstacles(&mut self);

    /// Remove every procedurally placed piece of geometry
    fn clear_geometry(&mut self);

    /// Place a fresh set of geometry
    fn generate_geometry(&mut self);
}

/// Draws the scene
pub trait Renderer {
    /// One-time post-processing setup
    fn init_post_fx(&mut self, _viewport: &Viewport) -> Result<()> {
        Ok(())
    }

    /// Add a renderable to the scene
    fn add_renderable(&mut self, _renderable: Renderable) {}

    /// Draw the current state. Called every frame, frozen or not.
    fn draw(&mut self, camera: &dyn Camera) -> Result<()>;

    /// Resize draw targets. `camera` already carries the new projection.
    fn resize(&mut self, viewport: &Viewport, camera: &dyn Camera) -> Result<()>;
}

/// View into the scene
pub trait Camera {
    fn position(&self) -> Vec3;

    fn set_position(&mut self, position: Vec3);

    /// Euler rotation in radians (x = pitch, y = yaw, z = roll)
    fn rotation(&self) -> Vec3;

    fn set_rotation(&mut self, rotation: Vec3);

    /// Recompute the projection for the viewport's aspect ratio
    fn resize(&mut self, viewport: &Viewport);

    /// Projection matrix, column-major
    fn projection_matrix(&self) -> [[f32; 4]; 4];
}

/// Measures the display surface
pub trait ViewportSizer {
    /// Re-measure the surface and return the new viewport
    fn resize(&mut self) -> Viewport;

    /// Last measured viewport
    fn viewport(&self) -> Viewport;
}

/// Environment-facing signals raised by lifecycle transitions
pub trait Presentation {
    fn show_game_over(&mut self);

    fn hide_game_over(&mut self);

    /// Release any exclusive pointer capture
    fn release_pointer_capture(&mut self);
}
