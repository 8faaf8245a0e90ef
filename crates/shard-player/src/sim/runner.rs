//! Runner character controller
//!
//! The runner moves forward along +z on its own once started. Steering and
//! jumping come either from a shared [`RunnerInput`] written by the host or
//! from a deterministic autopilot. Each move is a swept shape cast through
//! Rapier's `KinematicCharacterController`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rapier3d::control::{CharacterLength, KinematicCharacterController};
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};
use shard_core::{Result, ShardError, Vec3};
use shard_runtime::{Camera, EventBus, GameEvent, PlayerController, PlayerState, Renderable};

use super::physics::{from_vector, to_vector, PhysicsWorld};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Units per second along +z
    pub forward_speed: f32,
    /// Units per second along x at full steer
    pub strafe_speed: f32,
    pub jump_velocity: f32,
    pub radius: f32,
    /// Camera height above the body centre
    pub eye_height: f32,
    pub spawn: [f32; 3],
    /// Falling below this height loses the run
    pub fall_limit: f32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            forward_speed: 12.0,
            strafe_speed: 8.0,
            jump_velocity: 6.5,
            radius: 0.5,
            eye_height: 0.6,
            spawn: [0.0, 0.5, 0.0],
            fall_limit: -10.0,
        }
    }
}

/// Steering state shared between the host and the controller
#[derive(Debug, Default)]
pub struct RunnerInput {
    /// -1.0 (left) to 1.0 (right)
    pub steer: Cell<f32>,
    /// Jump requested; consumed by the next advance
    pub jump: Cell<bool>,
}

pub enum Steering {
    Manual(Rc<RunnerInput>),
    /// Weaves across the lane with amplitude `weave` and jumps every `jump_period` seconds
    Autopilot { jump_period: f64, weave: f32 },
}

/// Vertical speed kept while grounded so the controller keeps ground contact
const GROUND_STICK: f32 = -0.1;

pub struct RunnerController {
    physics: Rc<RefCell<PhysicsWorld>>,
    body: RigidBodyHandle,
    collider: ColliderHandle,
    controller: KinematicCharacterController,
    config: RunnerConfig,
    spawn: Vec3,
    can_jump: bool,
    grounded: bool,
    vertical_velocity: f32,
    /// Effective velocity over the last move
    velocity: Vec3,
    steering: Steering,
    started: bool,
    /// Seconds since the run started
    run_time: f64,
    last_jump: f64,
}

impl RunnerController {
    pub fn new(
        physics: Rc<RefCell<PhysicsWorld>>,
        config: RunnerConfig,
        steering: Steering,
    ) -> Self {
        let spawn = Vec3::from_array(config.spawn);
        let (body, collider) = {
            let mut world = physics.borrow_mut();
            let body = world.insert_rigid_body(
                RigidBodyBuilder::kinematic_position_based()
                    .translation(to_vector(spawn))
                    .build(),
            );
            let shape = ColliderBuilder::ball(config.radius).build();
            let collider = world.insert_collider_with_parent(shape, body);
            (body, collider)
        };

        let controller = KinematicCharacterController {
            offset: CharacterLength::Absolute(0.01),
            snap_to_ground: Some(CharacterLength::Absolute(0.2)),
            ..KinematicCharacterController::default()
        };

        Self {
            physics,
            body,
            collider,
            controller,
            config,
            spawn,
            can_jump: false,
            grounded: false,
            vertical_velocity: 0.0,
            velocity: Vec3::ZERO,
            steering,
            started: false,
            run_time: 0.0,
            last_jump: 0.0,
        }
    }

    pub fn can_jump(&self) -> bool {
        self.can_jump
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    /// Steer value and jump request for this frame
    fn sample_input(&self) -> (f32, bool) {
        match &self.steering {
            Steering::Manual(input) => (input.steer.get().clamp(-1.0, 1.0), input.jump.take()),
            Steering::Autopilot { jump_period, weave } => {
                let steer = (self.run_time * 0.8).sin() as f32 * weave;
                let jump = self.run_time - self.last_jump >= *jump_period;
                (steer, jump)
            }
        }
    }

    fn wants_to_move(&self) -> bool {
        match &self.steering {
            Steering::Manual(input) => input.steer.get() != 0.0 || input.jump.get(),
            Steering::Autopilot { .. } => true,
        }
    }

    fn position(&self) -> Vec3 {
        self.physics
            .borrow()
            .get_rigid_body(self.body)
            .map(|body| from_vector(body.translation()))
            .unwrap_or(self.spawn)
    }

    fn follow(&self, camera: &mut dyn Camera, position: Vec3) {
        camera.set_position(position + Vec3::UP * self.config.eye_height);
    }

    fn missing_body(&self) -> ShardError {
        ShardError::PlayerError(format!("runner body {:?} is not in the world", self.body))
    }
}

impl PlayerController for RunnerController {
    fn advance(&mut self, dt: f64, camera: &mut dyn Camera, events: &mut EventBus) -> Result<()> {
        if !self.started {
            if !self.wants_to_move() {
                self.follow(camera, self.position());
                return Ok(());
            }
            self.started = true;
            events.push(GameEvent::PlayerStarted);
        }
        if dt <= 0.0 {
            self.follow(camera, self.position());
            return Ok(());
        }

        self.run_time += dt;
        let (steer, jump) = self.sample_input();
        let step = dt as f32;

        let gravity = self.physics.borrow().gravity.y;
        if self.grounded {
            self.can_jump = true;
            self.vertical_velocity = GROUND_STICK;
        } else {
            self.vertical_velocity += gravity * step;
        }
        if jump && self.can_jump {
            self.vertical_velocity = self.config.jump_velocity;
            self.can_jump = false;
            self.last_jump = self.run_time;
        }

        let desired = vector![
            steer * self.config.strafe_speed * step,
            self.vertical_velocity * step,
            self.config.forward_speed * step
        ];

        let mut hits = Vec::new();
        let movement = {
            let physics = self.physics.borrow();
            let shape = physics
                .collider_set
                .get(self.collider)
                .ok_or_else(|| self.missing_body())?
                .shape();
            let body = physics
                .get_rigid_body(self.body)
                .ok_or_else(|| self.missing_body())?;
            self.controller.move_shape(
                step,
                &physics.rigid_body_set,
                &physics.collider_set,
                &physics.query_pipeline,
                shape,
                body.position(),
                desired,
                QueryFilter::default().exclude_rigid_body(self.body),
                |collision| hits.push(collision.handle),
            )
        };

        let position = {
            let mut physics = self.physics.borrow_mut();
            let body = physics
                .get_rigid_body_mut(self.body)
                .ok_or_else(|| self.missing_body())?;
            let next = *body.translation() + movement.translation;
            body.set_translation(next, true);
            physics.recenter_ground(next.z);
            physics.record_contacts(hits);
            from_vector(&next)
        };

        self.grounded = movement.grounded;
        self.velocity = from_vector(&(movement.translation / step));

        if position.y < self.config.fall_limit {
            events.push(GameEvent::PlayerLost);
        }
        self.follow(camera, position);
        Ok(())
    }

    fn state(&self) -> PlayerState {
        PlayerState {
            position: self.position(),
            velocity: self.velocity,
            grounded: self.grounded,
        }
    }

    fn renderable(&self) -> Renderable {
        Renderable {
            name: "runner".into(),
            radius: self.config.radius,
        }
    }

    fn spawn_position(&self) -> Vec3 {
        self.spawn
    }

    fn set_spawn_position(&mut self, position: Vec3) {
        self.spawn = position;
    }

    fn teleport(&mut self, position: Vec3) {
        if let Some(body) = self.physics.borrow_mut().get_rigid_body_mut(self.body) {
            body.set_translation(to_vector(position), true);
        }
        self.velocity = Vec3::ZERO;
        self.vertical_velocity = 0.0;
        self.grounded = false;
        self.run_time = 0.0;
        self.last_jump = 0.0;
        self.started = false;
    }

    fn set_can_jump(&mut self, can_jump: bool) {
        self.can_jump = can_jump;
    }
}
