//! Physics world wrapping Rapier 3D
//!
//! Holds the ground strip, the runner's kinematic body and the obstacle
//! colliders. The runner and the course share one world through
//! `Rc<RefCell<_>>`; the loop steps it through [`SharedPhysics`].

use std::cell::RefCell;
use std::rc::Rc;

use rapier3d::prelude::*;
use shard_core::{Result, ShardError, Vec3};
use shard_runtime::Physics;

/// Thickness of the ground slab below its top surface
const GROUND_THICKNESS: f32 = 0.5;
/// Half length of the ground slab along z. The slab is re-centred under the runner.
const GROUND_HALF_LENGTH: f32 = 200.0;

/// Ground surface: a strip centred on x = 0 running along z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ground {
    /// y of the top surface
    pub height: f32,
    pub half_width: f32,
}

pub fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

pub fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Wraps Rapier's physics pipeline and body/collider sets
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,

    ground: Ground,
    ground_body: RigidBodyHandle,
    /// Colliders the character controller touched since the last step
    contacts: Vec<ColliderHandle>,
}

impl PhysicsWorld {
    /// Create a world with gravity `-gravity` along y and a fixed ground slab
    pub fn new(gravity: f32, ground: Ground) -> Self {
        let mut world = Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: vector![0.0, -gravity, 0.0],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            ground,
            ground_body: RigidBodyHandle::invalid(),
            contacts: Vec::new(),
        };

        let slab = RigidBodyBuilder::fixed()
            .translation(vector![0.0, ground.height - GROUND_THICKNESS, 0.0])
            .build();
        world.ground_body = world.insert_rigid_body(slab);
        let extent = vector![ground.half_width, GROUND_THICKNESS, GROUND_HALF_LENGTH];
        let collider = ColliderBuilder::cuboid(extent.x, extent.y, extent.z).build();
        world.insert_collider_with_parent(collider, world.ground_body);
        world
    }

    /// Step the simulation by `dt` seconds. A zero step leaves the world untouched.
    pub fn step(&mut self, dt: f64) -> Result<()> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(ShardError::PhysicsError(format!("invalid timestep {dt}")));
        }
        self.contacts.clear();
        if dt == 0.0 {
            return Ok(());
        }

        self.integration_parameters.dt = dt as f32;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );

        if let Some((_, body)) = self
            .rigid_body_set
            .iter()
            .find(|(_, body)| !body.translation().iter().all(|c| c.is_finite()))
        {
            return Err(ShardError::PhysicsError(format!(
                "body left the finite range at {:?}",
                body.translation()
            )));
        }

        Ok(())
    }

    /// Move the ground slab along z so it stays under `z`
    pub fn recenter_ground(&mut self, z: f32) {
        let y = self.ground.height - GROUND_THICKNESS;
        if let Some(slab) = self.rigid_body_set.get_mut(self.ground_body) {
            slab.set_translation(vector![0.0, y, z], false);
        }
    }

    /// Record colliders hit by a character move during this step
    pub fn record_contacts(&mut self, hits: impl IntoIterator<Item = ColliderHandle>) {
        self.contacts.extend(hits);
    }

    pub fn contacts(&self) -> &[ColliderHandle] {
        &self.contacts
    }

    /// Insert a rigid body and return its handle
    pub fn insert_rigid_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.rigid_body_set.insert(body)
    }

    /// Insert a collider attached to a rigid body
    pub fn insert_collider_with_parent(
        &mut self,
        collider: Collider,
        parent: RigidBodyHandle,
    ) -> ColliderHandle {
        self.collider_set
            .insert_with_parent(collider, parent, &mut self.rigid_body_set)
    }

    /// Remove a rigid body and its attached colliders
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }

    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    pub fn get_rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }
}

/// Shared handle to a [`PhysicsWorld`], driven by the loop as its `Physics`
#[derive(Clone)]
pub struct SharedPhysics(Rc<RefCell<PhysicsWorld>>);

impl SharedPhysics {
    pub fn new(world: PhysicsWorld) -> Self {
        Self(Rc::new(RefCell::new(world)))
    }

    /// Another handle for a subsystem that queries or moves bodies
    pub fn handle(&self) -> Rc<RefCell<PhysicsWorld>> {
        self.0.clone()
    }
}

impl Physics for SharedPhysics {
    fn advance(&mut self, dt: f64) -> Result<()> {
        self.0.borrow_mut().step(dt)
    }
}

/// A lane six units wide on each side with its top at y = 0
#[cfg(test)]
pub(crate) fn test_lane() -> Rc<RefCell<PhysicsWorld>> {
    Rc::new(RefCell::new(PhysicsWorld::new(
        9.81,
        Ground {
            height: 0.0,
            half_width: 6.0,
        },
    )))
}
