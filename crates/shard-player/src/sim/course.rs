//! Obstacle course: a recycled pool of solid obstacles plus decorative shard geometry
//!
//! Obstacles are fixed cylinder colliders in the shared physics world. The
//! runner's character controller reports what it touched; touching an
//! obstacle loses the run.

use std::cell::RefCell;
use std::rc::Rc;

use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};
use shard_core::{Result, ShardError, Vec3};
use shard_runtime::{EventBus, GameEvent, PlayerState, World};

use super::physics::{to_vector, PhysicsWorld};
use super::rng::CourseRng;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseConfig {
    /// Obstacles alive at any time
    pub pool_size: usize,
    /// Distance along z between consecutive obstacles
    pub spacing: f32,
    /// Distance from the spawn to the first obstacle
    pub lead_in: f32,
    /// Half width of the runnable strip
    pub lane_half_width: f32,
    pub obstacle_radius: f32,
    pub obstacle_height: f32,
    /// Obstacles this far behind the player are recycled ahead
    pub cull_distance: f32,
    /// Decorative shards placed beside the lane
    pub shard_count: usize,
    pub seed: u32,
}

impl Default for CourseConfig {
    fn default() -> Self {
        Self {
            pool_size: 24,
            spacing: 9.0,
            lead_in: 30.0,
            lane_half_width: 6.0,
            obstacle_radius: 0.8,
            obstacle_height: 1.4,
            cull_distance: 12.0,
            shard_count: 48,
            seed: 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    /// Centre of the cylinder
    pub position: Vec3,
    pub radius: f32,
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
}

/// A spinning decorative triangle beside the lane
#[derive(Debug, Clone, PartialEq)]
pub struct Shard {
    pub position: Vec3,
    pub scale: f32,
    /// Radians per second
    pub spin: f32,
    pub angle: f32,
}

pub struct ObstacleCourse {
    config: CourseConfig,
    physics: Rc<RefCell<PhysicsWorld>>,
    rng: CourseRng,
    obstacles: Vec<Obstacle>,
    shards: Vec<Shard>,
    /// z at which the next obstacle is placed
    next_z: f32,
    recycled: u64,
}

impl ObstacleCourse {
    /// Build a course with a full obstacle pool and generated geometry
    pub fn new(config: CourseConfig, physics: Rc<RefCell<PhysicsWorld>>) -> Self {
        let rng = CourseRng::new(config.seed);
        let mut course = Self {
            config,
            physics,
            rng,
            obstacles: Vec::new(),
            shards: Vec::new(),
            next_z: 0.0,
            recycled: 0,
        };
        course.reset_obstacles();
        course.fill_obstacles();
        course.generate_geometry();
        course
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn shards(&self) -> &[Shard] {
        &self.shards
    }

    /// Obstacles moved ahead since the last reset
    pub fn recycled(&self) -> u64 {
        self.recycled
    }

    fn next_position(&mut self) -> Vec3 {
        let half = self.config.lane_half_width - self.config.obstacle_radius;
        let position = Vec3::new(
            self.rng.range(-half, half),
            self.config.obstacle_height * 0.5,
            self.next_z,
        );
        self.next_z += self.config.spacing;
        position
    }

    fn spawn_obstacle(&mut self) -> Obstacle {
        let position = self.next_position();
        let mut physics = self.physics.borrow_mut();
        let body = physics.insert_rigid_body(
            RigidBodyBuilder::fixed()
                .translation(to_vector(position))
                .build(),
        );
        let half_height = self.config.obstacle_height * 0.5;
        let shape = ColliderBuilder::cylinder(half_height, self.config.obstacle_radius).build();
        let collider = physics.insert_collider_with_parent(shape, body);
        Obstacle {
            position,
            radius: self.config.obstacle_radius,
            body,
            collider,
        }
    }

    fn course_span(&self) -> f32 {
        self.config.pool_size as f32 * self.config.spacing
    }

    fn recycle_behind(&mut self, player_z: f32) {
        let cutoff = player_z - self.config.cull_distance;
        for index in 0..self.obstacles.len() {
            if self.obstacles[index].position.z < cutoff {
                let position = self.next_position();
                let obstacle = &mut self.obstacles[index];
                obstacle.position = position;
                if let Some(body) = self.physics.borrow_mut().get_rigid_body_mut(obstacle.body) {
                    body.set_translation(to_vector(position), false);
                }
                self.recycled += 1;
            }
        }

        let span = self.course_span();
        for shard in &mut self.shards {
            if shard.position.z < cutoff {
                shard.position.z += span;
            }
        }
    }

    /// Whether the runner's last move touched an obstacle
    fn hit(&self) -> bool {
        let physics = self.physics.borrow();
        physics.contacts().iter().any(|contact| {
            self.obstacles
                .iter()
                .any(|obstacle| obstacle.collider == *contact)
        })
    }
}

impl World for ObstacleCourse {
    fn advance(
        &mut self,
        dt: f64,
        elapsed: f64,
        player: Option<&PlayerState>,
        events: &mut EventBus,
    ) -> Result<()> {
        if !dt.is_finite() || !elapsed.is_finite() {
            return Err(ShardError::WorldError(format!(
                "non-finite time (dt {dt}, elapsed {elapsed})"
            )));
        }

        for shard in &mut self.shards {
            shard.angle = (elapsed as f32 * shard.spin) % std::f32::consts::TAU;
        }

        if let Some(player) = player {
            if self.hit() {
                events.push(GameEvent::PlayerLost);
            }
            self.recycle_behind(player.position.z);
        }
        Ok(())
    }

    fn reset_obstacles(&mut self) {
        let mut physics = self.physics.borrow_mut();
        for obstacle in self.obstacles.drain(..) {
            physics.remove_rigid_body(obstacle.body);
        }
        self.rng = CourseRng::new(self.config.seed);
        self.next_z = self.config.lead_in;
        self.recycled = 0;
    }

    fn fill_obstacles(&mut self) {
        while self.obstacles.len() < self.config.pool_size {
            let obstacle = self.spawn_obstacle();
            self.obstacles.push(obstacle);
        }
    }

    fn clear_geometry(&mut self) {
        self.shards.clear();
    }

    fn generate_geometry(&mut self) {
        let span = self.course_span();
        let lane = self.config.lane_half_width;
        for _ in 0..self.config.shard_count {
            let side = self.rng.sign();
            let shard = Shard {
                position: Vec3::new(
                    side * (lane + self.rng.range(2.0, 14.0)),
                    self.rng.range(1.0, 9.0),
                    self.rng.range(0.0, span),
                ),
                scale: self.rng.range(0.5, 2.5),
                spin: self.rng.range(-1.5, 1.5),
                angle: 0.0,
            };
            self.shards.push(shard);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::physics::{from_vector, test_lane};
    use crate::sim::runner::{RunnerConfig, RunnerController, Steering};
    use crate::sim::PerspectiveCamera;
    use shard_runtime::{PlayerController, Viewport};

    fn player_at(x: f32, y: f32, z: f32) -> PlayerState {
        PlayerState {
            position: Vec3::new(x, y, z),
            velocity: Vec3::FORWARD,
            grounded: true,
        }
    }

    /// Obstacles all sit on the centre line
    fn centre_line() -> CourseConfig {
        CourseConfig {
            lane_half_width: 0.8,
            ..CourseConfig::default()
        }
    }

    /// Run a runner through the course; returns its position when a loss is first reported
    fn run_until_lost(
        config: CourseConfig,
        steering: Steering,
        dt: f64,
        frames: usize,
    ) -> Option<Vec3> {
        let physics = test_lane();
        let mut course = ObstacleCourse::new(config, physics.clone());
        let mut runner = RunnerController::new(physics.clone(), RunnerConfig::default(), steering);
        let mut camera = PerspectiveCamera::new(&Viewport::default(), std::f32::consts::PI);
        let mut events = EventBus::new();
        let mut elapsed = 0.0;

        for _ in 0..frames {
            elapsed += dt;
            physics.borrow_mut().step(dt).unwrap();
            runner.advance(dt, &mut camera, &mut events).unwrap();
            let state = runner.state();
            course.advance(dt, elapsed, Some(&state), &mut events).unwrap();
            if events.drain().contains(&GameEvent::PlayerLost) {
                return Some(state.position);
            }
        }
        None
    }

    fn straight() -> Steering {
        Steering::Autopilot {
            jump_period: f64::INFINITY,
            weave: 0.0,
        }
    }

    #[test]
    fn new_course_is_full() {
        let physics = test_lane();
        let course = ObstacleCourse::new(CourseConfig::default(), physics.clone());
        assert_eq!(course.obstacles().len(), 24);
        assert_eq!(course.shards().len(), 48);
        assert!((course.obstacles()[0].position.z - 30.0).abs() < 1e-5);
        for obstacle in course.obstacles() {
            assert!(obstacle.position.x.abs() <= 6.0 - 0.8);
        }
        // Ground slab plus one body per obstacle
        assert_eq!(physics.borrow().rigid_body_set.len(), 25);
        assert_eq!(physics.borrow().collider_set.len(), 25);
    }

    #[test]
    fn obstacles_behind_player_move_ahead() {
        let physics = test_lane();
        let mut course = ObstacleCourse::new(CourseConfig::default(), physics.clone());
        let mut events = EventBus::new();
        let furthest = course
            .obstacles()
            .iter()
            .map(|o| o.position.z)
            .fold(f32::MIN, f32::max);

        // Past the first two obstacles (z = 30, 39) by more than the cull distance
        let player = player_at(100.0, 0.5, 52.0);
        course.advance(0.016, 1.0, Some(&player), &mut events).unwrap();

        assert_eq!(course.recycled(), 2);
        assert_eq!(course.obstacles().len(), 24);
        assert!(course
            .obstacles()
            .iter()
            .all(|o| o.position.z >= 52.0 - 12.0));
        assert!(course
            .obstacles()
            .iter()
            .any(|o| o.position.z > furthest));

        let physics = physics.borrow();
        for obstacle in course.obstacles() {
            let body = physics.get_rigid_body(obstacle.body).unwrap();
            assert_eq!(from_vector(body.translation()), obstacle.position);
        }
    }

    #[test]
    fn runner_is_stopped_by_obstacle_at_small_steps() {
        let lost_at = run_until_lost(centre_line(), straight(), 1.0 / 60.0, 600)
            .expect("runner should hit the first obstacle");
        assert!(lost_at.z < 30.0 - 0.8, "lost at z {}", lost_at.z);
        assert!(lost_at.z > 28.0, "lost at z {}", lost_at.z);
    }

    #[test]
    fn runner_does_not_pass_through_obstacle_at_clamped_steps() {
        // 0.25 s is the largest delta the clock hands out; each move covers 3 units
        let lost_at = run_until_lost(centre_line(), straight(), 0.25, 40)
            .expect("runner should hit the first obstacle");
        assert!(lost_at.z < 30.0 - 0.8, "lost at z {}", lost_at.z);
    }

    #[test]
    fn jumping_clears_obstacles() {
        let steering = Steering::Autopilot {
            jump_period: 1.8,
            weave: 0.0,
        };
        // About 2.8 s, past the first obstacle at z = 30 but short of the second at z = 39
        assert_eq!(run_until_lost(centre_line(), steering, 1.0 / 60.0, 170), None);
    }

    #[test]
    fn open_lane_is_not_a_loss() {
        let config = CourseConfig {
            lead_in: 200.0,
            ..centre_line()
        };
        assert_eq!(run_until_lost(config, straight(), 1.0 / 60.0, 300), None);
    }

    #[test]
    fn contacts_without_a_player_are_ignored() {
        let physics = test_lane();
        let mut course = ObstacleCourse::new(CourseConfig::default(), physics.clone());
        let first = course.obstacles()[0].collider;
        physics.borrow_mut().record_contacts([first]);
        let mut events = EventBus::new();

        course.advance(0.016, 1.0, None, &mut events).unwrap();
        assert!(events.is_empty());

        let player = player_at(0.0, 0.5, 0.0);
        course.advance(0.016, 1.0, Some(&player), &mut events).unwrap();
        assert_eq!(events.drain(), vec![GameEvent::PlayerLost]);
    }

    #[test]
    fn spectator_advance_only_animates() {
        let mut course = ObstacleCourse::new(CourseConfig::default(), test_lane());
        let before = course.obstacles().to_vec();
        let mut events = EventBus::new();

        course.advance(0.016, 2.0, None, &mut events).unwrap();

        assert_eq!(course.obstacles(), before.as_slice());
        assert!(events.is_empty());
        assert!(course.shards().iter().any(|s| s.angle != 0.0));
    }

    #[test]
    fn reset_and_fill_restore_initial_layout() {
        let physics = test_lane();
        let mut course = ObstacleCourse::new(CourseConfig::default(), physics.clone());
        let layout = |course: &ObstacleCourse| -> Vec<Vec3> {
            course.obstacles().iter().map(|o| o.position).collect()
        };
        let initial = layout(&course);
        let mut events = EventBus::new();
        let player = player_at(100.0, 0.5, 200.0);
        course.advance(0.016, 1.0, Some(&player), &mut events).unwrap();
        assert_ne!(layout(&course), initial);

        course.reset_obstacles();
        assert!(course.obstacles().is_empty());
        assert_eq!(physics.borrow().rigid_body_set.len(), 1);

        course.fill_obstacles();
        assert_eq!(layout(&course), initial);
        assert_eq!(course.recycled(), 0);
        assert_eq!(physics.borrow().rigid_body_set.len(), 25);
    }

    #[test]
    fn geometry_regenerates() {
        let mut course = ObstacleCourse::new(CourseConfig::default(), test_lane());
        course.clear_geometry();
        assert!(course.shards().is_empty());
        course.generate_geometry();
        assert_eq!(course.shards().len(), 48);
    }

    #[test]
    fn non_finite_time_is_an_error() {
        let mut course = ObstacleCourse::new(CourseConfig::default(), test_lane());
        let mut events = EventBus::new();
        let err = course
            .advance(f64::INFINITY, 0.0, None, &mut events)
            .unwrap_err();
        assert!(matches!(err, ShardError::WorldError(_)));
    }
}
