//! Reference subsystems for the game loop

pub mod camera;
pub mod course;
pub mod physics;
pub mod presentation;
pub mod renderer;
pub mod rng;
pub mod runner;
pub mod sizer;

pub use camera::PerspectiveCamera;
pub use course::{CourseConfig, ObstacleCourse};
pub use physics::{Ground, PhysicsWorld, SharedPhysics};
pub use presentation::LogPresentation;
pub use renderer::{FrameReport, LogSink, ReportSink, StatsRenderer};
pub use runner::{RunnerConfig, RunnerController, RunnerInput, Steering};
pub use sizer::FixedSizer;
