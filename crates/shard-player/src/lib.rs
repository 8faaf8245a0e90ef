//! Shard Player: hosts for the Shard game loop
//!
//! Provides the reference subsystems (a Rapier physics world, the runner
//! controller, the obstacle course, a perspective camera and a statistics
//! renderer) plus two hosts: the windowed `PlayerApp` and `run_headless`.

pub mod config;
mod headless;
mod player_app;
pub mod setup;
pub mod sim;

pub use config::PlayerConfig;
pub use headless::{run_headless, HeadlessSummary, FRAME_STEP};
pub use player_app::PlayerApp;
pub use setup::{build_game, HostParts};
