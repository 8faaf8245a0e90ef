//! Shard Core - Foundational types for the Shard runner
//!
//! This crate provides the types every other Shard crate depends on:
//! - `Vec3` - Spatial vector used by the simulation and camera
//! - Error types and Result alias

mod error;
mod types;

pub use error::{Result, ShardError};
pub use types::Vec3;
