//! Loop configuration

use serde::{Deserialize, Serialize};
use shard_core::Result;
use std::path::Path;

/// Game loop configuration, usually read from the `[loop]` table of a TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Build a player controller; `false` runs the spectator camera drift
    pub player_enabled: bool,
    /// Camera drift along +z in spectator mode (units per second)
    pub spectator_drift_speed: f32,
    /// Clamp on a single clock delta in seconds; zero or negative disables it
    pub max_delta: f64,
    /// Run the renderer's post-processing setup at startup
    pub post_fx: bool,
    /// Camera yaw (radians) restored on restart
    pub default_yaw: f32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            player_enabled: true,
            spectator_drift_speed: 10.0,
            max_delta: 0.25,
            post_fx: true,
            default_yaw: std::f32::consts::PI,
        }
    }
}

impl LoopConfig {
    /// Parse from a TOML document containing the config keys at top level
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// `max_delta` as a clock clamp
    pub fn delta_clamp(&self) -> Option<f64> {
        (self.max_delta > 0.0).then_some(self.max_delta)
    }
}
