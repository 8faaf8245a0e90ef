//! Player configuration file

use std::path::Path;

use serde::{Deserialize, Serialize};
use shard_core::Result;
use shard_runtime::LoopConfig;

use crate::sim::{CourseConfig, RunnerConfig};

/// Top-level player config: `[loop]`, `[course]` and `[runner]` tables, all optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    #[serde(rename = "loop")]
    pub game: LoopConfig,
    pub course: CourseConfig,
    pub runner: RunnerConfig,
}

impl PlayerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
