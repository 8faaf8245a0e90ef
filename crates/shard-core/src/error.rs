//! Error types for Shard

use thiserror::Error;

/// The main error type for Shard operations
#[derive(Debug, Error)]
pub enum ShardError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Physics error: {0}")]
    PhysicsError(String),

    #[error("Player error: {0}")]
    PlayerError(String),

    #[error("World error: {0}")]
    WorldError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

/// Result type alias for Shard operations
pub type Result<T> = std::result::Result<T, ShardError>;

impl From<toml::de::Error> for ShardError {
    fn from(err: toml::de::Error) -> Self {
        ShardError::TomlParseError(err.to_string())
    }
}
