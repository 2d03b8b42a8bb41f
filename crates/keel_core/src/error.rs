//! # Core Error Types
//!
//! The exceptional paths of the crate. Ordinary lookup misses (unknown
//! entity, missing component) are `Option`s by design - only config parsing
//! and scene (de)serialization can genuinely fail.

use thiserror::Error;

/// Errors that can occur in the core engine.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Engine config file failed to parse.
    #[error("invalid engine config: {0}")]
    Config(#[from] toml::de::Error),

    /// Scene data for one component type failed to decode.
    #[error("scene data for component '{component}' is malformed")]
    SceneData {
        /// The component type whose data failed to decode.
        component: &'static str,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// Scene entity data was not a JSON object keyed by component type.
    #[error("scene entity data must be an object keyed by component type")]
    SceneFormat,

    /// Scene data referenced a component type no array is registered for.
    #[error("unknown component type '{0}' in scene data")]
    UnknownComponentType(String),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
