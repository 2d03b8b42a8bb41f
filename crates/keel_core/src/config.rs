//! # Engine Configuration
//!
//! Startup configuration, loaded once from TOML before the scene is built.
//! Nothing here changes at runtime.

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;

/// Default entity slot capacity.
pub const DEFAULT_ENTITY_CAPACITY: usize = 10_000;

/// Default component array slot capacity.
pub const DEFAULT_COMPONENT_CAPACITY: usize = 100;

/// Default gravity acceleration (world units per second squared).
pub const DEFAULT_GRAVITY: f32 = 9.8;

/// Default upper bound for one frame's delta time (seconds).
pub const DEFAULT_MAX_DELTA_TIME: f32 = 0.1;

/// Engine startup configuration.
///
/// # Example
///
/// ```rust,ignore
/// let config = EngineConfig::from_toml_str(r#"
///     entity_capacity = 4096
///     gravity = 9.8
/// "#)?;
/// let scene = Scene::with_config(&config);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of simultaneously live entities.
    pub entity_capacity: usize,
    /// Initial slot capacity of each component array.
    pub component_capacity: usize,
    /// Gravity acceleration applied by the movement system.
    pub gravity: f32,
    /// Upper bound for one frame's delta time, in seconds. Keeps a debugger
    /// pause or load hitch from integrating into a physics explosion.
    pub max_delta_time: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            entity_capacity: DEFAULT_ENTITY_CAPACITY,
            component_capacity: DEFAULT_COMPONENT_CAPACITY,
            gravity: DEFAULT_GRAVITY,
            max_delta_time: DEFAULT_MAX_DELTA_TIME,
        }
    }
}

impl EngineConfig {
    /// Parses a config from TOML text.
    ///
    /// Missing keys fall back to their defaults; unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::Config`] when the text is not valid TOML
    /// or a key has the wrong type.
    pub fn from_toml_str(text: &str) -> CoreResult<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.entity_capacity, DEFAULT_ENTITY_CAPACITY);
        assert!((config.gravity - DEFAULT_GRAVITY).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = EngineConfig::from_toml_str("entity_capacity = 64").unwrap();
        assert_eq!(config.entity_capacity, 64);
        assert_eq!(config.component_capacity, DEFAULT_COMPONENT_CAPACITY);
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(EngineConfig::from_toml_str("entity_capacity = \"lots\"").is_err());
    }
}
