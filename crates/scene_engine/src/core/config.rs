//! # Unified Configuration System
//!
//! Configuration for the scene graph, raycasting defaults and logging,
//! grouped under [`ApplicationConfig`] so applications can keep it in one
//! TOML or RON file.
//!
//! ```toml
//! [engine]
//! log_level = "info"
//!
//! [scene]
//! matrix_auto_update = true
//! frustum_culling = true
//!
//! [raycast]
//! near = 0.0
//! far = 1000.0
//! points_threshold = 1.0
//! ```

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError};

/// # Engine Configuration
///
/// Process-wide behaviour: the logging filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log filter passed to `env_logger` (e.g. `"info"`, `"scene_engine=debug"`)
    pub log_level: String,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Scene Configuration
///
/// Defaults applied to nodes created by a [`SceneGraph`](crate::scene::SceneGraph).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Initial `matrix_auto_update` of new nodes
    pub matrix_auto_update: bool,
    /// Whether `query_visible` tests bounds against the frustum at all
    pub frustum_culling: bool,
    /// Up direction used by `look_at`
    pub default_up: [f32; 3],
}

impl SceneConfig {
    /// Create a new scene configuration
    pub fn new() -> Self {
        Self {
            matrix_auto_update: true,
            frustum_culling: true,
            default_up: [0.0, 1.0, 0.0],
        }
    }

    /// Set the default `matrix_auto_update` for new nodes
    pub fn with_matrix_auto_update(mut self, enabled: bool) -> Self {
        self.matrix_auto_update = enabled;
        self
    }

    /// Enable or disable frustum culling
    pub fn with_frustum_culling(mut self, enabled: bool) -> Self {
        self.frustum_culling = enabled;
        self
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Raycast Configuration
///
/// Defaults for new [`Raycaster`](crate::scene::Raycaster)s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaycastConfig {
    /// Hits closer than this are discarded
    pub near: f32,
    /// Hits further than this are discarded
    pub far: f32,
    /// World-space pick radius for point clouds
    pub points_threshold: f32,
}

impl RaycastConfig {
    /// Create a new raycast configuration
    pub fn new() -> Self {
        Self {
            near: 0.0,
            far: f32::INFINITY,
            points_threshold: 1.0,
        }
    }

    /// Set the near/far range
    pub fn with_range(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Set the point cloud pick radius
    pub fn with_points_threshold(mut self, threshold: f32) -> Self {
        self.points_threshold = threshold;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.near < 0.0 {
            return Err(ConfigError::Invalid(format!("raycast near must be >= 0, got {}", self.near)));
        }
        if self.near > self.far {
            return Err(ConfigError::Invalid(format!(
                "raycast near ({}) must not exceed far ({})",
                self.near, self.far
            )));
        }
        if self.points_threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "points threshold must be >= 0, got {}",
                self.points_threshold
            )));
        }
        Ok(())
    }
}

impl Default for RaycastConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Scene graph defaults
    pub scene: SceneConfig,
    /// Raycasting defaults
    pub raycast: RaycastConfig,
}

impl ApplicationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log level cannot be empty".to_string()));
        }
        self.raycast.validate()
    }
}

impl Config for ApplicationConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ApplicationConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.scene.matrix_auto_update);
    }

    #[test]
    fn test_inverted_raycast_range_rejected() {
        let mut config = ApplicationConfig::default();
        config.raycast = RaycastConfig::new().with_range(10.0, 1.0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ApplicationConfig = toml::from_str(
            r#"
            [scene]
            matrix_auto_update = false

            [raycast]
            points_threshold = 0.25
            "#,
        )
        .expect("valid toml");

        assert!(!config.scene.matrix_auto_update);
        assert!(config.scene.frustum_culling);
        assert_eq!(config.raycast.points_threshold, 0.25);
        assert_eq!(config.engine.log_level, "info");
    }

    #[test]
    fn test_ron_roundtrip_through_files() {
        let dir = std::env::temp_dir().join(format!("scene_engine_config_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("app.ron");

        let mut config = ApplicationConfig::default();
        config.raycast = RaycastConfig::new().with_range(0.5, 50.0);
        config.save_to_file(&path).unwrap();

        let loaded = ApplicationConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.raycast, config.raycast);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let result = ApplicationConfig::default().save_to_file("config.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
