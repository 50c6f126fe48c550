//! Scene configuration.
//!
//! Every constant of the scene has a default here; a JSON file passed with
//! `--config` may override any subset of them.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Scroll Scene".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Camera distance along +Z before the first scroll event
    pub initial_z: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 75.0,
            near: 0.1,
            far: 100.0,
            initial_z: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarConfig {
    pub count: usize,
    /// Width of the cube stars are scattered in, centred on the origin
    pub spread: f32,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            count: 200,
            spread: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub background: String,
    pub cube_map: String,
    pub sphere_map: String,
    pub sphere_normal_map: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            background: "spacebackground.jpg".to_string(),
            cube_map: "timessquare.jpg".to_string(),
            sphere_map: "moon.jpg".to_string(),
            sphere_normal_map: "normal.jpg".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Pixels scrolled per wheel line
    pub line_height: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self { line_height: 40.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub stars: StarConfig,
    pub assets: AssetConfig,
    pub scroll: ScrollConfig,
}

impl SceneConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid scene configuration")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config = Self::from_json(&json).with_context(|| format!("In {:?}", path))?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Defaults, or the given file when present
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_scene_constants() {
        let config = SceneConfig::default();
        assert_eq!(config.stars.count, 200);
        assert_eq!(config.stars.spread, 100.0);
        assert_eq!(config.camera.fov, 75.0);
        assert_eq!(config.camera.near, 0.1);
        assert_eq!(config.camera.far, 100.0);
        assert_eq!(config.camera.initial_z, 30.0);
        assert_eq!(config.assets.sphere_normal_map, "normal.jpg");
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let config = SceneConfig::from_json(r#"{ "stars": { "count": 50 } }"#).ok();
        let config = config.as_ref();
        assert_eq!(config.map(|c| c.stars.count), Some(50));
        assert_eq!(config.map(|c| c.stars.spread), Some(100.0));
        assert_eq!(config.map(|c| c.window.width), Some(1280));
    }

    #[test]
    fn test_empty_object_is_default() {
        let config = SceneConfig::from_json("{}").ok();
        assert_eq!(config, Some(SceneConfig::default()));
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(SceneConfig::from_json("{ stars: ").is_err());
        assert!(SceneConfig::from_json(r#"{ "stars": { "count": -1 } }"#).is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = SceneConfig::load("no/such/config.json");
        assert!(result.is_err());
    }

    #[test]
    fn test_no_path_gives_default() {
        let config = SceneConfig::load_or_default(None).ok();
        assert_eq!(config, Some(SceneConfig::default()));
    }

    #[test]
    fn test_round_trips_through_file() {
        let path = std::env::temp_dir().join(format!("scroll-scene-config-{}.json", std::process::id()));
        let mut config = SceneConfig::default();
        config.scroll.line_height = 16.0;
        config.assets.background = "nebula.png".to_string();
        std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap_or_default()).ok();

        let loaded = SceneConfig::load(&path).ok();
        assert_eq!(loaded, Some(config));
    }
}
