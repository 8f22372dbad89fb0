//! Runtime configuration
//!
//! One JSON file configures both the scene and the window it runs in. The
//! scene reads its own sections; the runtime reads `window` and `host`.

use crate::host::HostSettings;
use anyhow::{Context, Result};
use gracht_core::SceneSettings;
use gracht_render::WindowConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub window: WindowConfig,
    pub host: HostSettings,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub scene: SceneSettings,
    pub runtime: RuntimeConfig,
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let scene = SceneSettings::from_json_str(json).context("invalid scene settings")?;
        let runtime: RuntimeConfig =
            serde_json::from_str(json).context("invalid window or host settings")?;
        Ok(Self { scene, runtime })
    }

    /// Defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_file_feeds_both_layers() {
        let config = Config::from_json_str(
            r#"{
                "seed": 7,
                "world": { "span": 300.0 },
                "window": { "title": "Canal" },
                "host": { "line_height": 24.0 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.scene.seed, Some(7));
        assert_eq!(config.scene.world.span, 300.0);
        assert_eq!(config.runtime.window.title, "Canal");
        assert_eq!(config.runtime.window.width, 1280);
        assert_eq!(config.runtime.host.line_height, 24.0);
        assert_eq!(config.runtime.host.section_viewports, 2.5);
    }

    #[test]
    fn no_path_means_defaults() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.scene.seed, None);
        assert_eq!(config.runtime.window.height, 720);
    }

    #[test]
    fn invalid_scene_is_reported() {
        let err = Config::from_json_str(r#"{ "world": { "span": -1.0 }}"#).unwrap_err();
        assert!(format!("{err:#}").contains("world.span"));
    }
}
