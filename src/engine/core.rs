use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::error::ConfigError;

pub const CONFIG_ENV: &str = "BREAKOUT_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "breakout.ron";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub app_name: String,
    pub window_width: u32,
    pub window_height: u32,
    pub assets: AssetPaths,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            app_name: "Breakout".to_string(),
            window_width: 800,
            window_height: 600,
            assets: AssetPaths::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_ron(path: &Path, text: &str) -> Result<Self, ConfigError> {
        ron::de::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(path, &text)
    }

    /// Reads `$BREAKOUT_CONFIG`, or `breakout.ron` in the working directory.
    /// Falls back to defaults only when no file exists at that location.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        if path.exists() {
            tracing::info!(target: "engine", path = %path.display(), "loading config");
            Self::load(&path)
        } else {
            tracing::debug!(target: "engine", path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }
}

/// Where assets live on disk. Relative directories resolve against `root`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub root: PathBuf,
    pub shaders: PathBuf,
    pub textures: PathBuf,
    pub levels: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            shaders: PathBuf::from("shaders"),
            textures: PathBuf::from("resources/textures"),
            levels: PathBuf::from("levels"),
        }
    }
}

impl AssetPaths {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn shader(&self, file: &str) -> PathBuf {
        self.root.join(&self.shaders).join(file)
    }

    pub fn texture(&self, file: &str) -> PathBuf {
        self.root.join(&self.textures).join(file)
    }

    pub fn level(&self, file: &str) -> PathBuf {
        self.root.join(&self.levels).join(file)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FrameTiming {
    pub delta_seconds: f32,
    pub fps: f32,
}

impl FrameTiming {
    pub fn from_delta(delta: std::time::Duration) -> Self {
        let delta_seconds = delta.as_secs_f32();
        let fps = if delta_seconds > 0.0 {
            1.0 / delta_seconds
        } else {
            0.0
        };
        Self { delta_seconds, fps }
    }
}
