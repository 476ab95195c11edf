use crate::scene::Demo;
use glam::Vec3;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "lumen".into(),
            width: 800,
            height: 600,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub sensitivity: f32,
    pub move_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
            position: Vec3::new(0.0, 0.0, 3.0),
            sensitivity: lumen_input::state::DEFAULT_SENSITIVITY,
            move_speed: lumen_input::state::DEFAULT_MOVE_SPEED,
        }
    }
}

/// Asset locations. Relative entries resolve against `root`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetConfig {
    pub root: PathBuf,
    pub texture: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            texture: PathBuf::from("images/checker.png"),
        }
    }
}

impl AssetConfig {
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    pub fn texture_path(&self) -> PathBuf {
        self.resolve(&self.texture)
    }

    /// `shaders/<name>.vert` and `shaders/<name>.frag`.
    pub fn shader_paths(&self, name: &str) -> (PathBuf, PathBuf) {
        let dir = self.root.join("shaders");
        (
            dir.join(format!("{name}.vert")),
            dir.join(format!("{name}.frag")),
        )
    }
}

/// Everything the viewer needs to start, loaded from YAML.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub demo: Demo,
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub assets: AssetConfig,
    pub clear_color: ClearColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ClearColor(pub [f32; 4]);

impl Default for ClearColor {
    fn default() -> Self {
        Self([0.0, 0.0, 0.0, 1.0])
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub demo: Option<Demo>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub texture: Option<PathBuf>,
    pub assets: Option<PathBuf>,
}

impl ViewerConfig {
    pub fn from_yaml(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(text).map_err(|source| ConfigError::Yaml {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&text, path)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(demo) = overrides.demo {
            self.demo = demo;
        }
        if let Some(width) = overrides.width {
            self.window.width = width;
        }
        if let Some(height) = overrides.height {
            self.window.height = height;
        }
        if let Some(texture) = overrides.texture {
            self.assets.texture = texture;
        }
        if let Some(root) = overrides.assets {
            self.assets.root = root;
        }
    }
}
