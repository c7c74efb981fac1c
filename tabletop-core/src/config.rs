//! Viewer configuration, loadable from TOML

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::camera::{
    FlyCamera, ProjectionMode, DEFAULT_FOV, DEFAULT_SENSITIVITY, DEFAULT_SPEED, MAX_SPEED, MIN_SPEED,
};
use crate::error::{Error, Result};
use crate::lighting::Lighting;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Hide and lock the cursor so the mouse only steers the camera
    pub grab_cursor: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Pyramid Test".to_string(),
            width: 800,
            height: 600,
            grab_cursor: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub speed: f32,
    pub sensitivity: f32,
    pub fov: f32,
    pub projection: ProjectionMode,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 3.0],
            speed: DEFAULT_SPEED,
            sensitivity: DEFAULT_SENSITIVITY,
            fov: DEFAULT_FOV,
            projection: ProjectionMode::Perspective,
        }
    }
}

impl CameraConfig {
    pub fn build(&self) -> FlyCamera {
        let mut camera = FlyCamera::new(self.position.into());
        camera.movement_speed = self.speed;
        camera.mouse_sensitivity = self.sensitivity;
        camera.fov = self.fov;
        camera.projection = self.projection;
        camera
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub background_color: [f64; 4],
    pub enable_depth_test: bool,
    pub vsync: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background_color: [0.0, 0.0, 0.0, 1.0],
            enable_depth_test: true,
            vsync: true,
        }
    }
}

/// Top-level configuration for the viewer binary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Directory that contains `textures/`
    pub asset_dir: PathBuf,
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub lighting: Lighting,
    pub render: RenderConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("."),
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            lighting: Lighting::default(),
            render: RenderConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        log::info!("loading config {}", path.display());
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(Error::Config(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if !(MIN_SPEED..=MAX_SPEED).contains(&self.camera.speed) {
            return Err(Error::Config(format!(
                "camera speed must be in [{}, {}], got {}",
                MIN_SPEED, MAX_SPEED, self.camera.speed
            )));
        }
        if !(self.camera.sensitivity.is_finite() && self.camera.sensitivity > 0.0) {
            return Err(Error::Config(format!(
                "mouse sensitivity must be positive, got {}",
                self.camera.sensitivity
            )));
        }
        if !(self.camera.fov > 0.0 && self.camera.fov < 180.0) {
            return Err(Error::Config(format!("field of view must be in (0, 180), got {}", self.camera.fov)));
        }
        Ok(())
    }
}
