use anyhow::Result;
use roster_media::{CaptureConstraints, FacingMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub camera: CameraConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    Memory,
    File,
    Disabled,
}

impl Default for SessionBackend {
    fn default() -> Self {
        Self::File
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub backend: SessionBackend,
    /// Directory holding one JSON file per session (file backend only).
    #[serde(default = "default_session_dir")]
    pub dir: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: SessionBackend::default(),
            dir: default_session_dir(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_preset")]
    pub preset: String,
    #[serde(default)]
    pub facing: FacingMode,
    #[serde(default)]
    pub audio: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            preset: default_camera_preset(),
            facing: FacingMode::default(),
            audio: false,
        }
    }
}

impl CameraConfig {
    pub fn constraints(&self) -> Result<CaptureConstraints> {
        let constraints = CaptureConstraints::from_preset(&self.preset)
            .ok_or_else(|| anyhow::anyhow!("unknown camera preset '{}'", self.preset))?;
        Ok(constraints.with_facing(self.facing).with_audio(self.audio))
    }
}

fn default_session_dir() -> String {
    "./data/sessions".into()
}
fn default_camera_preset() -> String {
    "720p".into()
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            tracing::info!(
                "Config file not found at '{}', generating defaults...",
                path
            );
            let config = Config::default();

            if let Some(parent) = Path::new(path).parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, toml::to_string_pretty(&config)?)?;
            tracing::info!("Generated default config at '{}'", path);
            config
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply `ROSTER_*` overrides. `lookup` is `std::env::var` outside tests.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("ROSTER_SESSION_BACKEND") {
            let normalized = value.trim().to_ascii_lowercase();
            match normalized.as_str() {
                "memory" => self.session.backend = SessionBackend::Memory,
                "file" => self.session.backend = SessionBackend::File,
                "disabled" | "none" => self.session.backend = SessionBackend::Disabled,
                _ => {
                    tracing::warn!(
                        "Ignoring invalid ROSTER_SESSION_BACKEND value '{}'; expected memory, file or disabled",
                        value
                    );
                }
            }
        }
        if let Some(value) = lookup("ROSTER_SESSION_DIR") {
            self.session.dir = value;
        }
        if let Some(value) = lookup("ROSTER_CAMERA_PRESET") {
            self.camera.preset = value;
        }
    }
}
