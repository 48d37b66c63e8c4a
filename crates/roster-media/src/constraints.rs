use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    #[default]
    User,
    Environment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturePreset {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
}

pub fn capture_presets() -> Vec<CapturePreset> {
    vec![
        CapturePreset {
            name: "480p".to_string(),
            width: 640,
            height: 480,
            frame_rate: 30,
        },
        CapturePreset {
            name: "720p".to_string(),
            width: 1280,
            height: 720,
            frame_rate: 30,
        },
        CapturePreset {
            name: "1080p".to_string(),
            width: 1920,
            height: 1080,
            frame_rate: 30,
        },
    ]
}

/// What a surface asks the platform for when acquiring the camera.
/// Dimensions and frame rate are ideals, not hard requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConstraints {
    pub video: bool,
    pub audio: bool,
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
    #[serde(default)]
    pub facing: FacingMode,
}

impl CaptureConstraints {
    /// Video-only constraints from a named preset.
    pub fn from_preset(preset_name: &str) -> Option<Self> {
        capture_presets()
            .into_iter()
            .find(|p| p.name == preset_name)
            .map(|p| Self {
                video: true,
                audio: false,
                width: p.width,
                height: p.height,
                frame_rate: p.frame_rate,
                facing: FacingMode::User,
            })
    }

    pub fn with_facing(mut self, facing: FacingMode) -> Self {
        self.facing = facing;
        self
    }

    pub fn with_audio(mut self, audio: bool) -> Self {
        self.audio = audio;
        self
    }
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            video: true,
            audio: false,
            width: 1280,
            height: 720,
            frame_rate: 30,
            facing: FacingMode::User,
        }
    }
}
