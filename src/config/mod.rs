use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod directions;
pub mod playback;
pub mod signals;

pub use directions::*;
pub use playback::*;
pub use signals::*;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlaybackConfig {
    #[serde(default)]
    pub playback: PlaybackSettings,
    #[serde(default)]
    pub signals: SignalTiming,
    #[serde(default)]
    pub directions: RoadDirections,
    #[serde(default)]
    pub scene: SceneSettings,
}

impl PlaybackConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&content)?;
        log::debug!(
            "Loaded playback config from {} ({} road directions)",
            path.as_ref().display(),
            config.directions.len()
        );
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PlaybackConfig = toml::from_str(content)?;

        // Validate configurations
        config.playback.validate()?;
        config.signals.validate()?;
        config.scene.validate()?;

        Ok(config)
    }

    /// Loads `path` if it exists, otherwise falls back to the built-in defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load_from_file(path)
        } else {
            log::info!(
                "No config at {}, using built-in defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }
}

pub trait Validate {
    fn validate(&self) -> Result<()>;
}
