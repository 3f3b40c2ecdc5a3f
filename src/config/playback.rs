use super::Validate;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    pub initial_speed: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    pub start_playing: bool,
    pub frame_rate: f64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            initial_speed: 5.0,
            min_speed: 1.0,
            max_speed: 20.0,
            start_playing: true,
            frame_rate: 60.0,
        }
    }
}

impl PlaybackSettings {
    pub fn clamp_speed(&self, speed: f64) -> f64 {
        speed.clamp(self.min_speed, self.max_speed)
    }

    pub fn frame_delta(&self) -> f64 {
        1.0 / self.frame_rate
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Seed for vehicle color assignment; random when absent.
    pub seed: Option<u64>,
    pub road_lane_width: Option<f64>,
}

impl Validate for PlaybackSettings {
    fn validate(&self) -> Result<()> {
        let speeds = [
            ("initial_speed", self.initial_speed),
            ("min_speed", self.min_speed),
            ("max_speed", self.max_speed),
        ];
        for (name, speed) in speeds {
            if !speed.is_finite() {
                return Err(anyhow!("Playback speed '{}' must be finite, got {}", name, speed));
            }
        }

        if self.min_speed <= 0.0 {
            return Err(anyhow!("Minimum playback speed must be positive"));
        }

        if self.min_speed > self.max_speed {
            return Err(anyhow!(
                "Minimum playback speed {} exceeds maximum {}",
                self.min_speed,
                self.max_speed
            ));
        }

        if self.initial_speed < self.min_speed || self.initial_speed > self.max_speed {
            return Err(anyhow!(
                "Initial speed {} is out of range ({}-{})",
                self.initial_speed,
                self.min_speed,
                self.max_speed
            ));
        }

        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(anyhow!("Frame rate must be positive"));
        }

        Ok(())
    }
}

impl Validate for SceneSettings {
    fn validate(&self) -> Result<()> {
        if let Some(width) = self.road_lane_width {
            if width <= 0.0 {
                return Err(anyhow!("Road lane width must be positive"));
            }
        }
        Ok(())
    }
}
