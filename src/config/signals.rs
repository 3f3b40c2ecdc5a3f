use super::Validate;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Durations of the synthesized four-phase cycle, in seconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SignalTiming {
    pub ns_green: f64,
    pub ns_yellow: f64,
    pub ew_green: f64,
    pub ew_yellow: f64,
    /// State string length used when no connection carries a signal index.
    pub fallback_state_length: usize,
}

impl Default for SignalTiming {
    fn default() -> Self {
        Self {
            ns_green: 30.0,
            ns_yellow: 5.0,
            ew_green: 30.0,
            ew_yellow: 5.0,
            fallback_state_length: 12,
        }
    }
}

impl SignalTiming {
    pub fn cycle_length(&self) -> f64 {
        self.ns_green + self.ns_yellow + self.ew_green + self.ew_yellow
    }
}

impl Validate for SignalTiming {
    fn validate(&self) -> Result<()> {
        let durations = [
            ("ns_green", self.ns_green),
            ("ns_yellow", self.ns_yellow),
            ("ew_green", self.ew_green),
            ("ew_yellow", self.ew_yellow),
        ];

        for (name, duration) in durations {
            if !duration.is_finite() || duration <= 0.0 {
                return Err(anyhow!("Signal phase '{}' must have a positive duration", name));
            }
        }

        if self.fallback_state_length == 0 {
            return Err(anyhow!("Fallback state length must be greater than zero"));
        }

        Ok(())
    }
}
