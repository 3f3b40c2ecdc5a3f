use serde::Serialize;

/// Virtual simulation clock, advanced by scaled real-time frame deltas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackClock {
    virtual_time: f64,
    speed: f64,
    playing: bool,
}

impl PlaybackClock {
    pub fn new(speed: f64, playing: bool) -> Self {
        let mut clock = Self {
            virtual_time: 0.0,
            speed: 1.0,
            playing,
        };
        clock.set_speed(speed);
        clock
    }

    pub fn virtual_time(&self) -> f64 {
        self.virtual_time
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Adds `real_delta * speed` while playing. Deltas that are negative or
    /// not finite are dropped.
    pub fn advance(&mut self, real_delta: f64) {
        if !self.playing {
            return;
        }
        if !real_delta.is_finite() || real_delta < 0.0 {
            log::debug!("Ignoring invalid frame delta {}", real_delta);
            return;
        }
        self.virtual_time += real_delta * self.speed;
    }

    pub fn restart(&mut self) {
        self.virtual_time = 0.0;
    }

    /// Takes effect on the next `advance`; elapsed time is left untouched.
    pub fn set_speed(&mut self, multiplier: f64) {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            log::warn!("Ignoring non-positive playback speed {}", multiplier);
            return;
        }
        self.speed = multiplier;
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new(1.0, true)
    }
}
