use crate::config::PlaybackConfig;
use crate::data::{SimulationResults, TrajectoryStore};
use crate::playback::{Frame, PlaybackSession};
use std::sync::Arc;

/// Original and optimized runs played side by side, each with its own clock.
/// Without an optimized run only the original is played.
#[derive(Debug, Clone)]
pub struct ComparisonView {
    pub original: PlaybackSession,
    pub optimized: Option<PlaybackSession>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonFrame {
    pub original: Frame,
    pub optimized: Option<Frame>,
}

/// Optimized minus original for each backend figure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsDelta {
    pub average_speed: f64,
    pub average_travel_time: f64,
    pub average_waiting_time: f64,
}

impl ComparisonView {
    pub fn new(
        original: Arc<TrajectoryStore>,
        optimized: Arc<TrajectoryStore>,
        config: &PlaybackConfig,
    ) -> Self {
        Self {
            original: PlaybackSession::new(original, config),
            optimized: Some(PlaybackSession::new(optimized, config)),
        }
    }

    pub fn single(original: Arc<TrajectoryStore>, config: &PlaybackConfig) -> Self {
        Self {
            original: PlaybackSession::new(original, config),
            optimized: None,
        }
    }

    pub fn is_comparing(&self) -> bool {
        self.optimized.is_some()
    }

    /// Applies `speed` to every session in the view.
    pub fn set_speed(&mut self, speed: f64) {
        self.original.set_speed(speed);
        if let Some(optimized) = &mut self.optimized {
            optimized.set_speed(speed);
        }
    }

    /// Latest vehicle end time over both runs.
    pub fn max_end_time(&self) -> f64 {
        let original = self.original.store().max_end_time();
        self.optimized
            .as_ref()
            .map_or(original, |o| original.max(o.store().max_end_time()))
    }

    pub fn tick(&mut self, real_delta: f64) -> ComparisonFrame {
        ComparisonFrame {
            original: self.original.tick(real_delta),
            optimized: self.optimized.as_mut().map(|o| o.tick(real_delta)),
        }
    }

    pub fn results_delta(&self) -> Option<ResultsDelta> {
        let original: &SimulationResults = self.original.store().results.as_ref()?;
        let optimized: &SimulationResults = self.optimized.as_ref()?.store().results.as_ref()?;
        Some(ResultsDelta {
            average_speed: optimized.average_speed - original.average_speed,
            average_travel_time: optimized.average_travel_time - original.average_travel_time,
            average_waiting_time: optimized.average_waiting_time - original.average_waiting_time,
        })
    }
}
