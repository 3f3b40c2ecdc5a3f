use anyhow::{anyhow, Result};
use instant::Instant;
use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default)]
pub struct FrameTiming {
    pub frame_time: Duration,
    pub resolve_time: Duration,
}

/// Rolling frame and resolve timings for the playback loop.
#[derive(Debug)]
pub struct FrameTimer {
    samples: VecDeque<FrameTiming>,
    max_samples: usize,
    last_frame: Option<Instant>,
    current_resolve_start: Option<Instant>,
    pending_resolve: Duration,
}

impl FrameTimer {
    pub fn new(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            samples: VecDeque::with_capacity(max_samples),
            max_samples,
            last_frame: None,
            current_resolve_start: None,
            pending_resolve: Duration::ZERO,
        }
    }

    /// Marks the start of a frame and returns the real seconds elapsed since
    /// the previous one (0 on the first frame).
    pub fn begin_frame(&mut self) -> f64 {
        let now = Instant::now();
        let delta = match self.last_frame.replace(now) {
            Some(previous) => {
                let frame_time = now.duration_since(previous);
                self.record(FrameTiming {
                    frame_time,
                    resolve_time: self.pending_resolve,
                });
                frame_time.as_secs_f64()
            }
            None => 0.0,
        };
        self.pending_resolve = Duration::ZERO;
        delta
    }

    pub fn start_resolve(&mut self) {
        self.current_resolve_start = Some(Instant::now());
    }

    pub fn end_resolve(&mut self) {
        if let Some(start) = self.current_resolve_start.take() {
            self.pending_resolve = start.elapsed();
        }
    }

    pub fn record(&mut self, timing: FrameTiming) {
        if self.samples.len() >= self.max_samples {
            self.samples.pop_front();
        }
        self.samples.push_back(timing);
    }

    pub fn average_frame_time(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }

        let total: Duration = self.samples.iter().map(|s| s.frame_time).sum();
        total / self.samples.len() as u32
    }

    pub fn average_resolve_time(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }

        let total: Duration = self.samples.iter().map(|s| s.resolve_time).sum();
        total / self.samples.len() as u32
    }

    pub fn fps(&self) -> f64 {
        let avg_frame_time = self.average_frame_time();
        if avg_frame_time.is_zero() {
            return 0.0;
        }
        1.0 / avg_frame_time.as_secs_f64()
    }
}

/// Real seconds a playback run lasts. Without an explicit request the run
/// covers `end_time` at `speed`, plus one second to show the final state.
pub fn run_duration(requested: Option<f64>, end_time: f64, speed: f64) -> Result<f64> {
    match requested {
        Some(duration) if !duration.is_finite() || duration < 0.0 => Err(anyhow!(
            "Run duration must be a non-negative number of seconds, got {}",
            duration
        )),
        Some(duration) => Ok(duration),
        None => Ok(end_time / speed + 1.0),
    }
}
