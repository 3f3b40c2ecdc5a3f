use super::{compute_metrics, resolve_signal_states, resolve_vehicle_pose, MetricsSnapshot, PlaybackClock, Pose, SignalColor};
use crate::config::{Approach, PlaybackConfig, PlaybackSettings, RoadDirections};
use crate::data::{LaneConnection, TrajectoryStore};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub virtual_time: f64,
    pub poses: Vec<Pose>,
    pub signal_states: BTreeMap<Approach, SignalColor>,
    pub metrics: MetricsSnapshot,
}

/// One playback view over a shared, read-only store.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    store: Arc<TrajectoryStore>,
    directions: RoadDirections,
    settings: PlaybackSettings,
    clock: PlaybackClock,
    headings: Vec<f64>,
    /// Connections whose approach edge exists in the road graph.
    signal_connections: Vec<LaneConnection>,
}

impl PlaybackSession {
    pub fn new(store: Arc<TrajectoryStore>, config: &PlaybackConfig) -> Self {
        let settings = config.playback.clone();
        let clock = PlaybackClock::new(
            settings.clamp_speed(settings.initial_speed),
            settings.start_playing,
        );
        let headings = vec![0.0; store.vehicles.len()];
        let signal_connections = store
            .connections
            .iter()
            .filter(|c| store.edge(&c.from_edge_id).is_some())
            .cloned()
            .collect();
        Self {
            store,
            directions: config.directions.clone(),
            settings,
            clock,
            headings,
            signal_connections,
        }
    }

    pub fn store(&self) -> &Arc<TrajectoryStore> {
        &self.store
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub fn directions(&self) -> &RoadDirections {
        &self.directions
    }

    pub fn play(&mut self) {
        self.clock.set_playing(true);
    }

    pub fn pause(&mut self) {
        self.clock.set_playing(false);
    }

    pub fn toggle(&mut self) {
        let playing = !self.clock.is_playing();
        self.clock.set_playing(playing);
        log::info!("Playback {}", if playing { "resumed" } else { "paused" });
    }

    /// Rewinds to t = 0 and forgets vehicle headings. Play state and speed
    /// are kept.
    pub fn restart(&mut self) {
        self.clock.restart();
        self.headings.iter_mut().for_each(|h| *h = 0.0);
        log::info!("Playback restarted");
    }

    pub fn set_speed(&mut self, speed: f64) {
        let clamped = self.settings.clamp_speed(speed);
        self.clock.set_speed(clamped);
        log::debug!("Playback speed: {}x", self.clock.speed());
    }

    /// Advances the clock by one frame, then resolves the frame at the new
    /// virtual time. Time stands still when there is nothing to play.
    pub fn tick(&mut self, real_delta: f64) -> Frame {
        if self.store.max_end_time() > 0.0 {
            self.clock.advance(real_delta);
        }
        self.frame()
    }

    /// Resolves the current virtual time without advancing the clock.
    pub fn frame(&mut self) -> Frame {
        let time = self.clock.virtual_time();

        let mut poses = Vec::with_capacity(self.store.vehicles.len());
        for (trajectory, heading) in self.store.vehicles.iter().zip(self.headings.iter_mut()) {
            if let Some(pose) = resolve_vehicle_pose(trajectory, time, *heading) {
                *heading = pose.heading;
                poses.push(pose);
            }
        }

        let mut signal_states = BTreeMap::new();
        for light in &self.store.traffic_lights {
            signal_states.extend(resolve_signal_states(
                &light.schedule,
                time,
                &self.signal_connections,
                &self.directions,
            ));
        }

        Frame {
            virtual_time: time,
            poses,
            signal_states,
            metrics: compute_metrics(time, &self.store.vehicles),
        }
    }
}
