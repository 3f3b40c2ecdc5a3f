#![allow(dead_code)]

use traffic_playback::config::{PlaybackConfig, RoadDirections, SignalTiming};
use traffic_playback::data::{Sample, TrajectoryStore, VehicleTrajectory};

pub const DEMO_PAYLOAD: &str = "demos/intersection.json";

pub fn trajectory(id: &str, samples: &[(f64, f64, f64, f64)]) -> VehicleTrajectory {
    VehicleTrajectory {
        vehicle_id: id.to_string(),
        samples: samples
            .iter()
            .map(|&(time, x, y, speed)| Sample { time, x, y, speed })
            .collect(),
    }
}

pub fn demo_store() -> anyhow::Result<TrajectoryStore> {
    Ok(TrajectoryStore::load_from_file(DEMO_PAYLOAD, &PlaybackConfig::default())?)
}

pub fn parse(json: &str) -> anyhow::Result<TrajectoryStore> {
    Ok(TrajectoryStore::from_json_str(
        json,
        &SignalTiming::default(),
        &RoadDirections::default(),
    )?)
}
