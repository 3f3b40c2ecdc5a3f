use crate::data::{max_end_time, VehicleTrajectory};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub active_vehicles: usize,
    pub completed_vehicles: usize,
    pub total_vehicles: usize,
    /// Mean speed of active vehicles, m/s.
    pub avg_speed: f64,
    /// Fraction of the longest trajectory played, in `[0, 1]`.
    pub progress: f64,
    pub total_sim_time: f64,
}

/// Speed of the last sample at or before `time`, or of the first sample when
/// `time` precedes the trajectory.
pub fn speed_at(trajectory: &VehicleTrajectory, time: f64) -> Option<f64> {
    let samples = &trajectory.samples;
    let after = samples.partition_point(|s| s.time <= time);
    samples.get(after.saturating_sub(1)).map(|s| s.speed)
}

pub fn compute_metrics(virtual_time: f64, trajectories: &[VehicleTrajectory]) -> MetricsSnapshot {
    let mut active_vehicles = 0;
    let mut completed_vehicles = 0;
    let mut speed_sum = 0.0;

    for trajectory in trajectories {
        if trajectory.is_active_at(virtual_time) {
            active_vehicles += 1;
            speed_sum += speed_at(trajectory, virtual_time).unwrap_or(0.0);
        } else if trajectory.is_completed_at(virtual_time) {
            completed_vehicles += 1;
        }
    }

    let total_sim_time = max_end_time(trajectories);
    let avg_speed = if active_vehicles > 0 {
        speed_sum / active_vehicles as f64
    } else {
        0.0
    };
    let progress = if total_sim_time > 0.0 {
        (virtual_time / total_sim_time).clamp(0.0, 1.0)
    } else {
        0.0
    };

    MetricsSnapshot {
        active_vehicles,
        completed_vehicles,
        total_vehicles: trajectories.len(),
        avg_speed,
        progress,
        total_sim_time,
    }
}
