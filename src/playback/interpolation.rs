use super::metrics::speed_at;
use crate::data::{Point, VehicleTrajectory};
use serde::Serialize;

/// Below this per-axis displacement a segment is treated as a standstill and
/// the previous heading is kept.
pub const HEADING_EPSILON: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pose {
    pub vehicle_id: String,
    pub position: Point,
    /// Radians, counter-clockwise from +x in payload coordinates.
    pub heading: f64,
    pub speed: f64,
}

#[inline]
pub fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start * (1.0 - t) + end * t
}

/// Interpolated pose inside the half-open bracket `s[i].time <= t < s[i+1].time`.
/// Returns `None` before the first sample and from the last sample onwards.
pub fn resolve_vehicle_pose(
    trajectory: &VehicleTrajectory,
    virtual_time: f64,
    previous_heading: f64,
) -> Option<Pose> {
    let samples = &trajectory.samples;
    let next_index = samples.partition_point(|s| s.time <= virtual_time);
    if next_index == 0 || next_index >= samples.len() {
        return None;
    }
    let current = &samples[next_index - 1];
    let next = &samples[next_index];

    let interval = next.time - current.time;
    let t = if interval > 0.0 {
        (virtual_time - current.time) / interval
    } else {
        0.0
    };

    let position = Point::new(lerp(current.x, next.x, t), lerp(current.y, next.y, t));

    let dx = next.x - current.x;
    let dy = next.y - current.y;
    let heading = if dx.abs() > HEADING_EPSILON || dy.abs() > HEADING_EPSILON {
        dy.atan2(dx)
    } else {
        previous_heading
    };

    Some(Pose {
        vehicle_id: trajectory.vehicle_id.clone(),
        position,
        heading,
        speed: speed_at(trajectory, virtual_time).unwrap_or(current.speed),
    })
}
