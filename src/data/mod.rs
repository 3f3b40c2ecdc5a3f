//! Typed, read-only simulation payload.
//!
//! A [`TrajectoryStore`] is built once per fetched payload and never mutated
//! afterwards; playback sessions share it through an `Arc`.

use nalgebra::{Point2, Vector2};
use serde::Serialize;

pub mod loader;
pub mod payload;
pub mod signals;

pub use loader::*;
pub use payload::*;
pub use signals::*;

pub type Point = Point2<f64>;
pub type Vec2 = Vector2<f64>;

/// Junction marker SUMO puts in the ids of edges internal to an intersection.
pub const INTERNAL_EDGE_MARKER: char = ':';

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub kind: String,
}

impl RoadNode {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadEdge {
    pub id: String,
    pub from_node_id: String,
    pub to_node_id: String,
    pub speed_limit: f64,
    pub lane_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub time: f64,
    pub x: f64,
    pub y: f64,
    pub speed: f64,
}

impl Sample {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Recorded samples of one vehicle, strictly increasing in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleTrajectory {
    pub vehicle_id: String,
    pub samples: Vec<Sample>,
}

impl VehicleTrajectory {
    pub fn start_time(&self) -> Option<f64> {
        self.samples.first().map(|s| s.time)
    }

    pub fn end_time(&self) -> Option<f64> {
        self.samples.last().map(|s| s.time)
    }

    pub fn is_active_at(&self, time: f64) -> bool {
        match (self.start_time(), self.end_time()) {
            (Some(start), Some(end)) => start <= time && time <= end,
            _ => false,
        }
    }

    pub fn is_completed_at(&self, time: f64) -> bool {
        self.end_time().is_some_and(|end| end < time)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaneConnection {
    pub from_edge_id: String,
    pub to_edge_id: String,
    pub from_lane_index: u32,
    pub to_lane_index: u32,
    pub signal_index: usize,
}

impl LaneConnection {
    /// Whether this movement starts on a road feeding the intersection rather
    /// than on an internal junction link.
    pub fn is_external(&self) -> bool {
        !self.from_edge_id.contains(INTERNAL_EDGE_MARKER)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficLight {
    pub id: String,
    pub phases: Vec<SignalPhase>,
    pub schedule: SignalSchedule,
}

/// Aggregate figures reported by the backend alongside the trajectories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SimulationResults {
    pub average_speed: f64,
    pub average_travel_time: f64,
    pub average_waiting_time: f64,
    pub total_vehicles: f64,
    pub total_travel_time: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrajectoryStore {
    pub nodes: Vec<RoadNode>,
    pub edges: Vec<RoadEdge>,
    pub vehicles: Vec<VehicleTrajectory>,
    pub traffic_lights: Vec<TrafficLight>,
    pub connections: Vec<LaneConnection>,
    pub results: Option<SimulationResults>,
}

impl TrajectoryStore {
    pub fn node(&self, id: &str) -> Option<&RoadNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&RoadEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn external_connections(&self) -> impl Iterator<Item = &LaneConnection> {
        self.connections.iter().filter(|c| c.is_external())
    }

    /// Latest last-sample time across all vehicles; 0 without data.
    pub fn max_end_time(&self) -> f64 {
        max_end_time(&self.vehicles)
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty() && self.edges.is_empty()
    }
}

pub fn max_end_time(trajectories: &[VehicleTrajectory]) -> f64 {
    trajectories
        .iter()
        .filter_map(VehicleTrajectory::end_time)
        .fold(0.0, f64::max)
}
