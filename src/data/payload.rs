use super::{
    synthesize_default_phases, LaneConnection, RoadEdge, RoadNode, Sample, SignalPhase,
    SignalSchedule, SimulationResults, TrafficLight, TrajectoryStore, VehicleTrajectory,
};
use crate::config::{PlaybackConfig, RoadDirections, SignalTiming};
use crate::error::PayloadError;
use serde::Deserialize;
use std::path::Path;

// Wire shapes of the backend payload. Only this module sees them.

#[derive(Debug, Default, Deserialize)]
struct RawOutput {
    #[serde(default)]
    vehicles: Vec<RawVehicle>,
    #[serde(default)]
    intersection: RawIntersection,
}

#[derive(Debug, Default, Deserialize)]
struct RawIntersection {
    #[serde(default)]
    nodes: Vec<RawNode>,
    #[serde(default)]
    edges: Vec<RawEdge>,
    #[serde(rename = "trafficLights", default)]
    traffic_lights: Option<Vec<RawTrafficLight>>,
    #[serde(default)]
    connections: Vec<RawConnection>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    id: String,
    x: f64,
    y: f64,
    #[serde(rename = "type", default)]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct RawEdge {
    id: String,
    from: String,
    to: String,
    #[serde(default)]
    speed: f64,
    #[serde(default = "default_lanes")]
    lanes: u32,
}

fn default_lanes() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct RawVehicle {
    id: String,
    #[serde(default)]
    positions: Vec<RawPosition>,
}

#[derive(Debug, Deserialize)]
struct RawPosition {
    time: f64,
    x: f64,
    y: f64,
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct RawTrafficLight {
    id: String,
    #[serde(default)]
    phases: Vec<RawPhase>,
}

#[derive(Debug, Deserialize)]
struct RawPhase {
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawConnection {
    from: String,
    to: String,
    #[serde(rename = "fromLane", default)]
    from_lane: u32,
    #[serde(rename = "toLane", default)]
    to_lane: u32,
    #[serde(default)]
    tl: Option<serde_json::Value>,
}

/// `tl` arrives as a number or a numeric string depending on the backend.
fn signal_index(tl: &serde_json::Value) -> Option<usize> {
    match tl {
        serde_json::Value::Number(n) => n.as_u64().and_then(|i| usize::try_from(i).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl TrajectoryStore {
    pub fn load_from_file(
        path: impl AsRef<Path>,
        config: &PlaybackConfig,
    ) -> Result<Self, PayloadError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let store = Self::from_json_str(&content, &config.signals, &config.directions)?;
        log::info!(
            "Loaded payload {}: {} vehicles, {} edges, {} traffic lights, {:.1}s of playback",
            path.as_ref().display(),
            store.vehicles.len(),
            store.edges.len(),
            store.traffic_lights.len(),
            store.max_end_time()
        );
        Ok(store)
    }

    /// Parses either the wrapped `{output, results}` payload or a bare
    /// `{vehicles, intersection}` document.
    pub fn from_json_str(
        json: &str,
        timing: &SignalTiming,
        directions: &RoadDirections,
    ) -> Result<Self, PayloadError> {
        let mut document: serde_json::Value = serde_json::from_str(json)?;

        let results = match document.get_mut("results").map(serde_json::Value::take) {
            Some(value) if !value.is_null() => Some(serde_json::from_value::<SimulationResults>(value)?),
            _ => None,
        };
        let output = match document.get_mut("output").map(serde_json::Value::take) {
            Some(output) => output,
            None => document,
        };
        let raw: RawOutput = if output.is_null() {
            RawOutput::default()
        } else {
            serde_json::from_value(output)?
        };

        Ok(Self::from_raw(raw, results, timing, directions))
    }

    fn from_raw(
        raw: RawOutput,
        results: Option<SimulationResults>,
        timing: &SignalTiming,
        directions: &RoadDirections,
    ) -> Self {
        let RawIntersection {
            nodes,
            edges,
            traffic_lights,
            connections,
        } = raw.intersection;

        let nodes = nodes
            .into_iter()
            .map(|n| RoadNode {
                id: n.id,
                x: n.x,
                y: n.y,
                kind: n.kind,
            })
            .collect();

        let edges = edges
            .into_iter()
            .map(|e| RoadEdge {
                id: e.id,
                from_node_id: e.from,
                to_node_id: e.to,
                speed_limit: e.speed,
                lane_count: e.lanes,
            })
            .collect();

        let connections: Vec<LaneConnection> = connections
            .into_iter()
            .filter_map(|c| {
                let Some(signal_index) = c.tl.as_ref().and_then(signal_index) else {
                    log::warn!(
                        "Dropping connection {} -> {}: missing or invalid signal index",
                        c.from,
                        c.to
                    );
                    return None;
                };
                Some(LaneConnection {
                    from_edge_id: c.from,
                    to_edge_id: c.to,
                    from_lane_index: c.from_lane,
                    to_lane_index: c.to_lane,
                    signal_index,
                })
            })
            .collect();

        let vehicles = raw.vehicles.into_iter().map(normalize_vehicle).collect();

        let traffic_lights = traffic_lights
            .unwrap_or_default()
            .into_iter()
            .map(|light| build_light(light, &connections, directions, timing))
            .collect();

        Self {
            nodes,
            edges,
            vehicles,
            traffic_lights,
            connections,
            results,
        }
    }
}

/// Sorts samples by time and collapses duplicate timestamps so the bracket
/// search can rely on strictly increasing times.
fn normalize_vehicle(raw: RawVehicle) -> VehicleTrajectory {
    let mut samples: Vec<Sample> = raw
        .positions
        .into_iter()
        .filter(|p| p.time.is_finite())
        .map(|p| Sample {
            time: p.time,
            x: p.x,
            y: p.y,
            speed: p.speed,
        })
        .collect();

    if samples.windows(2).any(|w| w[0].time >= w[1].time) {
        log::warn!("Vehicle {} has out-of-order samples; sorting", raw.id);
        samples.sort_by(|a, b| a.time.total_cmp(&b.time));
        samples.dedup_by(|later, earlier| later.time == earlier.time);
    }

    VehicleTrajectory {
        vehicle_id: raw.id,
        samples,
    }
}

fn build_light(
    raw: RawTrafficLight,
    connections: &[LaneConnection],
    directions: &RoadDirections,
    timing: &SignalTiming,
) -> TrafficLight {
    let explicit = !raw.phases.is_empty()
        && raw.phases.iter().all(|p| {
            p.duration > 0.0 && p.state.as_deref().is_some_and(|s| !s.is_empty())
        });

    let phases = if explicit {
        raw.phases
            .into_iter()
            .map(|p| SignalPhase {
                duration_seconds: p.duration,
                state: p.state.unwrap_or_default(),
            })
            .collect()
    } else {
        synthesize_default_phases(connections, directions, timing)
    };

    if !connections.iter().any(LaneConnection::is_external) {
        log::debug!("Traffic light {} has no approach connections", raw.id);
    }

    let schedule = SignalSchedule::from_phases(&phases);
    TrafficLight {
        id: raw.id,
        phases,
        schedule,
    }
}
