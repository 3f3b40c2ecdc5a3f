//! Scene-space geometry for a renderer: centering, road strips, signal heads.

use crate::data::{Point, RoadEdge, TrajectoryStore, Vec2};
use crate::playback::SignalColor;
use std::collections::BTreeMap;
use std::f64::consts::FRAC_PI_2;

pub mod colors;
pub mod overlay;

pub use colors::*;
pub use overlay::*;

pub const DEFAULT_ROAD_LANE_WIDTH: f64 = 10.0;
pub const SIGNAL_LANE_WIDTH: f64 = 3.5;
pub const SIGNAL_SETBACK: f64 = 5.0;
pub const LANE_DASH_SPACING: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Extent {
    min: Point,
    max: Point,
}

impl Extent {
    fn of(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self { min: first, max: first }, |e, p| Self {
            min: Point::new(e.min.x.min(p.x), e.min.y.min(p.y)),
            max: Point::new(e.max.x.max(p.x), e.max.y.max(p.y)),
        }))
    }

    fn center(&self) -> Point {
        nalgebra::center(&self.min, &self.max)
    }
}

/// Centers used to place roads and vehicles around the scene origin. Roads
/// are centered on the node extent, vehicles on their own sample extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBounds {
    pub road_center: Point,
    pub vehicle_offset: Point,
}

impl SceneBounds {
    pub fn from_store(store: &TrajectoryStore) -> Self {
        let road_center = Extent::of(store.nodes.iter().map(|n| n.position()))
            .map_or(Point::origin(), |e| e.center());
        let vehicle_offset = Extent::of(
            store
                .vehicles
                .iter()
                .flat_map(|v| v.samples.iter().map(|s| s.position())),
        )
        .map_or(Point::origin(), |e| e.center());

        Self {
            road_center,
            vehicle_offset,
        }
    }

    pub fn vehicle_to_scene(&self, position: &Point) -> Point {
        Point::from(position - self.vehicle_offset)
    }

    pub fn road_to_scene(&self, position: &Point) -> Point {
        Point::from(position - self.road_center)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoadSegment {
    pub edge_id: String,
    pub start: Point,
    pub end: Point,
    pub length: f64,
    /// Radians from +x.
    pub angle: f64,
    pub width: f64,
    /// Lateral offsets of the dashed lane dividers from the road centerline.
    pub divider_offsets: Vec<f64>,
    pub dashes_per_divider: usize,
}

impl RoadSegment {
    pub fn midpoint(&self) -> Point {
        nalgebra::center(&self.start, &self.end)
    }
}

pub fn road_segments(store: &TrajectoryStore, bounds: &SceneBounds, lane_width: f64) -> Vec<RoadSegment> {
    store
        .edges
        .iter()
        .filter_map(|edge| road_segment(store, edge, bounds, lane_width))
        .collect()
}

fn edge_endpoints(store: &TrajectoryStore, edge: &RoadEdge, bounds: &SceneBounds) -> Option<(Point, Point)> {
    let (Some(from), Some(to)) = (store.node(&edge.from_node_id), store.node(&edge.to_node_id)) else {
        log::debug!("Edge {} references a missing node; not drawn", edge.id);
        return None;
    };
    Some((
        bounds.road_to_scene(&from.position()),
        bounds.road_to_scene(&to.position()),
    ))
}

fn road_segment(
    store: &TrajectoryStore,
    edge: &RoadEdge,
    bounds: &SceneBounds,
    lane_width: f64,
) -> Option<RoadSegment> {
    let (start, end) = edge_endpoints(store, edge, bounds)?;
    let direction: Vec2 = end - start;
    let lanes = edge.lane_count.max(1);
    let width = f64::from(lanes) * lane_width;

    let divider_offsets = if lanes == 1 {
        vec![0.0]
    } else {
        (1..lanes)
            .map(|i| f64::from(i) * lane_width - width / 2.0)
            .collect()
    };

    Some(RoadSegment {
        edge_id: edge.id.clone(),
        start,
        end,
        length: direction.norm(),
        angle: direction.y.atan2(direction.x),
        width,
        divider_offsets,
        dashes_per_divider: (direction.norm() / LANE_DASH_SPACING).floor() as usize,
    })
}

/// Where to draw one approach's signal head: set back from the stop end of
/// the edge and shifted to the curb side.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalHead {
    pub edge_id: String,
    pub position: Point,
    pub rotation: f64,
    pub color: SignalColor,
}

pub fn signal_heads(
    store: &TrajectoryStore,
    bounds: &SceneBounds,
    edge_colors: &BTreeMap<&str, SignalColor>,
) -> Vec<SignalHead> {
    edge_colors
        .iter()
        .filter_map(|(edge_id, color)| {
            let edge = store.edge(edge_id)?;
            let (start, end) = edge_endpoints(store, edge, bounds)?;
            let direction = (end - start).try_normalize(f64::EPSILON)?;
            let perpendicular = Vec2::new(-direction.y, direction.x);
            let curb_offset = f64::from(edge.lane_count) * SIGNAL_LANE_WIDTH / 2.0 + 1.0;
            let angle = direction.y.atan2(direction.x);

            Some(SignalHead {
                edge_id: edge.id.clone(),
                position: end - direction * SIGNAL_SETBACK + perpendicular * curb_offset,
                rotation: -angle + FRAC_PI_2,
                color: *color,
            })
        })
        .collect()
}
