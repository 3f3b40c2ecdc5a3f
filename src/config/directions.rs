use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Compass direction an approach road feeds the intersection from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum Approach {
    North,
    South,
    East,
    West,
}

impl Approach {
    pub const ALL: [Approach; 4] = [Approach::North, Approach::South, Approach::East, Approach::West];

    pub fn label(self) -> &'static str {
        match self {
            Approach::North => "North",
            Approach::South => "South",
            Approach::East => "East",
            Approach::West => "West",
        }
    }

    pub fn is_north_south(self) -> bool {
        matches!(self, Approach::North | Approach::South)
    }
}

impl fmt::Display for Approach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Edge id -> approach label, supplied by the hosting page.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RoadDirections(BTreeMap<String, Approach>);

impl RoadDirections {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, edge_id: impl Into<String>, approach: Approach) {
        self.0.insert(edge_id.into(), approach);
    }

    pub fn get(&self, edge_id: &str) -> Option<Approach> {
        self.0.get(edge_id).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Approach)> {
        self.0.iter().map(|(edge, approach)| (edge.as_str(), *approach))
    }
}

impl Default for RoadDirections {
    // Approach edges of the generated four-way traffic light intersection.
    fn default() -> Self {
        [
            ("in_n2_1", Approach::North),
            ("in_n3_1", Approach::South),
            ("in_n4_1", Approach::West),
            ("in_n5_1", Approach::East),
        ]
        .into_iter()
        .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, Approach)> for RoadDirections {
    fn from_iter<I: IntoIterator<Item = (S, Approach)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(edge, approach)| (edge.into(), approach)).collect())
    }
}
