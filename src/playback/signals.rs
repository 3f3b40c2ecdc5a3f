use crate::config::{Approach, RoadDirections};
use crate::data::{LaneConnection, SignalSchedule};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SignalColor {
    Green,
    Yellow,
    Red,
}

impl SignalColor {
    /// Reads one state-string character. `u` (red-yellow) counts as yellow;
    /// anything unrecognised is red.
    pub fn from_state_char(c: char) -> Self {
        match c.to_ascii_lowercase() {
            'g' => SignalColor::Green,
            'y' | 'u' => SignalColor::Yellow,
            _ => SignalColor::Red,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            SignalColor::Green => 'g',
            SignalColor::Yellow => 'y',
            SignalColor::Red => 'r',
        }
    }

    /// Green wins over yellow, yellow over red.
    fn priority(self) -> u8 {
        match self {
            SignalColor::Green => 2,
            SignalColor::Yellow => 1,
            SignalColor::Red => 0,
        }
    }
}

impl fmt::Display for SignalColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Aggregate color per approach edge. An edge is green as soon as one of its
/// lane movements is green.
pub fn resolve_edge_colors<'a>(
    schedule: &SignalSchedule,
    virtual_time: f64,
    connections: &'a [LaneConnection],
) -> BTreeMap<&'a str, SignalColor> {
    let mut colors: BTreeMap<&str, SignalColor> = BTreeMap::new();
    let Some(state) = schedule.state_at(virtual_time) else {
        return colors;
    };
    let state: Vec<char> = state.chars().collect();

    for connection in connections.iter().filter(|c| c.is_external()) {
        let color = state
            .get(connection.signal_index)
            .copied()
            .map_or(SignalColor::Red, SignalColor::from_state_char);

        colors
            .entry(connection.from_edge_id.as_str())
            .and_modify(|current| {
                if color.priority() > current.priority() {
                    *current = color;
                }
            })
            .or_insert(color);
    }

    colors
}

pub fn resolve_signal_states(
    schedule: &SignalSchedule,
    virtual_time: f64,
    connections: &[LaneConnection],
    directions: &RoadDirections,
) -> BTreeMap<Approach, SignalColor> {
    resolve_edge_colors(schedule, virtual_time, connections)
        .into_iter()
        .filter_map(|(edge_id, color)| directions.get(edge_id).map(|approach| (approach, color)))
        .collect()
}
