use super::LaneConnection;
use crate::config::{Approach, RoadDirections, SignalTiming};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One fixed-duration segment of a light's cycle. `state` holds one
/// right-of-way character per signal index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalPhase {
    pub duration_seconds: f64,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEntry {
    pub time: f64,
    pub state: String,
}

/// Phase start times within one cycle, closed by an entry at the cycle time
/// carrying the first phase's state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SignalSchedule {
    entries: Vec<ScheduleEntry>,
}

impl SignalSchedule {
    pub fn from_phases(phases: &[SignalPhase]) -> Self {
        let Some(first) = phases.first() else {
            return Self::default();
        };

        let mut entries = Vec::with_capacity(phases.len() + 1);
        let mut time = 0.0;
        for phase in phases {
            entries.push(ScheduleEntry {
                time,
                state: phase.state.clone(),
            });
            time += phase.duration_seconds;
        }
        entries.push(ScheduleEntry {
            time,
            state: first.state.clone(),
        });

        Self { entries }
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total cycle time, the time of the closing entry.
    pub fn cycle_length(&self) -> f64 {
        self.entries.last().map_or(0.0, |e| e.time)
    }

    /// Active state string at `time`, wrapping around the cycle.
    pub fn state_at(&self, time: f64) -> Option<&str> {
        let cycle = self.cycle_length();
        let local = if cycle > 0.0 { time.rem_euclid(cycle) } else { time };

        // Entry times are non-decreasing; before the first entry the first state holds.
        let started = self.entries.partition_point(|entry| entry.time <= local);
        let active = self.entries.get(started.saturating_sub(1))?;
        Some(active.state.as_str())
    }
}

/// Builds the NS-green, NS-yellow, EW-green, EW-yellow cycle from the lane
/// connection table.
pub fn synthesize_default_phases(
    connections: &[LaneConnection],
    directions: &RoadDirections,
    timing: &SignalTiming,
) -> Vec<SignalPhase> {
    let mut indices_by_approach: BTreeMap<Approach, BTreeSet<usize>> = BTreeMap::new();
    let mut max_index: Option<usize> = None;

    for connection in connections.iter().filter(|c| c.is_external()) {
        if let Some(approach) = directions.get(&connection.from_edge_id) {
            indices_by_approach
                .entry(approach)
                .or_default()
                .insert(connection.signal_index);
        }
        max_index = max_index.max(Some(connection.signal_index));
    }

    let state_length = max_index.map_or(timing.fallback_state_length, |i| i + 1);

    let build_state = |north_south: bool, lit: char| -> String {
        let mut state = vec!['r'; state_length];
        for (approach, indices) in &indices_by_approach {
            if approach.is_north_south() != north_south {
                continue;
            }
            for &index in indices {
                state[index] = lit;
            }
        }
        state.into_iter().collect()
    };

    log::debug!(
        "Synthesizing default signal cycle: {} signal indices, {:.0}s cycle",
        state_length,
        timing.cycle_length()
    );

    vec![
        SignalPhase {
            duration_seconds: timing.ns_green,
            state: build_state(true, 'G'),
        },
        SignalPhase {
            duration_seconds: timing.ns_yellow,
            state: build_state(true, 'y'),
        },
        SignalPhase {
            duration_seconds: timing.ew_green,
            state: build_state(false, 'G'),
        },
        SignalPhase {
            duration_seconds: timing.ew_yellow,
            state: build_state(false, 'y'),
        },
    ]
}
