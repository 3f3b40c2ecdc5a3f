use crate::playback::{Frame, PlaybackClock, SignalColor};

/// Plain-text rendering of the playback status panel.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPanel {
    pub lines: Vec<String>,
}

impl OverlayPanel {
    pub fn build(frame: &Frame, clock: &PlaybackClock) -> Self {
        let metrics = &frame.metrics;
        let percent = (metrics.progress * 100.0).round();
        let status = if clock.is_playing() { "PLAYING" } else { "PAUSED" };

        let mut lines = vec![
            format!("Status: {}", status),
            format!("Progress: {:.0}%", percent),
            format!("Time: {:.1} / {:.1} s", frame.virtual_time, metrics.total_sim_time),
            format!("Vehicles: {} total", metrics.total_vehicles),
            format!("Active: {}", metrics.active_vehicles),
            format!("Completed: {}", metrics.completed_vehicles),
            format!("Avg Speed: {:.1} km/h", metrics.avg_speed * 3.6),
        ];

        // Alphabetical by direction label
        let mut lights: Vec<(&str, SignalColor)> = frame
            .signal_states
            .iter()
            .map(|(approach, color)| (approach.label(), *color))
            .collect();
        lights.sort();
        for (label, color) in lights {
            lines.push(format!("Light {}: {}", label, color_name(color)));
        }

        lines.push(format!("Speed: {}x", clock.speed()));

        Self { lines }
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

fn color_name(color: SignalColor) -> &'static str {
    match color {
        SignalColor::Green => "green",
        SignalColor::Yellow => "yellow",
        SignalColor::Red => "red",
    }
}
