use anyhow::{anyhow, Result};
use clap::Parser;
use log::info;
use std::sync::Arc;
use std::time::Duration;

use traffic_playback::{
    compare::ComparisonView,
    config::PlaybackConfig,
    data::{load_in_background, subscribe, TrajectoryStore},
    playback::{run_duration, Frame, FrameTimer, PlaybackSession},
    scene::{assign_vehicle_colors, road_segments, OverlayPanel, SceneBounds, DEFAULT_ROAD_LANE_WIDTH},
};

#[derive(Parser)]
#[command(name = "traffic-playback")]
#[command(about = "Replays intersection simulation output and reports live playback metrics")]
struct Args {
    /// Simulation or optimization payload (JSON)
    #[arg(short, long)]
    payload: String,

    /// Second payload to play side by side (e.g. the optimized run)
    #[arg(long)]
    compare: Option<String>,

    /// Playback configuration file
    #[arg(short, long, default_value = "playback.toml")]
    config: String,

    /// Playback speed multiplier
    #[arg(short, long)]
    speed: Option<f64>,

    /// Real seconds to run; defaults to the time needed to play to the end
    #[arg(short, long)]
    duration: Option<f64>,

    /// Use fixed frame deltas and skip frame pacing
    #[arg(long)]
    fast: bool,

    /// Print the final frame as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging for detailed playback progress
    #[arg(short, long)]
    verbose: bool,
}

fn load_store(path: &str, config: &PlaybackConfig) -> Result<Arc<TrajectoryStore>> {
    let (subscriber, delivery) = subscribe();
    let worker = load_in_background(path, config.clone(), delivery);

    info!("Loading simulation from {}...", path);
    if worker.join().is_err() {
        return Err(anyhow!("Payload loader for {} panicked", path));
    }

    match subscriber.try_take() {
        Some(Ok(store)) => Ok(store),
        Some(Err(e)) => Err(anyhow!("Error loading simulation data from {}: {}", path, e)),
        None => Err(anyhow!("Payload loader for {} finished without a result", path)),
    }
}

fn log_scene(store: &TrajectoryStore, config: &PlaybackConfig) {
    let bounds = SceneBounds::from_store(store);
    let lane_width = config.scene.road_lane_width.unwrap_or(DEFAULT_ROAD_LANE_WIDTH);
    let segments = road_segments(store, &bounds, lane_width);
    let colors = assign_vehicle_colors(store.vehicles.len(), config.scene.seed);

    log::debug!(
        "Scene: road center ({:.1}, {:.1}), vehicle offset ({:.1}, {:.1})",
        bounds.road_center.x,
        bounds.road_center.y,
        bounds.vehicle_offset.x,
        bounds.vehicle_offset.y
    );
    for segment in &segments {
        log::debug!(
            "Road {}: {:.1}m long, {:.1}m wide, {} lane dividers",
            segment.edge_id,
            segment.length,
            segment.width,
            segment.divider_offsets.len()
        );
    }
    log::debug!("Assigned {} vehicle colors", colors.len());
}

fn log_frame(label: &str, frame: &Frame, session: &PlaybackSession) {
    let panel = OverlayPanel::build(frame, session.clock());
    info!("[{}] {}", label, panel.lines.join(" | "));
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info })
        .init();
    info!("Starting Traffic Playback");

    let config = PlaybackConfig::load_or_default(&args.config)?;

    let original = load_store(&args.payload, &config)?;
    log_scene(&original, &config);

    let optimized = match &args.compare {
        Some(path) => {
            let store = load_store(path, &config)?;
            log_scene(&store, &config);
            Some(store)
        }
        None => None,
    };

    let mut view = match optimized {
        Some(optimized) => ComparisonView::new(Arc::clone(&original), optimized, &config),
        None => ComparisonView::single(Arc::clone(&original), &config),
    };

    if let Some(speed) = args.speed {
        view.set_speed(speed);
    }

    let speed = view.original.clock().speed();
    let run_for = run_duration(args.duration, view.max_end_time(), speed)?;
    let frame_delta = config.playback.frame_delta();

    info!("=== Playback Configuration ===");
    info!("Payload: {}", args.payload);
    if let Some(path) = &args.compare {
        info!("Comparing against: {}", path);
    }
    info!("Speed: {}x, frame rate {:.0} Hz", speed, config.playback.frame_rate);
    info!("Running for {:.1}s ({})", run_for, if args.fast { "fast" } else { "real time" });

    let mut timer = FrameTimer::new(120);
    let mut elapsed = 0.0;
    let mut next_report = 0.0;
    let mut frame_count: u64 = 0;
    timer.begin_frame();

    let last = loop {
        let measured = timer.begin_frame();
        let delta = if args.fast { frame_delta } else { measured };
        elapsed += delta;

        timer.start_resolve();
        let frames = view.tick(delta);
        timer.end_resolve();
        frame_count += 1;

        if elapsed >= next_report {
            log_frame("original", &frames.original, &view.original);
            if let (Some(frame), Some(session)) = (&frames.optimized, &view.optimized) {
                log_frame("optimized", frame, session);
            }
            log::debug!(
                "Frame {}: {:.1} FPS, resolve {:.3}ms",
                frame_count,
                timer.fps(),
                timer.average_resolve_time().as_secs_f64() * 1000.0
            );
            next_report += 1.0;
        }

        if elapsed >= run_for {
            break frames;
        }

        if !args.fast {
            std::thread::sleep(Duration::from_secs_f64(frame_delta));
        }
    };

    info!("Playback finished after {} frames", frame_count);
    log_frame("original", &last.original, &view.original);
    if let (Some(frame), Some(session)) = (&last.optimized, &view.optimized) {
        log_frame("optimized", frame, session);
        if let Some(delta) = view.results_delta() {
            info!(
                "Optimized vs original: avg speed {:+.2} m/s, avg travel time {:+.2} s, avg waiting time {:+.2} s",
                delta.average_speed, delta.average_travel_time, delta.average_waiting_time
            );
        }
    }
    if let Some(results) = &original.results {
        info!(
            "Backend results: {} vehicles, avg speed {:.2} m/s, avg travel {:.1} s, avg waiting {:.1} s",
            results.total_vehicles, results.average_speed, results.average_travel_time, results.average_waiting_time
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&last.original)?);
    }

    Ok(())
}
