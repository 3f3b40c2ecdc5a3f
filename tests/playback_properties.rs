mod common;

use anyhow::Result;
use common::{demo_store, trajectory};
use traffic_playback::playback::{
    compute_metrics, resolve_vehicle_pose, speed_at, MetricsSnapshot, PlaybackClock,
};

/// A pose queried exactly at the first sample time sits on that sample
#[test]
fn test_pose_at_first_sample_is_exact() {
    let vehicle = trajectory(
        "v",
        &[(1.5, 3.7, -12.25, 4.0), (2.0, 9.1, 4.4, 6.0), (4.0, 20.3, 8.8, 5.0)],
    );

    let pose = resolve_vehicle_pose(&vehicle, 1.5, 0.0).expect("vehicle should be visible");
    assert_eq!(pose.position.x, 3.7);
    assert_eq!(pose.position.y, -12.25);
    assert_eq!(pose.speed, 4.0);
}

/// Vehicles outside their recorded time range are not rendered
#[test]
fn test_pose_absent_outside_trajectory() {
    let vehicle = trajectory("v", &[(2.0, 0.0, 0.0, 1.0), (6.0, 8.0, 0.0, 1.0)]);

    assert!(resolve_vehicle_pose(&vehicle, 1.99, 0.0).is_none());
    assert!(resolve_vehicle_pose(&vehicle, 6.01, 0.0).is_none());
    assert!(resolve_vehicle_pose(&vehicle, -100.0, 0.0).is_none());
    // Half-open bracket: the final sample has no successor to interpolate to
    assert!(resolve_vehicle_pose(&vehicle, 6.0, 0.0).is_none());

    let single = trajectory("single", &[(1.0, 5.0, 5.0, 0.0)]);
    assert!(resolve_vehicle_pose(&single, 1.0, 0.0).is_none());
}

#[test]
fn test_pose_midpoint_interpolation() {
    let vehicle = trajectory("v", &[(0.0, 0.0, 0.0, 10.0), (10.0, 100.0, 0.0, 10.0)]);

    let pose = resolve_vehicle_pose(&vehicle, 5.0, 0.0).expect("vehicle should be visible");
    assert_eq!(pose.position.x, 50.0);
    assert_eq!(pose.position.y, 0.0);
    assert_eq!(pose.heading, 0.0);
    assert_eq!(speed_at(&vehicle, 5.0), Some(10.0));
}

/// Heading follows the segment direction and holds still while stopped
#[test]
fn test_heading_kept_while_stationary() {
    let vehicle = trajectory(
        "v",
        &[
            (0.0, 0.0, 0.0, 5.0),
            (4.0, 0.0, 20.0, 0.0),
            (10.0, 0.005, 20.0, 0.0),
            (12.0, -10.0, 20.0, 5.0),
        ],
    );

    let moving = resolve_vehicle_pose(&vehicle, 2.0, 0.0).expect("visible");
    assert!((moving.heading - std::f64::consts::FRAC_PI_2).abs() < 1e-12);

    let stopped = resolve_vehicle_pose(&vehicle, 7.0, moving.heading).expect("visible");
    assert_eq!(stopped.heading, moving.heading);
    assert_eq!(stopped.speed, 0.0);

    let turning = resolve_vehicle_pose(&vehicle, 11.0, stopped.heading).expect("visible");
    assert!((turning.heading - std::f64::consts::PI).abs() < 1e-3);
}

#[test]
fn test_speed_lookup_uses_last_sample_at_or_before() {
    let vehicle = trajectory(
        "v",
        &[(2.0, 0.0, 0.0, 3.0), (4.0, 1.0, 0.0, 7.0), (6.0, 2.0, 0.0, 9.0)],
    );

    assert_eq!(speed_at(&vehicle, 0.0), Some(3.0));
    assert_eq!(speed_at(&vehicle, 2.0), Some(3.0));
    assert_eq!(speed_at(&vehicle, 5.9), Some(7.0));
    assert_eq!(speed_at(&vehicle, 6.0), Some(9.0));
    assert_eq!(speed_at(&vehicle, 60.0), Some(9.0));
    assert_eq!(speed_at(&trajectory("empty", &[]), 1.0), None);
}

#[test]
fn test_empty_vehicle_list_reports_zero_metrics() {
    let metrics = compute_metrics(12.0, &[]);

    assert_eq!(metrics, MetricsSnapshot::default());
    assert_eq!(metrics.active_vehicles, 0);
    assert_eq!(metrics.completed_vehicles, 0);
    assert_eq!(metrics.avg_speed, 0.0);
    assert_eq!(metrics.progress, 0.0);
    assert_eq!(metrics.total_sim_time, 0.0);
}

#[test]
fn test_finished_vehicle_counts_as_completed() {
    let vehicles = vec![trajectory("v", &[(0.0, 0.0, 0.0, 8.0), (20.0, 100.0, 0.0, 8.0)])];

    let metrics = compute_metrics(25.0, &vehicles);
    assert_eq!(metrics.completed_vehicles, 1);
    assert_eq!(metrics.active_vehicles, 0);
    assert_eq!(metrics.avg_speed, 0.0);
    assert_eq!(metrics.progress, 1.0);

    // Still active exactly at its final sample
    let at_end = compute_metrics(20.0, &vehicles);
    assert_eq!(at_end.active_vehicles, 1);
    assert_eq!(at_end.completed_vehicles, 0);
}

#[test]
fn test_metrics_on_demo_payload() -> Result<()> {
    let store = demo_store()?;

    let metrics = compute_metrics(25.0, &store.vehicles);
    assert_eq!(metrics.total_vehicles, 3);
    assert_eq!(metrics.completed_vehicles, 1);
    assert_eq!(metrics.active_vehicles, 2);
    // veh1 is queued at 0 m/s, veh2 entered at 12 m/s
    assert_eq!(metrics.avg_speed, 6.0);
    assert_eq!(metrics.total_sim_time, 48.0);
    assert!((metrics.progress - 25.0 / 48.0).abs() < 1e-12);

    let before_spawn = compute_metrics(-1.0, &store.vehicles);
    assert_eq!(before_spawn.active_vehicles, 0);
    assert_eq!(before_spawn.completed_vehicles, 0);
    Ok(())
}

/// Metric computation holds no hidden state
#[test]
fn test_metrics_are_idempotent() -> Result<()> {
    let store = demo_store()?;

    for time in [0.0, 4.0, 17.5, 30.0, 48.0, 90.0] {
        let first = compute_metrics(time, &store.vehicles);
        let second = compute_metrics(time, &store.vehicles);
        assert_eq!(first, second, "metrics differ at t={}", time);
    }
    Ok(())
}

#[test]
fn test_progress_is_monotonic_and_clamped() -> Result<()> {
    let store = demo_store()?;
    let total = store.max_end_time();

    let mut previous = 0.0;
    for step in 0..=160 {
        let time = step as f64 * 0.5;
        let progress = compute_metrics(time, &store.vehicles).progress;
        assert!(progress >= previous, "progress decreased at t={}", time);
        if time >= total {
            assert_eq!(progress, 1.0);
        }
        previous = progress;
    }
    Ok(())
}

#[test]
fn test_clock_scales_by_speed_and_pauses() {
    let mut clock = PlaybackClock::new(5.0, true);

    clock.advance(1.0);
    assert_eq!(clock.virtual_time(), 5.0);

    clock.set_speed(2.0);
    assert_eq!(clock.virtual_time(), 5.0, "speed change must not rescale elapsed time");
    clock.advance(0.5);
    assert_eq!(clock.virtual_time(), 6.0);

    clock.set_playing(false);
    clock.advance(10.0);
    assert_eq!(clock.virtual_time(), 6.0);

    clock.set_playing(true);
    clock.advance(f64::NAN);
    clock.advance(-1.0);
    assert_eq!(clock.virtual_time(), 6.0);
}

#[test]
fn test_clock_restart_keeps_speed_and_play_state() {
    let mut clock = PlaybackClock::new(3.0, true);
    clock.advance(2.0);
    clock.set_playing(false);

    clock.restart();
    assert_eq!(clock.virtual_time(), 0.0);
    assert_eq!(clock.speed(), 3.0);
    assert!(!clock.is_playing());
}

#[test]
fn test_clock_rejects_non_positive_speed() {
    let mut clock = PlaybackClock::new(4.0, true);
    clock.set_speed(0.0);
    clock.set_speed(-2.0);
    clock.set_speed(f64::INFINITY);
    assert_eq!(clock.speed(), 4.0);
}
