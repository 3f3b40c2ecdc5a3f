mod common;

use anyhow::Result;
use common::{demo_store, parse, DEMO_PAYLOAD};
use traffic_playback::config::{Approach, PlaybackConfig};
use traffic_playback::data::{load_in_background, subscribe, TrajectoryStore};
use traffic_playback::error::PayloadError;

#[test]
fn test_demo_payload_shape() -> Result<()> {
    let store = demo_store()?;

    assert_eq!(store.nodes.len(), 5);
    assert_eq!(store.edges.len(), 8);
    assert_eq!(store.vehicles.len(), 3);
    assert_eq!(store.traffic_lights.len(), 1);
    assert_eq!(store.connections.len(), 9);
    assert_eq!(store.external_connections().count(), 8);

    let edge = store.edge("in_n2_1").expect("edge should exist");
    assert_eq!(edge.from_node_id, "n2");
    assert_eq!(edge.to_node_id, "1");
    assert_eq!(edge.lane_count, 2);
    assert_eq!(store.node("1").map(|n| n.kind.as_str()), Some("traffic_light"));

    let results = store.results.as_ref().expect("results block should be parsed");
    assert_eq!(results.total_vehicles, 3.0);
    assert_eq!(results.average_speed, 9.8);
    Ok(())
}

#[test]
fn test_bare_payload_without_wrapper() -> Result<()> {
    let store = parse(
        r#"{
            "vehicles": [{ "id": "a", "positions": [{ "time": 0, "x": 1, "y": 2, "speed": 3 }] }],
            "intersection": { "nodes": [{ "id": "n", "x": 0, "y": 0 }] }
        }"#,
    )?;

    assert_eq!(store.vehicles.len(), 1);
    assert_eq!(store.vehicles[0].samples[0].speed, 3.0);
    assert_eq!(store.nodes[0].kind, "");
    assert!(store.edges.is_empty());
    assert!(store.traffic_lights.is_empty());
    assert!(store.results.is_none());
    Ok(())
}

#[test]
fn test_missing_sections_degrade_to_empty() -> Result<()> {
    let store = parse(r#"{ "output": {} }"#)?;
    assert!(store.is_empty());
    assert_eq!(store.max_end_time(), 0.0);

    let store = parse(r#"{ "output": null, "results": null }"#)?;
    assert!(store.is_empty());
    Ok(())
}

#[test]
fn test_signal_index_accepts_strings_and_numbers() -> Result<()> {
    let store = parse(
        r#"{ "intersection": { "connections": [
            { "from": "a", "to": "b", "fromLane": 0, "toLane": 1, "tl": "4" },
            { "from": "c", "to": "d", "tl": 2 },
            { "from": "e", "to": "f", "tl": "not-a-number" },
            { "from": "g", "to": "h" },
            { "from": "i", "to": "j", "tl": -1 },
            { "from": "k", "to": "l", "tl": 2.0 },
            { "from": "m", "to": "n", "tl": null },
            { "from": "o", "to": "p", "tl": " 7 " }
        ] } }"#,
    )?;

    // Unusable indices drop only their own connection
    let indices: Vec<usize> = store.connections.iter().map(|c| c.signal_index).collect();
    assert_eq!(indices, vec![4, 2, 7]);
    assert_eq!(store.connections[0].to_lane_index, 1);
    Ok(())
}

/// Unordered samples are sorted and duplicate timestamps collapsed
#[test]
fn test_out_of_order_samples_are_normalized() -> Result<()> {
    let store = parse(
        r#"{ "vehicles": [{ "id": "v", "positions": [
            { "time": 4, "x": 40, "y": 0, "speed": 4 },
            { "time": 0, "x": 0, "y": 0, "speed": 1 },
            { "time": 2, "x": 20, "y": 0, "speed": 2 },
            { "time": 2, "x": 99, "y": 0, "speed": 9 }
        ] }] }"#,
    )?;

    let samples = &store.vehicles[0].samples;
    let times: Vec<f64> = samples.iter().map(|s| s.time).collect();
    assert_eq!(times, vec![0.0, 2.0, 4.0]);
    assert_eq!(samples[1].x, 20.0);
    Ok(())
}

#[test]
fn test_explicit_phase_states_are_kept() -> Result<()> {
    let store = parse(
        r#"{ "intersection": {
            "trafficLights": [{ "id": "tl", "phases": [
                { "duration": 20, "state": "GgrR" },
                { "duration": 4, "state": "yyrr" }
            ] }],
            "connections": [{ "from": "in_n2_1", "to": "x", "tl": "0" }]
        } }"#,
    )?;

    let light = &store.traffic_lights[0];
    assert_eq!(light.phases.len(), 2);
    assert_eq!(light.phases[0].state, "GgrR");
    assert_eq!(light.schedule.cycle_length(), 24.0);
    assert_eq!(light.schedule.state_at(25.0), Some("GgrR"));
    Ok(())
}

#[test]
fn test_malformed_json_is_rejected() {
    let err = parse(r#"{ "output": { "vehicles": "#).expect_err("truncated JSON must fail");
    assert!(matches!(err.downcast_ref::<PayloadError>(), Some(PayloadError::Json(_))));

    let err = parse(r#"{ "vehicles": [{ "positions": [] }] }"#).expect_err("vehicle without id must fail");
    assert!(matches!(err.downcast_ref::<PayloadError>(), Some(PayloadError::Json(_))));
}

#[test]
fn test_missing_file_is_io_error() {
    let result = TrajectoryStore::load_from_file("demos/does_not_exist.json", &PlaybackConfig::default());
    assert!(matches!(result, Err(PayloadError::Io(_))));
}

#[test]
fn test_shipped_config_matches_defaults() -> Result<()> {
    let config = PlaybackConfig::load_from_file("playback.toml")?;
    let defaults = PlaybackConfig::default();

    assert_eq!(config.directions, defaults.directions);
    assert_eq!(config.directions.get("in_n4_1"), Some(Approach::West));
    assert_eq!(config.signals.cycle_length(), defaults.signals.cycle_length());
    assert_eq!(config.playback.initial_speed, 5.0);
    assert_eq!(config.playback.max_speed, 20.0);
    assert_eq!(config.scene.seed, Some(42));
    Ok(())
}

#[test]
fn test_invalid_config_is_rejected() {
    assert!(PlaybackConfig::from_toml_str("[playback]\nmin_speed = 10.0\nmax_speed = 2.0\n").is_err());
    assert!(PlaybackConfig::from_toml_str("[playback]\ninitial_speed = 50.0\n").is_err());
    assert!(PlaybackConfig::from_toml_str("[signals]\nns_yellow = 0.0\n").is_err());
    assert!(PlaybackConfig::from_toml_str("[directions]\nin_x = \"Up\"\n").is_err());
    assert!(PlaybackConfig::from_toml_str("[playback]\nmax_speed = nan\n").is_err());
    assert!(PlaybackConfig::from_toml_str("[playback]\nmax_speed = inf\n").is_err());
    assert!(PlaybackConfig::from_toml_str("[playback]\ninitial_speed = nan\n").is_err());
    assert!(PlaybackConfig::from_toml_str("[playback]\nframe_rate = nan\n").is_err());
    assert!(PlaybackConfig::from_toml_str("").is_ok());
}

#[test]
fn test_background_load_delivers_store() -> Result<()> {
    let (subscriber, delivery) = subscribe();
    assert!(subscriber.is_loading());

    let worker = load_in_background(DEMO_PAYLOAD, PlaybackConfig::default(), delivery);
    assert!(worker.join().expect("loader thread panicked"));

    let store = subscriber.try_take().expect("load should be finished")?;
    assert_eq!(store.vehicles.len(), 3);
    assert!(subscriber.store().is_some());
    Ok(())
}

#[test]
fn test_background_load_reports_failure() {
    let (subscriber, delivery) = subscribe();
    let worker = load_in_background("demos/missing.json", PlaybackConfig::default(), delivery);
    assert!(worker.join().expect("loader thread panicked"));

    assert!(matches!(subscriber.try_take(), Some(Err(PayloadError::Io(_)))));
    assert!(subscriber.store().is_none());
}

/// A response arriving after the consumer went away is dropped
#[test]
fn test_late_delivery_is_discarded() -> Result<()> {
    let (subscriber, delivery) = subscribe();
    drop(subscriber);

    assert!(!delivery.is_live());
    assert!(!delivery.deliver(Ok(demo_store()?)));
    Ok(())
}

#[test]
fn test_dropped_delivery_marks_load_abandoned() {
    let (subscriber, delivery) = subscribe();
    drop(delivery);

    assert!(matches!(subscriber.try_take(), Some(Err(PayloadError::Abandoned))));
}

#[cfg(feature = "async")]
#[tokio::test]
async fn test_async_load() -> Result<()> {
    let store = traffic_playback::data::load_async(DEMO_PAYLOAD, &PlaybackConfig::default()).await?;
    assert_eq!(store.traffic_lights.len(), 1);
    Ok(())
}
