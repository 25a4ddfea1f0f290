//! Integration tests for settings and patch files on disk

mod common;

use common::builders::GraphBuilder;
use common::{input, output};
use soundgen_rs::config::{AppConfig, PatchFile, ReconnectPolicy};
use soundgen_rs::graph::{ComponentKind, Graph, Waveform};
use soundgen_rs::SoundGenError;

#[test]
fn test_patch_file_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patches").join("drone.sgpatch");

    let (graph, _) = GraphBuilder::new()
        .component("lfo", ComponentKind::Oscillator(Waveform::Triangle))
        .component("osc", ComponentKind::Oscillator(Waveform::Saw))
        .component("scope", ComponentKind::Scope)
        .default_value("lfo", "frequency", 2.0)
        .default_value("lfo", "amplitude", 20.0)
        .default_value("lfo", "offset", 220.0)
        .link("lfo", "osc", "frequency")
        .link("osc", "scope", "in")
        .build();

    PatchFile::new("Drone", graph.to_patch()).save(&path).unwrap();

    let loaded = PatchFile::load(&path).unwrap();
    assert_eq!(loaded.name, "Drone");

    let (mut rebuilt, ids) = Graph::from_patch(&loaded.patch, Default::default()).unwrap();
    assert_eq!(rebuilt.to_patch(), graph.to_patch());

    let osc = ids[&1];
    let freq = input(&rebuilt, osc, "frequency");
    assert!(rebuilt.is_driven(freq).unwrap());

    rebuilt.tick();
    let lfo_out = rebuilt.pin_value(output(&rebuilt, ids[&0])).unwrap();
    assert_eq!(rebuilt.pin_value(freq).unwrap(), lfo_out);
}

#[test]
fn test_patch_file_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.sgpatch");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(
        PatchFile::load(&path),
        Err(SoundGenError::Serialization(_))
    ));
    assert!(matches!(
        PatchFile::load(dir.path().join("missing.sgpatch")),
        Err(SoundGenError::Config(_))
    ));
}

#[test]
fn test_settings_round_trip_through_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");

    let mut config = AppConfig::default();
    config.engine.reconnect_policy = ReconnectPolicy::Reject;
    config.engine.sample_rate = 44_100.0;
    config.logging.filter = "soundgen_rs=trace".to_string();
    config.save_to(&path).unwrap();

    let loaded = AppConfig::load_from(&path).unwrap();
    assert_eq!(loaded.engine.reconnect_policy, ReconnectPolicy::Reject);
    assert_eq!(loaded.engine.sample_rate, 44_100.0);
    assert_eq!(loaded.logging.filter, "soundgen_rs=trace");
}

#[test]
fn test_invalid_settings_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "[engine]\nsample_rate = -1.0\n").unwrap();

    assert!(matches!(
        AppConfig::load_from(&path),
        Err(SoundGenError::Config(_))
    ));
}
