//! Stream and recording tests for the headless runner.

use std::io::Write;

use vanguard_core::command::Command;
use vanguard_core::config::EngineConfig;
use vanguard_core::math::Vec2;
use vanguard_core::recording::MatchRecording;
use vanguard_core::unit::WorldSnapshot;
use vanguard_headless::protocol::Response;
use vanguard_headless::runner::answer_all;
use vanguard_headless::HeadlessRunner;
use vanguard_test_utils::fixtures::{opening_match, SnapshotBuilder};

fn to_jsonl(snapshots: &[WorldSnapshot]) -> String {
    snapshots
        .iter()
        .map(|s| serde_json::to_string(s).unwrap() + "\n")
        .collect()
}

fn scripted_match() -> Vec<WorldSnapshot> {
    let mut snapshots = opening_match(30);
    snapshots.push(
        SnapshotBuilder::new(31)
            .incoming_strike(1000, Vec2::new(50.0, 20.0))
            .build(),
    );
    snapshots
}

#[test]
fn test_stream_matches_in_memory_answers() {
    let snapshots = scripted_match();
    let expected = answer_all(EngineConfig::default(), snapshots.clone()).unwrap();

    let mut output = Vec::new();
    let mut runner = HeadlessRunner::new(EngineConfig::default()).unwrap();
    let summary = runner
        .run(to_jsonl(&snapshots).as_bytes(), &mut output)
        .unwrap();
    assert_eq!(summary.ticks, snapshots.len());

    let responses: Vec<Response> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    let streamed: Vec<Option<Command>> = responses.iter().map(|r| r.command.clone()).collect();
    assert_eq!(streamed, expected);
    assert_eq!(summary.commands, expected.iter().flatten().count());
    assert!(responses.iter().zip(&snapshots).all(|(r, s)| r.tick == s.tick));
}

#[test]
fn test_saved_recording_verifies() {
    let snapshots = scripted_match();
    let mut runner = HeadlessRunner::new(EngineConfig::default())
        .unwrap()
        .with_recording();
    runner
        .run(to_jsonl(&snapshots).as_bytes(), std::io::sink())
        .unwrap();
    let recording = runner.into_recording().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("match.bin");
    recording.save(&path).unwrap();

    let loaded = MatchRecording::load(&path).unwrap();
    assert_eq!(loaded.len(), snapshots.len());
    assert_eq!(loaded.verify().unwrap(), None);
}

#[test]
fn test_truncated_recording_is_rejected() {
    let mut runner = HeadlessRunner::new(EngineConfig::default())
        .unwrap()
        .with_recording();
    runner
        .run(to_jsonl(&opening_match(5)).as_bytes(), std::io::sink())
        .unwrap();
    let bytes = runner.into_recording().unwrap().to_bytes().unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&bytes[..bytes.len() / 2]).unwrap();
    assert!(MatchRecording::load(file.path()).is_err());
}

#[test]
fn test_config_file_is_honoured() {
    let mut config = EngineConfig::default();
    config.policies.retain(|p| *p != vanguard_core::config::PolicyKind::InitialSetup);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(config.to_ron_string().unwrap().as_bytes()).unwrap();
    let loaded = EngineConfig::load(file.path()).unwrap();
    assert_eq!(loaded, config);

    // Without the setup policy the opening tick plans the formation instead.
    let commands = answer_all(loaded, opening_match(1)).unwrap();
    assert!(matches!(
        commands[1],
        Some(Command::ClearAndSelect { kind: None, .. })
    ));
}
