use ctxsnap::fixtures::{self, generate_test_scenario};
use ctxsnap::{Header, InspectorConfig, RepairMode, SnapshotInspector, StatusLevel, StatusLog};
use ctxsnap_cli::commands::describe::{self, OutputFormat};
use ctxsnap_cli::commands::{repair, verify};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[test]
fn test_integration_workflow() {
    let dir = tempdir().unwrap();
    let paths = generate_test_scenario(dir.path()).unwrap();
    let inspector = SnapshotInspector::default();
    let mut log = StatusLog::new();

    for format in [OutputFormat::Text, OutputFormat::Table, OutputFormat::Json] {
        let result = describe::run(&inspector, &paths.valid, format, &mut log);
        assert!(result.is_ok(), "describe failed for {:?}", format);
    }
    // Only the text format emits field lines.
    assert_eq!(log.count(StatusLevel::Info), 7);

    let result = verify::run(&inspector, &paths.valid, &mut log);
    assert!(result.is_ok(), "Verification should succeed on a sealed fixture");

    let result = verify::run(&inspector, &paths.corrupted, &mut log);
    assert!(result.is_err(), "Verification should fail after a bit flip");

    let repaired = repair::run(&inspector, &paths.corrupted, &mut log).unwrap();
    assert!(repaired.changed());

    let result = verify::run(&inspector, &paths.corrupted, &mut log);
    assert!(result.is_ok(), "Repair followed by verify must match");
}

#[test]
fn test_describe_truncated_emits_no_fields() {
    let dir = tempdir().unwrap();
    let paths = generate_test_scenario(dir.path()).unwrap();
    let mut log = StatusLog::new();

    let result = describe::run(
        &SnapshotInspector::default(),
        &paths.truncated,
        OutputFormat::Table,
        &mut log,
    );

    assert!(result.is_err());
    assert_eq!(log.count(StatusLevel::Info), 0);
    assert_eq!(log.count(StatusLevel::Error), 1);
}

#[test]
fn test_missing_selection() {
    let mut log = StatusLog::new();
    let inspector = SnapshotInspector::default();

    assert!(verify::run(&inspector, Path::new(""), &mut log).is_err());
    assert!(repair::run(&inspector, Path::new(""), &mut log).is_err());
    assert_eq!(log.count(StatusLevel::Error), 2);
    assert!(log
        .messages(StatusLevel::Error)
        .all(|m| m.contains("select a valid V8 context snapshot")));
}

#[test]
fn test_in_place_repair_twice_leaves_file_unchanged() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("v8_context_snapshot.bin");
    let bytes = fixtures::build_snapshot(&fixtures::sample_header(), &fixtures::sample_payload(1024));
    fixtures::write_snapshot(&path, &bytes).unwrap();

    let inspector =
        SnapshotInspector::new(InspectorConfig::default().with_repair_mode(RepairMode::InPlace));
    let mut log = StatusLog::new();

    let first = repair::run(&inspector, &path, &mut log).unwrap();
    let after_first = fs::read(&path).unwrap();
    let second = repair::run(&inspector, &path, &mut log).unwrap();

    assert_eq!(first.written, second.written);
    assert_eq!(fs::read(&path).unwrap(), after_first);
    assert_eq!(after_first.len(), bytes.len());
    assert_eq!(&after_first[16..], &bytes[16..]);
}

#[test]
fn test_json_report_matches_header() {
    let header = Header {
        version: b"11.1.277.13".to_vec(),
        ..fixtures::sample_header()
    };
    let json = describe::render_json(&header).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["version"], "11.1.277.13");
    assert_eq!(value["checksum"], "0000000000000000");
    assert_eq!(value["number_of_contexts"], 2);
    assert_eq!(value["offset_to_context_1"], 224);
}

#[test]
fn test_table_lists_every_field() {
    let table = describe::render_table(&fixtures::sample_header());
    for label in [
        "Number of contexts",
        "Rehashability",
        "Checksum",
        "Version string",
        "Offset to readonly",
        "Offset to context 0",
        "Offset to context 1",
    ] {
        assert!(table.contains(label), "missing {label}");
    }
    assert!(table.contains("10.2.154.26-electron.0"));
}
