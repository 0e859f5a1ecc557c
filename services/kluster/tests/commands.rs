//! Integration tests: run the commands against files on disk.

use std::fs;

use kluster::commands;
use kluster::KlusterConfig;
use record_chunking::{RecordKind, TimeBlock, ZarrCompression};
use serde_json::json;
use sounding_export::{ExportFormat, PingDataset};
use test_utils::{sample_vessel_update, split_time_axis_with_overlap, temp_output};

fn config() -> KlusterConfig {
    let mut config = KlusterConfig::default();
    config.chunking.zarr_compression = ZarrCompression::None;
    config
}

#[test]
fn test_rechunk_command() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("attitude.json");
    let output = dir.path().join("attitude.zarr");

    let blocks: Vec<TimeBlock> = split_time_axis_with_overlap(&[30, 30], 0.0, 0.5)
        .into_iter()
        .map(|time| {
            let roll = vec![0.5; time.len()];
            TimeBlock::new(time).with_variable("roll", roll).expect("Failed to build block")
        })
        .collect();
    fs::write(&input, serde_json::to_string(&blocks).expect("Failed to serialize")).expect("Failed to write");

    let report = commands::rechunk(&config(), RecordKind::Attitude, &input, &output, Some(25))
        .expect("Rechunk failed")
        .expect("Nothing written");

    assert_eq!(report.summary.output_records, 59);
    assert_eq!(report.summary.dropped_duplicates, 1);
    assert_eq!(report.metadata.chunk_size, 25);
    assert_eq!(report.metadata.num_chunks, 3);
    assert!(output.join("roll").exists());
}

#[test]
fn test_rechunk_rejects_malformed_block() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("ping.json");
    fs::write(&input, r#"[{"time": [0.0, 1.0], "variables": {"z": [1.0]}}]"#).expect("Failed to write");

    let result = commands::rechunk(&config(), RecordKind::Ping, &input, &dir.path().join("ping.zarr"), None);
    assert!(result.is_err());
}

#[test]
fn test_vessel_update_and_query() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let vessel = dir.path().join("vessel_file.kfc");
    let data = dir.path().join("update.json");

    let (system, entries) = sample_vessel_update();
    fs::write(&data, entries.to_string()).expect("Failed to write");

    assert!(commands::vessel_update(&vessel, system, &data, true, false).is_err());
    let updated = commands::vessel_update(&vessel, system, &data, true, true).expect("Update failed");
    assert_eq!(updated.len(), 2);

    let shown = commands::vessel_show(&vessel).expect("Show failed");
    assert_eq!(shown, json!({ system: entries }));

    let subset = commands::vessel_query(&vessel, system, 1239, 1250)
        .expect("Query failed")
        .expect("No data in range");
    assert_eq!(subset["rx_x"].len(), 2);

    assert!(commands::vessel_query(&vessel, "999", 0, 1).is_err());
}

#[test]
fn test_export_command() {
    let (dir, input) = temp_output("pings.json");
    let dataset = PingDataset {
        system_identifier: "40111".to_string(),
        time: vec![1626354881.0, 1626354882.0],
        beams: 2,
        x: vec![1.0, 2.0, 3.0, 4.0],
        y: vec![1.0; 4],
        z: vec![10.0; 4],
        detectioninfo: Some(vec![0, 0, 2, 0]),
        ..Default::default()
    };
    fs::write(&input, serde_json::to_string(&vec![dataset]).expect("Failed to serialize")).expect("Failed to write");

    let mut config = config();
    config.export.export_by_identifiers = false;

    let report = commands::export(&config, &input, dir.path(), ExportFormat::Csv, false, false).expect("Export failed");
    assert_eq!(report.files.len(), 1);
    let text = fs::read_to_string(&report.files[0]).expect("Failed to read");
    assert_eq!(text.lines().count(), 1 + 3);

    let report = commands::export(&config, &input, dir.path(), ExportFormat::Csv, true, true).expect("Export failed");
    assert_eq!(report.soundings, Some(4));
    assert!(report.dataset.expect("No dataset").ends_with("soundings.zarr"));
}
