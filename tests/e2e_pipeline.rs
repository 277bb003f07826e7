// JobTimeline - tests/e2e_pipeline.rs
//
// End-to-end tests for the discovery -> extraction -> timeline pipeline.
//
// These tests exercise the real filesystem, real walkdir traversal, real
// regex extraction and real chrono parsing, with no mocks. They cover the
// path from raw job logs on disk to the printed report lines.

use jobtimeline::app::pipeline::{self, extract_from_files};
use jobtimeline::core::catalog::builtin_event_kinds;
use jobtimeline::core::discovery::{discover_files, DiscoveryConfig};
use jobtimeline::core::extract::PatternSet;
use jobtimeline::core::report::{render_row, write_report};
use jobtimeline::core::timeline::{parse_timestamp, InvalidTimestampPolicy};
use jobtimeline::platform::config::{load_config, AppConfig};
use jobtimeline::util::constants::DEFAULT_TIMESTAMP_FORMAT;
use jobtimeline::util::error::JobTimelineError;
use std::fs;
use std::path::{Path, PathBuf};

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture log bundle.
fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("backup_logs")
}

fn config_for(root: &Path) -> AppConfig {
    AppConfig {
        root: Some(root.to_path_buf()),
        ..Default::default()
    }
}

fn report_lines(config: &AppConfig) -> Vec<String> {
    let outcome = pipeline::run(config).expect("pipeline run");
    let mut buf = Vec::new();
    write_report(&outcome.rows, &mut buf).expect("write report");
    String::from_utf8(buf)
        .expect("utf-8 report")
        .lines()
        .map(String::from)
        .collect()
}

// =============================================================================
// Full report
// =============================================================================

/// The fixture bundle renders to the expected report, sorted and flagged.
#[test]
fn e2e_fixture_report() {
    let lines = report_lines(&config_for(&fixture_root()));
    assert_eq!(
        lines,
        [
            "05.08.2024 10:00:00.000, Start, Monday, First Monday, Synth, Complete",
            "05.08.2024 11:00:00.000, Finish, Monday, First Monday, Synth, Complete",
            "12.08.2024 22:00:00.000, Start, Monday",
            "13.08.2024 01:15:30.333, Finish, Tuesday",
            "14.08.2024 07:40:00.100, Start, Wednesday, Retention",
            "14.08.2024 08:02:31.900, Finish, Wednesday, Retention",
        ]
    );
}

/// Job.Daily.log does not match `.*Task.*`, so its start line is ignored.
#[test]
fn e2e_non_matching_files_are_not_scanned() {
    let outcome = pipeline::run(&config_for(&fixture_root())).unwrap();
    assert_eq!(outcome.summary.files_discovered, 2);
    assert!(outcome
        .rows
        .iter()
        .all(|r| !render_row(r).starts_with("01.08.2024")));
    assert!(outcome.warnings.is_empty(), "{:?}", outcome.warnings);
}

/// Summary counts reflect what was scanned and matched.
#[test]
fn e2e_summary_counts() {
    let outcome = pipeline::run(&config_for(&fixture_root())).unwrap();
    let s = &outcome.summary;
    assert_eq!(s.files_unreadable, 0);
    assert_eq!(s.lines_scanned, 13);
    assert_eq!(s.matches_by_kind["start"], 3);
    assert_eq!(s.matches_by_kind["finish"], 3);
    assert_eq!(s.matches_by_kind["synth"], 1);
    assert_eq!(s.matches_by_kind["complete"], 1);
    assert_eq!(s.matches_by_kind["retention"], 1);
    assert_eq!(s.events, 6);
}

/// Extraction keeps file-then-line order, not chronological order.
#[test]
fn e2e_extraction_is_in_encounter_order() {
    let (files, _) = discover_files(&fixture_root(), &DiscoveryConfig::default()).unwrap();
    let (patterns, errors) = PatternSet::compile(&builtin_event_kinds());
    assert!(errors.is_empty());

    let extraction = extract_from_files(&files, &patterns);
    let starts: Vec<_> = extraction
        .data
        .get("start")
        .iter()
        .map(|r| r.value.as_str())
        .collect();
    assert_eq!(
        starts,
        [
            "05.08.2024 10:00:00.000",
            "14.08.2024 07:40:00.100",
            "12.08.2024 22:00:00.000",
        ]
    );
    let first = &extraction.data.get("start")[0];
    assert!(first.file.ends_with("Task.VM01.log"));
    assert_eq!(first.line_number, 2);
}

/// Every printed timestamp re-parses to the instant it came from.
#[test]
fn e2e_rendered_timestamps_round_trip() {
    let outcome = pipeline::run(&config_for(&fixture_root())).unwrap();
    for row in &outcome.rows {
        let line = render_row(row);
        let ts_text = line.split(", ").next().unwrap();
        let reparsed = parse_timestamp(ts_text, DEFAULT_TIMESTAMP_FORMAT).unwrap();
        assert_eq!(reparsed, row.timestamp, "{line}");
    }
}

/// With no config, any matching name is scanned at any depth.
#[test]
fn e2e_defaults_scan_every_matching_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("Task.VM01.log.gz"),
        "[05.08.2024 10:00:00.000] Processing object VM01\n",
    )
    .unwrap();
    let mut deep = dir.path().to_path_buf();
    for i in 0..40 {
        deep.push(format!("level{i}"));
    }
    fs::create_dir_all(&deep).unwrap();
    fs::write(
        deep.join("Task.deep.log"),
        "[06.08.2024 10:00:00.000] Processing object VM02\n",
    )
    .unwrap();

    let outcome = pipeline::run(&config_for(dir.path())).unwrap();
    assert_eq!(outcome.summary.files_discovered, 2);
    assert_eq!(outcome.rows.len(), 2);
    assert!(outcome.warnings.is_empty(), "{:?}", outcome.warnings);
}

// =============================================================================
// Empty and failing runs
// =============================================================================

/// A directory with no matching files yields an empty report, not an error.
#[test]
fn e2e_empty_directory_gives_empty_report() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("readme.txt"), "no logs here").unwrap();
    assert!(report_lines(&config_for(dir.path())).is_empty());
}

/// A timestamp that matches the pattern but is not a real date aborts the
/// run and names the file and line.
#[test]
fn e2e_bad_timestamp_aborts_with_location() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("Task.bad.log"),
        "[05.08.2024 10:00:00.000] Processing object A\n\
         [32.13.2024 10:00:00.000] Processing object B\n",
    )
    .unwrap();

    match pipeline::run(&config_for(dir.path())) {
        Err(JobTimelineError::Timestamp(e)) => {
            assert_eq!(e.kind, "start");
            assert_eq!(e.raw_timestamp, "32.13.2024 10:00:00.000");
            assert!(e.file.ends_with("Task.bad.log"));
            assert_eq!(e.line_number, 2);
        }
        other => panic!("expected timestamp error, got {other:?}"),
    }
}

/// Under the skip policy the bad value is dropped and reported as a warning.
#[test]
fn e2e_skip_policy_keeps_going() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("Task.bad.log"),
        "[05.08.2024 10:00:00.000] Processing object A\n\
         [32.13.2024 10:00:00.000] Processing object B\n",
    )
    .unwrap();

    let mut config = config_for(dir.path());
    config.timeline.on_invalid_timestamp = InvalidTimestampPolicy::Skip;
    let outcome = pipeline::run(&config).unwrap();
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(outcome.summary.timestamps_skipped, 1);
    assert_eq!(outcome.warnings.len(), 1);
}

// =============================================================================
// Configured catalog
// =============================================================================

/// `[[events]]` in config.toml replaces the built-in catalog end to end.
#[test]
fn e2e_custom_event_catalog_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let logs = dir.path().join("logs");
    fs::create_dir(&logs).unwrap();
    fs::write(
        logs.join("Task.merge.log"),
        "[06.08.2024 01:00:00.000] Merging incremental restore point\n\
         [06.08.2024 03:00:00.000] Health check passed\n\
         [07.08.2024 01:00:00.000] Merging incremental restore point\n",
    )
    .unwrap();

    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!(
            r#"
[scan]
root = '{}'

[[events]]
name = "merge"
pattern = '\[(\d{{2}}\.\d{{2}}\.\d{{4}} [\d:.]+)\].*Merging'
label = "Merge"

[[events]]
name = "health"
pattern = '\[(\d{{2}}\.\d{{2}}\.\d{{4}} [\d:.]+)\].*Health check'
flag = "Health"
"#,
            logs.display()
        ),
    )
    .unwrap();

    let (config, warnings) = load_config(&config_path).unwrap();
    assert!(warnings.is_empty(), "{warnings:?}");
    assert_eq!(
        report_lines(&config),
        [
            "06.08.2024 01:00:00.000, Merge, Tuesday, Health",
            "07.08.2024 01:00:00.000, Merge, Wednesday",
        ]
    );
}
