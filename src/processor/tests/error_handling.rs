//! Error handling integration tests

use crate::config::{ConverterConfig, FailurePolicy, NumericPolicy};
use crate::coordinates::CellParseError;
use crate::error::{ConverterError, RowError};
use crate::models::FileStatus;
use crate::processor::BatchProcessor;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const GOOD_CSV: &str = "id;koordinaatit\n1;[500000 0]\n2;[[500000 0] [500000 0]]\n";

fn config(dir: &Path, policy: FailurePolicy) -> ConverterConfig {
    ConverterConfig::default()
        .with_directory(dir)
        .with_failure_policy(policy)
        .without_progress()
}

#[tokio::test]
async fn test_nonexistent_directory() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nonexistent");

    let processor = BatchProcessor::new(config(&missing, FailurePolicy::Skip)).unwrap();
    let result = processor.process().await;

    match result.unwrap_err() {
        ConverterError::DirectoryScan { path, .. } => assert_eq!(path, missing),
        other => panic!("Expected DirectoryScan error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_coordinate_column_aborts_batch() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("ilman.csv"), "id;x;y\n1;2;3\n").unwrap();

    let processor = BatchProcessor::new(config(temp_dir.path(), FailurePolicy::Abort)).unwrap();
    let result = processor.process().await;

    match result.unwrap_err() {
        ConverterError::CoordinateColumnNotFound { path, marker } => {
            assert!(path.ends_with("ilman.csv"));
            assert_eq!(marker, "koordinaatit");
        }
        other => panic!("Expected CoordinateColumnNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_abort_stops_before_remaining_files() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("first.csv"), "id\n1\n").unwrap();
    fs::write(dir.join("second.csv"), "id\n2\n").unwrap();

    let report_dir = TempDir::new().unwrap();
    let report_path = report_dir.path().join("report.csv");

    let processor =
        BatchProcessor::new(config(dir, FailurePolicy::Abort).with_report(&report_path)).unwrap();
    assert!(processor.process().await.is_err());

    // Header plus the single file that was attempted
    let report = fs::read_to_string(&report_path).unwrap();
    assert_eq!(report.lines().count(), 2);
    assert!(report.contains(";failed;"));
}

#[tokio::test]
async fn test_skip_isolates_failing_file() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("hyva.csv"), GOOD_CSV).unwrap();
    fs::write(dir.join("huono.csv"), "id;koordinaatit\n1;[500000 0]\n2;x\n").unwrap();

    let processor = BatchProcessor::new(config(dir, FailurePolicy::Skip)).unwrap();
    let stats = processor.process().await.unwrap();

    assert_eq!(stats.files_processed, 1);
    assert_eq!(stats.files_failed, 1);
    assert_eq!(stats.rows_written, 3);
    assert!(stats.ensure_no_failures().is_err());

    let failed = stats
        .reports
        .iter()
        .find(|r| r.status == FileStatus::Failed)
        .unwrap();
    assert!(failed.input.ends_with("huono.csv"));
    let message = failed.error.as_deref().unwrap();
    assert!(message.contains("line 3"), "{}", message);
    assert!(message.contains("too short"), "{}", message);

    let good = fs::read_to_string(dir.join("hyva-out.csv")).unwrap();
    assert_eq!(good.lines().count(), 4);
}

#[tokio::test]
async fn test_malformed_multi_pair_cell_is_structured_error() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("rikki.csv"),
        "koordinaatit\n[[1 2] [3 4]\n",
    )
    .unwrap();

    let processor = BatchProcessor::new(config(temp_dir.path(), FailurePolicy::Abort)).unwrap();

    match processor.process().await.unwrap_err() {
        ConverterError::InvalidRow {
            line,
            source: RowError::MalformedCell(CellParseError::UnbalancedBrackets { value }),
            ..
        } => {
            assert_eq!(line, 2);
            assert_eq!(value, "[[1 2] [3 4]");
        }
        other => panic!("Expected malformed cell error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unparseable_numbers_default_to_zero() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("luvut.csv"), "koordinaatit\n[itä 0]\n[[500000 pohjoinen]]\n").unwrap();

    let processor = BatchProcessor::new(config(dir, FailurePolicy::Abort)).unwrap();
    let stats = processor.process().await.unwrap();

    assert_eq!(stats.warnings, 2);
    assert_eq!(stats.files_failed, 0);

    let content = fs::read_to_string(dir.join("luvut-out.csv")).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[2], "[500000.000000 0.000000];0.000000;27.000000");
    assert!(lines[1].starts_with("[itä 0];"));
}

#[tokio::test]
async fn test_strict_numbers_fail_the_file() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("luvut.csv"), "koordinaatit\n[500000 pohjoinen]\n").unwrap();

    let config = config(dir, FailurePolicy::Skip).with_numeric_policy(NumericPolicy::Strict);
    let processor = BatchProcessor::new(config).unwrap();
    let stats = processor.process().await.unwrap();

    assert_eq!(stats.files_failed, 1);
    let message = stats.reports[0].error.as_deref().unwrap();
    assert!(message.contains("pohjoinen"), "{}", message);
}

#[tokio::test]
async fn test_empty_file_fails_with_missing_header() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("tyhja.csv"), "").unwrap();

    let processor = BatchProcessor::new(config(temp_dir.path(), FailurePolicy::Abort)).unwrap();
    assert!(matches!(
        processor.process().await,
        Err(ConverterError::MissingHeader { .. })
    ));
}
