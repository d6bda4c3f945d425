//! End-to-end conversion tests through the public library API
//!
//! Each test builds a scratch directory of `;`-delimited files, runs a full
//! batch and checks the generated `-out.csv` files line by line.

use etrs_csv_converter::projection::GeodeticTransform;
use etrs_csv_converter::{
    BatchProcessor, ConverterConfig, ConverterError, Etrs89Utm, FailurePolicy, FileReport,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn run_config(dir: &Path) -> ConverterConfig {
    ConverterConfig::default()
        .with_directory(dir)
        .without_progress()
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect()
}

/// Row count: every input row yields one output row per coordinate pair
#[tokio::test]
async fn test_output_row_count_matches_pair_count() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(
        dir.join("pisteet.csv"),
        "tunnus;sijainti_koordinaatit\n\
         a;[385611.316685 6672118.380202]\n\
         b;[[500000 6651411.190240] [427657.547671 7210681.467421] [534478.469317 6973782.475341]]\n\
         c;[[500000 6651411.190240]]\n",
    )
    .unwrap();

    let stats = BatchProcessor::new(run_config(dir))
        .unwrap()
        .process()
        .await
        .unwrap();

    assert_eq!(stats.files_processed, 1);
    assert_eq!(stats.rows_read, 3);
    assert_eq!(stats.rows_written, 5);

    let lines = read_lines(&dir.join("pisteet-out.csv"));
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "tunnus;sijainti_koordinaatit;latitude;longitude");
    assert_eq!(
        lines[1],
        "a;[385611.316685 6672118.380202];60.169900;24.938400"
    );
    assert_eq!(
        lines[2],
        "b;[500000.000000 6651411.190240];60.000000;27.000000"
    );
    assert_eq!(lines[5], "c;[500000.000000 6651411.190240];60.000000;27.000000");
}

/// Every output row keeps the input field count plus two
#[tokio::test]
async fn test_every_row_gains_two_fields() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(
        dir.join("leveys.csv"),
        "a;b;KOORDINAATIT;d\n1;2;[500000 6651411.190240];4\n5;6;[[500000 0] [500000 0]];8\n",
    )
    .unwrap();

    BatchProcessor::new(run_config(dir))
        .unwrap()
        .process()
        .await
        .unwrap();

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_path(dir.join("leveys-out.csv"))
        .unwrap();
    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

    assert_eq!(records.len(), 4);
    for record in &records {
        assert_eq!(record.len(), 6);
    }
    assert_eq!(&records[1][0], "1");
    assert_eq!(&records[1][3], "4");
    assert_eq!(&records[3][2], "[500000.000000 0.000000]");
}

/// Output file names are lowercased and never rediscovered as inputs
#[tokio::test]
async fn test_output_names_and_rerun() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("ALUEET.CSV"), "koordinaatit\n[500000 6651411.190240]\n").unwrap();
    fs::write(dir.join("muistiinpanot.txt"), "ei koordinaatteja").unwrap();
    fs::create_dir(dir.join("alikansio.csv")).unwrap();

    let processor = BatchProcessor::new(run_config(dir)).unwrap();
    let first = processor.process().await.unwrap();
    let second = processor.process().await.unwrap();

    assert_eq!(first.files_processed, 1);
    assert_eq!(second.files_processed, 1);
    assert!(dir.join("alueet-out.csv").is_file());
    assert!(!dir.join("alikansio-out.csv").exists());
}

/// A failing file under the skip policy leaves other outputs complete
#[tokio::test]
async fn test_skip_policy_reports_each_file() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("ok.csv"), "koordinaatit\n[500000 6651411.190240]\n").unwrap();
    fs::write(dir.join("bad.csv"), "nimi\nx\n").unwrap();

    let report_dir = TempDir::new().unwrap();
    let report_path = report_dir.path().join("raportti.csv");

    let config = run_config(dir)
        .with_failure_policy(FailurePolicy::Skip)
        .with_report(&report_path);
    let stats = BatchProcessor::new(config)
        .unwrap()
        .process()
        .await
        .unwrap();

    assert_eq!(stats.files_processed, 1);
    assert_eq!(stats.files_failed, 1);
    assert!(matches!(
        stats.ensure_no_failures(),
        Err(ConverterError::BatchFailed {
            failed: 1,
            total: 2
        })
    ));

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_path(&report_path)
        .unwrap();
    let reports: Vec<FileReport> = reader.deserialize().map(|r| r.unwrap()).collect();
    assert_eq!(reports.len(), 2);

    let failed = reports.iter().find(|r| r.error.is_some()).unwrap();
    assert!(failed.input.ends_with("bad.csv"));
    assert!(failed.error.as_deref().unwrap().contains("koordinaatit"));

    let converted = reports.iter().find(|r| r.error.is_none()).unwrap();
    assert_eq!(converted.rows_read, 1);
    assert_eq!(converted.rows_written, 1);
}

/// Projection round trips at points spread over Finland
#[test]
fn test_projection_round_trip_across_finland() {
    let tm35 = Etrs89Utm::from_epsg(25835).unwrap();
    let points = [
        (24.9384, 60.1699), // Helsinki
        (25.4651, 65.0121), // Oulu
        (27.6782, 62.8924), // Kuopio
        (20.0, 69.5),
        (31.5, 60.0),
    ];

    for (longitude, latitude) in points {
        let projected = tm35.to_projected(longitude, latitude).unwrap();
        let back = tm35.to_lon_lat(projected.x, projected.y, 0.0).unwrap();
        assert!((back.longitude - longitude).abs() < 1e-9, "{longitude}");
        assert!((back.latitude - latitude).abs() < 1e-9, "{latitude}");
    }
}

#[test]
fn test_unsupported_epsg_rejected() {
    assert!(matches!(
        Etrs89Utm::from_epsg(4326),
        Err(ConverterError::UnsupportedProjection { epsg: 4326 })
    ));
}
