use std::fs;
use std::path::PathBuf;

use volley_stats::analysis::{AnalysisReport, analyze};
use volley_stats::config::AnalysisConfig;
use volley_stats::export::{ExportReport, export_json, export_xlsx};
use volley_stats::source::load_sources;

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("volley_stats_export_{name}"));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

fn fixture_report() -> AnalysisReport {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.push("tests");
    dir.push("fixtures");
    dir.push("sessions");
    let loaded = load_sources(&dir, &[]).expect("fixtures should load");
    let cfg = AnalysisConfig {
        parallel: false,
        ..AnalysisConfig::default()
    };
    analyze(&loaded.sources, &cfg).expect("fixtures should analyze")
}

#[test]
fn json_export_reads_back_identically() {
    let report = fixture_report();
    let path = tmp_dir("json").join("report.json");
    export_json(&path, &report).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    let back: AnalysisReport = serde_json::from_str(&raw).unwrap();
    assert_eq!(back, report);
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn xlsx_export_counts_rows_per_sheet() {
    let report = fixture_report();
    let path = tmp_dir("xlsx").join("report.xlsx");
    let written = export_xlsx(&path, &report).unwrap();

    assert_eq!(
        written,
        ExportReport {
            players: 4,
            sessions: 3,
            series: 4 * 23,
        }
    );
    assert!(fs::metadata(&path).unwrap().len() > 0);
}

#[test]
fn xlsx_export_to_missing_directory_fails() {
    let report = fixture_report();
    let path = tmp_dir("xlsx_missing").join("nope").join("report.xlsx");
    assert!(export_xlsx(&path, &report).is_err());
}
