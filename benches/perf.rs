use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use volley_stats::aggregate::merge_stats;
use volley_stats::analysis::{SessionSource, analyze};
use volley_stats::config::AnalysisConfig;
use volley_stats::metrics::{ReceivePolicy, summarize};
use volley_stats::parser::{ParserConfig, parse_sheet};
use volley_stats::session::SessionStats;
use volley_stats::sheet::{Cell, Sheet, Workbook};

const CODES: [&str; 20] = [
    "!1", "!2", "!3", "!4", "@1", "@2", "@3", "#1", "#2", "#3", "#4", "$1", "$2", "$3", "$4",
    "%1", "%2", "^1", "^2", "^3",
];

fn sample_sheet(players: usize, seed: usize) -> Sheet {
    let mut rows = vec![vec![Cell::from("Training")], Vec::new()];
    let mut header = vec![Cell::Empty, Cell::Empty, Cell::Empty];
    header.extend((0..players).map(|idx| Cell::Text(format!("Player {idx}"))));
    rows.push(header);
    for (row_idx, code) in CODES.iter().enumerate() {
        let mut row = vec![Cell::Empty, Cell::from(*code), Cell::Empty];
        row.extend((0..players).map(|p| Cell::Number(((row_idx * 7 + p * 3 + seed) % 11) as f64)));
        rows.push(row);
    }
    let mut scored = vec![Cell::from("scored"), Cell::Empty, Cell::Empty];
    scored.extend((0..players).map(|p| Cell::Number((p + seed) as f64)));
    rows.push(scored);
    Sheet::new(rows)
}

fn sample_sources(count: usize) -> Vec<SessionSource> {
    (0..count)
        .map(|idx| {
            let mut workbook = Workbook::default();
            workbook.sheets.insert("suma".to_string(), sample_sheet(10, idx));
            SessionSource::new(format!("2024-01-{:02}", idx + 1), workbook)
        })
        .collect()
}

fn bench_parse_sheet(c: &mut Criterion) {
    let sheet = sample_sheet(12, 3);
    let cfg = ParserConfig::default();
    c.bench_function("parse_sheet", |b| {
        b.iter(|| {
            let stats = parse_sheet(black_box(&sheet), &cfg).unwrap();
            black_box(stats.len());
        })
    });
}

fn bench_merge_and_summarize(c: &mut Criterion) {
    let cfg = ParserConfig::default();
    let sessions: Vec<SessionStats> = (0..30)
        .map(|idx| parse_sheet(&sample_sheet(12, idx), &cfg).unwrap())
        .collect();
    c.bench_function("merge_and_summarize", |b| {
        b.iter(|| {
            let merged = merge_stats(black_box(&sessions));
            let rows = summarize(&merged, ReceivePolicy::Weighted);
            black_box(rows.len());
        })
    });
}

fn bench_analyze(c: &mut Criterion) {
    let sources = sample_sources(30);
    let parallel = AnalysisConfig::default();
    let serial = AnalysisConfig {
        parallel: false,
        ..AnalysisConfig::default()
    };
    c.bench_function("analyze_parallel", |b| {
        b.iter(|| black_box(analyze(black_box(&sources), &parallel).unwrap().rows.len()))
    });
    c.bench_function("analyze_serial", |b| {
        b.iter(|| black_box(analyze(black_box(&sources), &serial).unwrap().rows.len()))
    });
}

criterion_group!(benches, bench_parse_sheet, bench_merge_and_summarize, bench_analyze);
criterion_main!(benches);
