use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::analysis::AnalysisReport;
use crate::metrics::{SummaryRow, round1};
use crate::trend::TrendCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportReport {
    pub players: usize,
    pub sessions: usize,
    pub series: usize,
}

const SUMMARY_HEADER: &[&str] = &[
    "Player",
    "Attack points",
    "Attack net",
    "Out",
    "Position errors",
    "Stance errors",
    "Aces",
    "Serve points",
    "Serve net",
    "Serve out",
    "Good receives",
    "Ok receives",
    "Bad receives",
    "Receive out",
    "Enemy aces",
    "Perfect sets",
    "Good sets",
    "Playable sets",
    "Bad sets",
    "Digs",
    "Defence",
    "Blocks",
    "Free balls",
    "Enemy blocks",
    "Enemy faults",
    "Lost points (other)",
    "Scored points",
    "Lost points",
    "Points won",
    "Points given",
    "Receives graded",
    "Good receive %",
    "Ok receive %",
    "Bad receive %",
    "Perfect set %",
    "Good set %",
    "Playable set %",
    "Bad set %",
    "Attack %",
    "Serve %",
    "Receive %",
    "Set %",
];

/// Write the summary table, team trend and per-player series to an `.xlsx`
/// workbook. Percentages are rounded to one decimal here.
pub fn export_xlsx(path: &Path, report: &AnalysisReport) -> Result<ExportReport> {
    let mut summary_rows: Vec<(String, Vec<f64>)> =
        report.rows.iter().map(summary_values).collect();
    summary_rows.push(summary_values(&report.total));

    let trend_header = ["Session", "Attack %", "Serve %", "Receive %", "Set %"];
    let trend_rows: Vec<(String, Vec<f64>)> = report
        .team_trend
        .iter()
        .map(|point| {
            (
                point.session_id.clone(),
                vec![
                    round1(point.attack_efficiency),
                    round1(point.serve_efficiency),
                    round1(point.receive_efficiency),
                    round1(point.set_efficiency),
                ],
            )
        })
        .collect();

    let mut series_header = vec!["Player".to_string(), "Category".to_string(), "Stat".to_string()];
    series_header.extend(report.sessions.iter().map(|s| s.id.clone()));
    let mut series_rows: Vec<(Vec<String>, Vec<f64>)> = Vec::new();
    for (player, trend) in &report.player_trends {
        for category in TrendCategory::ALL {
            let Some(series) = trend.get(&category) else {
                continue;
            };
            for line in series {
                series_rows.push((
                    vec![player.clone(), category.to_string(), line.stat.to_string()],
                    line.values.clone(),
                ));
            }
        }
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Summary")?;
        write_header(sheet, SUMMARY_HEADER.iter().copied())?;
        for (idx, (label, values)) in summary_rows.iter().enumerate() {
            write_row(sheet, idx + 1, std::slice::from_ref(label), values)?;
        }
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("TeamTrend")?;
        write_header(sheet, trend_header.iter().copied())?;
        for (idx, (label, values)) in trend_rows.iter().enumerate() {
            write_row(sheet, idx + 1, std::slice::from_ref(label), values)?;
        }
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("PlayerTrends")?;
        write_header(sheet, series_header.iter().map(String::as_str))?;
        for (idx, (labels, values)) in series_rows.iter().enumerate() {
            write_row(sheet, idx + 1, labels, values)?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        players: report.rows.len(),
        sessions: trend_rows.len(),
        series: series_rows.len(),
    })
}

pub fn export_json(path: &Path, report: &AnalysisReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("serialize analysis report")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(())
}

fn summary_values(row: &SummaryRow) -> (String, Vec<f64>) {
    (
        row.player.clone(),
        vec![
            row.attacks,
            row.attack_net,
            row.outs,
            row.position_errors,
            row.stance_errors,
            row.aces,
            row.serve_points,
            row.serve_net,
            row.serve_out,
            row.good_receives,
            row.ok_receives,
            row.bad_receives,
            row.receive_outs,
            row.enemy_aces,
            row.perfect_sets,
            row.good_sets,
            row.playable_sets,
            row.bad_sets,
            row.digs,
            row.defences,
            row.blocks,
            row.free_balls,
            row.enemy_blocks,
            row.enemy_faults,
            row.lost_point_other,
            row.scored_points,
            row.lost_points,
            row.points_won,
            row.points_given,
            row.receive_mix.total,
            round1(row.receive_mix.good_pct),
            round1(row.receive_mix.ok_pct),
            round1(row.receive_mix.bad_pct),
            round1(row.set_mix.perfect_pct),
            round1(row.set_mix.good_pct),
            round1(row.set_mix.playable_pct),
            round1(row.set_mix.bad_pct),
            round1(row.attack_efficiency),
            round1(row.serve_efficiency),
            round1(row.receive_efficiency),
            round1(row.set_efficiency),
        ],
    )
}

fn write_header<'a>(worksheet: &mut Worksheet, titles: impl Iterator<Item = &'a str>) -> Result<()> {
    for (col_idx, title) in titles.enumerate() {
        worksheet
            .write_string(0, col_idx as u16, title)
            .with_context(|| format!("write header cell {col_idx}"))?;
    }
    Ok(())
}

fn write_row(worksheet: &mut Worksheet, row_idx: usize, labels: &[String], values: &[f64]) -> Result<()> {
    let row = row_idx as u32;
    for (col_idx, label) in labels.iter().enumerate() {
        worksheet
            .write_string(row, col_idx as u16, label)
            .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
    }
    for (offset, value) in values.iter().enumerate() {
        let col_idx = labels.len() + offset;
        worksheet
            .write_number(row, col_idx as u16, *value)
            .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
    }
    Ok(())
}
