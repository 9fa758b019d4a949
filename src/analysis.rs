use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::aggregate::merge_sessions;
use crate::config::AnalysisConfig;
use crate::error::StatsError;
use crate::metrics::{self, SummaryRow};
use crate::parser::parse_sheet;
use crate::session::{Session, SessionStats};
use crate::sheet::Workbook;
use crate::source::LoadedSources;
use crate::trend::{self, PlayerTrend, TrendPoint};

/// A loaded workbook and the id it is ordered by.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSource {
    pub id: String,
    pub workbook: Workbook,
}

impl SessionSource {
    pub fn new(id: impl Into<String>, workbook: Workbook) -> Self {
        Self {
            id: id.into(),
            workbook,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedSession {
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: String,
    pub sessions: Vec<Session>,
    pub merged: SessionStats,
    pub rows: Vec<SummaryRow>,
    pub total: SummaryRow,
    pub team_trend: Vec<TrendPoint>,
    pub player_trends: BTreeMap<String, PlayerTrend>,
    pub skipped: Vec<SkippedSession>,
}

impl AnalysisReport {
    pub fn session_ids(&self) -> Vec<&str> {
        self.sessions.iter().map(|s| s.id.as_str()).collect()
    }
}

pub fn parse_session(source: &SessionSource, cfg: &AnalysisConfig) -> Result<Session, StatsError> {
    let sheet = source.workbook.sheet(&cfg.sheet_name).ok_or_else(|| {
        StatsError::InputMissing(format!("{}: no '{}' sheet", source.id, cfg.sheet_name))
    })?;
    let stats = parse_sheet(sheet, &cfg.parser)?;
    Ok(Session::new(source.id.clone(), stats))
}

/// Parse, merge, summarize and build trends. Sessions keep the caller's
/// order. Sessions that fail to parse are skipped and listed; if none parse
/// the first failure is returned.
pub fn analyze(sources: &[SessionSource], cfg: &AnalysisConfig) -> Result<AnalysisReport, StatsError> {
    run(sources, Vec::new(), cfg)
}

/// Like [`analyze`], with files that failed to load reported as skipped.
pub fn analyze_loaded(loaded: &LoadedSources, cfg: &AnalysisConfig) -> Result<AnalysisReport, StatsError> {
    run(&loaded.sources, loaded.skipped.clone(), cfg)
}

fn run(
    sources: &[SessionSource],
    mut skipped: Vec<SkippedSession>,
    cfg: &AnalysisConfig,
) -> Result<AnalysisReport, StatsError> {
    if sources.is_empty() {
        let reason = match skipped.first() {
            Some(first) => format!("no readable sessions ({}: {})", first.id, first.reason),
            None => "no sessions supplied".to_string(),
        };
        return Err(StatsError::InputMissing(reason));
    }

    let parsed: Vec<Result<Session, StatsError>> = if cfg.parallel {
        sources.par_iter().map(|s| parse_session(s, cfg)).collect()
    } else {
        sources.iter().map(|s| parse_session(s, cfg)).collect()
    };

    let mut sessions = Vec::with_capacity(parsed.len());
    let mut first_err = None;
    for (source, result) in sources.iter().zip(parsed) {
        match result {
            Ok(session) => sessions.push(session),
            Err(err) => {
                warn!(session = source.id.as_str(), "skipping session: {err}");
                skipped.push(SkippedSession {
                    id: source.id.clone(),
                    reason: err.to_string(),
                });
                if first_err.is_none() {
                    first_err = Some(err);
                }
            }
        }
    }
    if sessions.is_empty() {
        return Err(first_err
            .unwrap_or_else(|| StatsError::InputMissing("no sessions parsed".to_string())));
    }

    let merged = merge_sessions(&sessions);
    let rows = metrics::summarize(&merged, cfg.summary_policy);
    let total = metrics::team_totals(&merged, cfg.summary_policy);
    let team_trend = trend::build_team_trend(&sessions, cfg.trend_policy);
    let player_trends = trend::build_all_player_trends(&sessions);

    let ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
    let summary = summary_text(&ids, skipped.len());
    info!(
        sessions = sessions.len(),
        skipped = skipped.len(),
        players = rows.len(),
        "analysis complete"
    );

    Ok(AnalysisReport {
        summary,
        sessions,
        merged,
        rows,
        total,
        team_trend,
        player_trends,
        skipped,
    })
}

pub fn summary_text(ids: &[&str], skipped: usize) -> String {
    let noun = if ids.len() == 1 { "session" } else { "sessions" };
    let mut out = format!("Analyzed {} {noun}:\n{}", ids.len(), ids.join(", "));
    if skipped > 0 {
        out.push_str(&format!("\nSkipped {skipped} unreadable"));
    }
    out
}
