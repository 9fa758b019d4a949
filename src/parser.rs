//! Schema sniffing and extraction for the two known sheet layouts.
//!
//! The *coded* layout is the scorer's template: player names across row 3,
//! one two-character action code per row in column B, and `scored`/`lost`
//! point totals marked in column A. The *labeled* layout has no code column;
//! its header row is found by looking for a known player's name and each row
//! starts with the stat's label.

use std::ops::RangeInclusive;

use tracing::{Level, debug, trace};

use crate::error::StatsError;
use crate::session::SessionStats;
use crate::sheet::Sheet;
use crate::stat_code::StatCode;

const CODED_PLAYER_ROW: usize = 2;
const CODED_FIRST_PLAYER_COL: usize = 3;
const CODED_CODE_COL: usize = 1;
const CODED_MARKER_COL: usize = 0;
// Sheet rows 4..=25.
const CODED_SCAN_ROWS: RangeInclusive<usize> = 3..=24;

const LABELED_LABEL_COL: usize = 0;
const LABELED_SENTINEL_COL: usize = 1;
const LABELED_PLAYER_COLS: RangeInclusive<usize> = 1..=12;

pub const DEFAULT_SENTINEL_PLAYER: &str = "kasia";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Player whose name marks the header row of a labeled sheet.
    pub sentinel_player: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            sentinel_player: DEFAULT_SENTINEL_PLAYER.to_string(),
        }
    }
}

/// A player column: sheet column index and canonical name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerColumn {
    pub col: usize,
    pub name: String,
}

/// One way of reading a stats sheet.
pub trait SheetLayout {
    fn name(&self) -> &'static str;

    fn players(&self, sheet: &Sheet) -> Vec<PlayerColumn>;

    /// Extract raw stats. An empty player list yields an empty mapping.
    fn extract(&self, sheet: &Sheet) -> SessionStats;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodedLayout;

impl CodedLayout {
    fn matches(sheet: &Sheet) -> bool {
        CODED_SCAN_ROWS.into_iter().any(|row| {
            let code = sheet.cell(row, CODED_CODE_COL).as_text();
            let marker = sheet.cell(row, CODED_MARKER_COL).as_text();
            code.and_then(StatCode::from_action_code).is_some()
                || marker.and_then(StatCode::from_point_marker).is_some()
        })
    }
}

impl SheetLayout for CodedLayout {
    fn name(&self) -> &'static str {
        "coded"
    }

    fn players(&self, sheet: &Sheet) -> Vec<PlayerColumn> {
        sheet
            .row(CODED_PLAYER_ROW)
            .iter()
            .enumerate()
            .skip(CODED_FIRST_PLAYER_COL)
            .filter_map(|(col, cell)| {
                cell.as_text().map(|name| PlayerColumn {
                    col,
                    name: name.to_lowercase(),
                })
            })
            .collect()
    }

    fn extract(&self, sheet: &Sheet) -> SessionStats {
        let players = self.players(sheet);
        let mut out = SessionStats::new();
        if players.is_empty() {
            return out;
        }

        for row in CODED_SCAN_ROWS {
            let code = sheet
                .cell(row, CODED_CODE_COL)
                .as_text()
                .and_then(StatCode::from_action_code);
            let stat = match code {
                Some(stat) => stat,
                None => {
                    let Some(stat) = sheet
                        .cell(row, CODED_MARKER_COL)
                        .as_text()
                        .and_then(StatCode::from_point_marker)
                    else {
                        continue;
                    };
                    stat
                }
            };
            write_row(sheet, row, stat, &players, &mut out);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledLayout {
    header_row: usize,
}

impl LabeledLayout {
    pub fn locate(sheet: &Sheet, sentinel: &str) -> Option<Self> {
        let sentinel = sentinel.trim();
        if sentinel.is_empty() {
            return None;
        }
        sheet
            .rows()
            .find(|(idx, _)| {
                sheet
                    .cell(*idx, LABELED_SENTINEL_COL)
                    .as_text()
                    .is_some_and(|name| name.eq_ignore_ascii_case(sentinel))
            })
            .map(|(header_row, _)| Self { header_row })
    }

    pub fn header_row(&self) -> usize {
        self.header_row
    }
}

impl SheetLayout for LabeledLayout {
    fn name(&self) -> &'static str {
        "labeled"
    }

    fn players(&self, sheet: &Sheet) -> Vec<PlayerColumn> {
        LABELED_PLAYER_COLS
            .into_iter()
            .map(|col| (col, sheet.cell(self.header_row, col)))
            .take_while(|(_, cell)| !cell.is_blank())
            .filter_map(|(col, cell)| {
                cell.as_text().map(|name| PlayerColumn {
                    col,
                    name: name.to_lowercase(),
                })
            })
            .collect()
    }

    fn extract(&self, sheet: &Sheet) -> SessionStats {
        let players = self.players(sheet);
        let mut out = SessionStats::new();
        if players.is_empty() {
            return out;
        }

        for row in self.header_row + 1..sheet.row_count() {
            let Some(label) = sheet.cell(row, LABELED_LABEL_COL).as_text() else {
                continue;
            };
            let Some(stat) = StatCode::from_label(label) else {
                debug!(row = row + 1, label, "skipping unrecognized stat label");
                continue;
            };
            write_row(sheet, row, stat, &players, &mut out);
        }
        out
    }
}

// Last write wins: a repeated (player, stat) cell replaces the earlier one.
fn write_row(
    sheet: &Sheet,
    row: usize,
    stat: StatCode,
    players: &[PlayerColumn],
    out: &mut SessionStats,
) {
    for player in players {
        if let Some(value) = sheet.cell(row, player.col).as_number() {
            out.set(&player.name, stat, value);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectedLayout {
    Coded(CodedLayout),
    Labeled(LabeledLayout),
}

impl DetectedLayout {
    pub fn as_layout(&self) -> &dyn SheetLayout {
        match self {
            DetectedLayout::Coded(layout) => layout as &dyn SheetLayout,
            DetectedLayout::Labeled(layout) => layout as &dyn SheetLayout,
        }
    }
}

pub fn detect_layout(sheet: &Sheet, cfg: &ParserConfig) -> Option<DetectedLayout> {
    if CodedLayout::matches(sheet) {
        return Some(DetectedLayout::Coded(CodedLayout));
    }
    LabeledLayout::locate(sheet, &cfg.sentinel_player).map(DetectedLayout::Labeled)
}

/// Detect the layout and extract one session's raw stats.
pub fn parse_sheet(sheet: &Sheet, cfg: &ParserConfig) -> Result<SessionStats, StatsError> {
    if tracing::enabled!(Level::TRACE) {
        trace!(
            rows = sheet.row_count(),
            cols = sheet.col_count(),
            "sheet contents:\n{}",
            sheet.dump()
        );
    }

    let detected = detect_layout(sheet, cfg).ok_or(StatsError::LayoutNotRecognized)?;
    let layout = detected.as_layout();
    let players = layout.players(sheet);
    debug!(
        layout = layout.name(),
        players = ?players.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
        "detected sheet layout"
    );
    if players.is_empty() {
        return Err(StatsError::NoPlayersFound);
    }

    let stats = layout.extract(sheet);
    for (player, values) in &stats {
        debug!(player = player.as_str(), stats = values.len(), "extracted player stats");
    }
    Ok(stats)
}
