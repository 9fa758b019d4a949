use std::collections::BTreeMap;
use std::collections::btree_map;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::stat_code::StatCode;

/// Canonical player key: trimmed and lower-cased.
pub fn canonical_player(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Stat values for one player. Missing codes read as zero; reading never
/// inserts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerStats {
    values: BTreeMap<StatCode, f64>,
}

impl PlayerStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, code: StatCode) -> f64 {
        self.values.get(&code).copied().unwrap_or(0.0)
    }

    pub fn sum(&self, codes: &[StatCode]) -> f64 {
        codes.iter().map(|c| self.get(*c)).sum()
    }

    /// Overwrites any previous value.
    pub fn set(&mut self, code: StatCode, value: f64) {
        self.values.insert(code, value);
    }

    pub fn add(&mut self, code: StatCode, value: f64) {
        *self.values.entry(code).or_insert(0.0) += value;
    }

    pub fn add_all(&mut self, other: &PlayerStats) {
        for (code, value) in other.iter() {
            self.add(code, value);
        }
    }

    pub fn contains(&self, code: StatCode) -> bool {
        self.values.contains_key(&code)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatCode, f64)> + '_ {
        self.values.iter().map(|(c, v)| (*c, *v))
    }
}

impl FromIterator<(StatCode, f64)> for PlayerStats {
    fn from_iter<I: IntoIterator<Item = (StatCode, f64)>>(iter: I) -> Self {
        let mut out = PlayerStats::new();
        for (code, value) in iter {
            out.set(code, value);
        }
        out
    }
}

/// Per-player stats for one session, or a merge of several. Keys are
/// canonical player names, iterated in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionStats {
    players: BTreeMap<String, PlayerStats>,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player(&self, name: &str) -> Option<&PlayerStats> {
        self.players.get(&canonical_player(name))
    }

    /// Zero-default lookup for a single cell.
    pub fn get(&self, player: &str, code: StatCode) -> f64 {
        self.player(player).map(|p| p.get(code)).unwrap_or(0.0)
    }

    pub fn set(&mut self, player: &str, code: StatCode, value: f64) {
        self.entry(player).set(code, value);
    }

    pub fn add(&mut self, player: &str, code: StatCode, value: f64) {
        self.entry(player).add(code, value);
    }

    pub fn entry(&mut self, player: &str) -> &mut PlayerStats {
        self.players.entry(canonical_player(player)).or_default()
    }

    pub fn players(&self) -> impl Iterator<Item = &str> {
        self.players.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, PlayerStats> {
        self.players.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }
}

impl<'a> IntoIterator for &'a SessionStats {
    type Item = (&'a String, &'a PlayerStats);
    type IntoIter = btree_map::Iter<'a, String, PlayerStats>;

    fn into_iter(self) -> Self::IntoIter {
        self.players.iter()
    }
}

/// One imported sheet, identified the way the caller orders sessions
/// (normally a file stem carrying the date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub stats: SessionStats,
}

impl Session {
    pub fn new(id: impl Into<String>, stats: SessionStats) -> Self {
        Self {
            id: id.into(),
            stats,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        session_date(&self.id)
    }
}

/// Date encoded at the start of a session id, e.g. `2024-03-12` or
/// `12.03.2024_training`.
pub fn session_date(id: &str) -> Option<NaiveDate> {
    let id = id.trim();
    for (fmt, len) in [("%Y-%m-%d", 10), ("%d.%m.%Y", 10), ("%Y%m%d", 8)] {
        let Some(prefix) = id.get(..len) else {
            continue;
        };
        if let Ok(date) = NaiveDate::parse_from_str(prefix, fmt) {
            return Some(date);
        }
    }
    None
}

/// Session id with a trailing workbook extension removed.
pub fn session_id_from_file_name(name: &str) -> String {
    let name = name.trim();
    for ext in [".json", ".xlsx"] {
        let split = name.len().saturating_sub(ext.len());
        if split > 0 && name.is_char_boundary(split) && name[split..].eq_ignore_ascii_case(ext) {
            return name[..split].to_string();
        }
    }
    name.to_string()
}
