use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One scalar spreadsheet cell as exported from a workbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    /// Only real numbers count; numeric-looking text is left alone.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    /// Trimmed text content, `None` for numbers, blanks and whitespace-only text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => {
                let s = s.trim();
                if s.is_empty() { None } else { Some(s) }
            }
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Cell::Number(f64::from(value))
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

/// Row-major grid of cells. Rows may be ragged; anything past a row's end
/// reads as [`Cell::Empty`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sheet {
    rows: Vec<Vec<Cell>>,
}

static EMPTY: Cell = Cell::Empty;

impl Sheet {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn row(&self, idx: usize) -> &[Cell] {
        self.rows.get(idx).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.row(row).get(col).unwrap_or(&EMPTY)
    }

    pub fn rows(&self) -> impl Iterator<Item = (usize, &[Cell])> {
        self.rows.iter().enumerate().map(|(idx, r)| (idx, r.as_slice()))
    }

    /// Plain-text dump, one line per row, used for debug tracing.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (idx, row) in self.rows() {
            out.push_str(&format!("{:3}|", idx + 1));
            for cell in row {
                let text = match cell {
                    Cell::Number(v) => format!("{v}"),
                    Cell::Text(s) => s.clone(),
                    Cell::Empty => String::new(),
                };
                out.push_str(&format!("{text:^10}"));
            }
            out.push('\n');
        }
        out
    }
}

/// A loaded workbook: named sheets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    #[serde(default)]
    pub sheets: BTreeMap<String, Sheet>,
}

impl Workbook {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("parse workbook json")
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.get(name).or_else(|| {
            self.sheets
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, sheet)| sheet)
        })
    }
}

pub fn load_workbook(path: &Path) -> Result<Workbook> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading workbook {}", path.display()))?;
    Workbook::from_json_str(&raw).with_context(|| format!("in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_deserialize_from_json_scalars() {
        let sheet: Sheet = serde_json::from_str(r#"[[null, "^1", 3, 2.5]]"#).unwrap();
        assert_eq!(sheet.cell(0, 0), &Cell::Empty);
        assert_eq!(sheet.cell(0, 1).as_text(), Some("^1"));
        assert_eq!(sheet.cell(0, 2).as_number(), Some(3.0));
        assert_eq!(sheet.cell(0, 3).as_number(), Some(2.5));
    }

    #[test]
    fn out_of_range_reads_empty() {
        let sheet = Sheet::new(vec![vec![Cell::from(1)]]);
        assert_eq!(sheet.cell(5, 5), &Cell::Empty);
        assert!(sheet.row(9).is_empty());
        assert_eq!(sheet.col_count(), 1);
    }

    #[test]
    fn numeric_text_is_not_a_number() {
        assert_eq!(Cell::from("12").as_number(), None);
        assert!(Cell::from("  ").is_blank());
    }

    #[test]
    fn sheet_lookup_falls_back_to_case_insensitive() {
        let wb = Workbook::from_json_str(r#"{"sheets":{"Suma":[[1]]}}"#).unwrap();
        assert!(wb.sheet("suma").is_some());
        assert!(wb.sheet("other").is_none());
    }
}
