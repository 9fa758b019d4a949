use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use crate::analysis::{SessionSource, SkippedSession};
use crate::error::StatsError;
use crate::session::session_id_from_file_name;
use crate::sheet::load_workbook;

const WORKBOOK_EXT: &str = "json";

/// Workbook file names in `dir`, sorted so date-named files come out in
/// chronological order.
pub fn list_workbooks(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Err(StatsError::InputMissing(format!("directory {} does not exist", dir.display())).into());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("list {}", dir.display()))? {
        let entry = entry.with_context(|| format!("list {}", dir.display()))?;
        let path = entry.path();
        let is_workbook = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(WORKBOOK_EXT));
        if !path.is_file() || !is_workbook {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Workbooks read from disk plus the files that could not be read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedSources {
    pub sources: Vec<SessionSource>,
    pub skipped: Vec<SkippedSession>,
}

/// Load the named workbooks from `dir` (all of them when `names` is empty),
/// sorted by file name. A file that cannot be read or decoded is recorded in
/// `skipped`; only a missing directory fails the whole load.
pub fn load_sources(dir: &Path, names: &[String]) -> Result<LoadedSources> {
    let mut names = if names.is_empty() {
        list_workbooks(dir)?
    } else {
        if !dir.is_dir() {
            return Err(StatsError::InputMissing(format!("directory {} does not exist", dir.display())).into());
        }
        names.to_vec()
    };
    names.sort();
    names.dedup();

    let mut loaded = LoadedSources::default();
    for name in &names {
        let id = session_id_from_file_name(name);
        match load_workbook(&dir.join(name)) {
            Ok(workbook) => loaded.sources.push(SessionSource::new(id, workbook)),
            Err(err) => {
                warn!(file = name.as_str(), "skipping workbook: {err:#}");
                loaded.skipped.push(SkippedSession {
                    id,
                    reason: format!("{err:#}"),
                });
            }
        }
    }
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn tmp_dir(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("volley_stats_source_{name}"));
        let _ = fs::remove_dir_all(&p);
        fs::create_dir_all(&p).unwrap();
        p
    }

    #[test]
    fn unreadable_files_are_skipped_not_fatal() {
        let dir = tmp_dir("skip");
        fs::write(dir.join("2024-01-02.json"), r#"{"sheets":{"suma":[[1]]}}"#).unwrap();
        fs::write(dir.join("2024-01-01.json"), "{not json").unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let loaded = load_sources(&dir, &[]).unwrap();
        assert_eq!(loaded.sources.len(), 1);
        assert_eq!(loaded.sources[0].id, "2024-01-02");
        assert_eq!(loaded.skipped.len(), 1);
        assert_eq!(loaded.skipped[0].id, "2024-01-01");
        assert!(!loaded.skipped[0].reason.is_empty());
    }

    #[test]
    fn named_file_that_does_not_exist_is_skipped() {
        let dir = tmp_dir("named");
        let loaded = load_sources(&dir, &["2024-02-01.json".to_string()]).unwrap();
        assert!(loaded.sources.is_empty());
        assert_eq!(loaded.skipped[0].id, "2024-02-01");
    }
}
