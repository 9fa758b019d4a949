use std::path::PathBuf;

use tracing::warn;

use crate::metrics::ReceivePolicy;
use crate::parser::ParserConfig;

pub const DEFAULT_DATA_DIR: &str = "sessions";
pub const DEFAULT_SHEET_NAME: &str = "suma";

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub data_dir: PathBuf,
    /// Sheet holding the per-player totals in each workbook.
    pub sheet_name: String,
    pub parser: ParserConfig,
    /// Receive formula for the per-player summary table.
    pub summary_policy: ReceivePolicy,
    /// Receive formula for the team trend.
    pub trend_policy: ReceivePolicy,
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            parser: ParserConfig::default(),
            summary_policy: ReceivePolicy::Inclusive,
            trend_policy: ReceivePolicy::Inclusive,
            parallel: true,
        }
    }
}

impl AnalysisConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|val| val.trim().to_string())
                .filter(|val| !val.is_empty())
        };
        let mut cfg = Self::default();
        if let Some(dir) = get("VOLLEY_DATA_DIR") {
            cfg.data_dir = PathBuf::from(dir);
        }
        if let Some(name) = get("VOLLEY_SHEET_NAME") {
            cfg.sheet_name = name;
        }
        if let Some(name) = get("VOLLEY_SENTINEL_PLAYER") {
            cfg.parser.sentinel_player = name;
        }
        if let Some(raw) = get("VOLLEY_SUMMARY_RECEIVE_POLICY") {
            cfg.summary_policy = parse_policy("VOLLEY_SUMMARY_RECEIVE_POLICY", &raw, cfg.summary_policy);
        }
        if let Some(raw) = get("VOLLEY_TREND_RECEIVE_POLICY") {
            cfg.trend_policy = parse_policy("VOLLEY_TREND_RECEIVE_POLICY", &raw, cfg.trend_policy);
        }
        if let Some(raw) = get("VOLLEY_PARALLEL") {
            cfg.parallel = !matches!(raw.to_lowercase().as_str(), "0" | "false" | "no" | "off");
        }
        cfg
    }
}

fn parse_policy(key: &str, raw: &str, fallback: ReceivePolicy) -> ReceivePolicy {
    match raw.parse::<ReceivePolicy>() {
        Ok(policy) => policy,
        Err(err) => {
            warn!(key, "{err}; keeping {fallback}");
            fallback
        }
    }
}
