use std::fmt;

use serde::{Deserialize, Serialize};

/// Every tallied event the sheets are known to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatCode {
    Attack,
    AttackNet,
    Out,
    PositionError,
    StanceError,
    Ace,
    ServePoint,
    ServeNet,
    ServeOut,
    GoodReceive,
    OkReceive,
    BadReceive,
    ReceiveOut,
    EnemyAce,
    PerfectSet,
    GoodSet,
    PlayableSet,
    BadSet,
    Dig,
    Defence,
    Block,
    FreeBall,
    EnemyBlock,
    EnemyFault,
    LostPoint,
    ScoredPoints,
    LostPoints,
}

impl StatCode {
    pub const ALL: [StatCode; 27] = [
        StatCode::Attack,
        StatCode::AttackNet,
        StatCode::Out,
        StatCode::PositionError,
        StatCode::StanceError,
        StatCode::Ace,
        StatCode::ServePoint,
        StatCode::ServeNet,
        StatCode::ServeOut,
        StatCode::GoodReceive,
        StatCode::OkReceive,
        StatCode::BadReceive,
        StatCode::ReceiveOut,
        StatCode::EnemyAce,
        StatCode::PerfectSet,
        StatCode::GoodSet,
        StatCode::PlayableSet,
        StatCode::BadSet,
        StatCode::Dig,
        StatCode::Defence,
        StatCode::Block,
        StatCode::FreeBall,
        StatCode::EnemyBlock,
        StatCode::EnemyFault,
        StatCode::LostPoint,
        StatCode::ScoredPoints,
        StatCode::LostPoints,
    ];

    /// The label as it is written in the sheets.
    pub fn label(self) -> &'static str {
        match self {
            StatCode::Attack => "attack",
            StatCode::AttackNet => "attack net",
            StatCode::Out => "out",
            StatCode::PositionError => "position error",
            StatCode::StanceError => "stance error",
            StatCode::Ace => "ace",
            StatCode::ServePoint => "serve point",
            StatCode::ServeNet => "serve net",
            StatCode::ServeOut => "serve out",
            StatCode::GoodReceive => "good receive",
            StatCode::OkReceive => "ok receive",
            StatCode::BadReceive => "bad receive",
            StatCode::ReceiveOut => "receive out",
            StatCode::EnemyAce => "enemy ace",
            StatCode::PerfectSet => "perfect set",
            StatCode::GoodSet => "good set",
            StatCode::PlayableSet => "playable set",
            StatCode::BadSet => "bad set",
            StatCode::Dig => "dig",
            StatCode::Defence => "defence",
            StatCode::Block => "block",
            StatCode::FreeBall => "free ball",
            StatCode::EnemyBlock => "enemy block",
            StatCode::EnemyFault => "enemy fault",
            StatCode::LostPoint => "lost point",
            StatCode::ScoredPoints => "scored points",
            StatCode::LostPoints => "lost points",
        }
    }

    /// Resolve a free-form sheet label. Case, surrounding whitespace and the
    /// choice of space, hyphen or underscore between words do not matter.
    pub fn from_label(raw: &str) -> Option<StatCode> {
        let norm = raw
            .trim()
            .to_lowercase()
            .replace(['-', '_'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if norm.is_empty() {
            return None;
        }
        StatCode::ALL.into_iter().find(|code| code.label() == norm)
    }

    /// Two-character action codes of the coded layout.
    pub fn from_action_code(raw: &str) -> Option<StatCode> {
        let code = match raw.trim() {
            "!1" => StatCode::GoodReceive,
            "!2" => StatCode::OkReceive,
            "!3" => StatCode::BadReceive,
            "!4" => StatCode::EnemyAce,
            "@1" => StatCode::Ace,
            "@2" => StatCode::ServeNet,
            "@3" => StatCode::ServeOut,
            "#1" => StatCode::PositionError,
            "#2" => StatCode::StanceError,
            "#3" => StatCode::FreeBall,
            "#4" => StatCode::LostPoint,
            "$1" => StatCode::PerfectSet,
            "$2" => StatCode::GoodSet,
            "$3" => StatCode::PlayableSet,
            "$4" => StatCode::BadSet,
            "%1" => StatCode::Dig,
            "%2" => StatCode::Block,
            "^1" => StatCode::Attack,
            "^2" => StatCode::Out,
            "^3" => StatCode::AttackNet,
            _ => return None,
        };
        Some(code)
    }

    /// Row markers whose values are point totals rather than coded actions.
    pub fn from_point_marker(raw: &str) -> Option<StatCode> {
        match raw.trim().to_lowercase().as_str() {
            "scored" => Some(StatCode::ScoredPoints),
            "lost" => Some(StatCode::LostPoints),
            _ => None,
        }
    }
}

impl fmt::Display for StatCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
