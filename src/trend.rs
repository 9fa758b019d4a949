use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metrics::{self, ReceivePolicy};
use crate::session::{PlayerStats, Session, canonical_player};
use crate::stat_code::StatCode;

/// Chart groups. A stat outside every group stays in the raw data but is
/// never plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendCategory {
    Attack,
    Serve,
    Receive,
    Set,
    Other,
    Points,
}

impl TrendCategory {
    pub const ALL: [TrendCategory; 6] = [
        TrendCategory::Attack,
        TrendCategory::Serve,
        TrendCategory::Receive,
        TrendCategory::Set,
        TrendCategory::Other,
        TrendCategory::Points,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TrendCategory::Attack => "attack",
            TrendCategory::Serve => "serve",
            TrendCategory::Receive => "receive",
            TrendCategory::Set => "set",
            TrendCategory::Other => "other",
            TrendCategory::Points => "points",
        }
    }

    pub fn stats(self) -> &'static [StatCode] {
        match self {
            TrendCategory::Attack => &[
                StatCode::Attack,
                StatCode::AttackNet,
                StatCode::Out,
                StatCode::Block,
            ],
            TrendCategory::Serve => &[
                StatCode::Ace,
                StatCode::ServePoint,
                StatCode::ServeNet,
                StatCode::ServeOut,
            ],
            TrendCategory::Receive => &[
                StatCode::GoodReceive,
                StatCode::OkReceive,
                StatCode::BadReceive,
                StatCode::ReceiveOut,
                StatCode::EnemyAce,
            ],
            TrendCategory::Set => &[
                StatCode::PerfectSet,
                StatCode::GoodSet,
                StatCode::PlayableSet,
                StatCode::BadSet,
            ],
            TrendCategory::Other => &[
                StatCode::FreeBall,
                StatCode::Defence,
                StatCode::EnemyBlock,
                StatCode::EnemyFault,
            ],
            TrendCategory::Points => &[StatCode::ScoredPoints, StatCode::LostPoints],
        }
    }
}

impl fmt::Display for TrendCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Team efficiencies for one session plus raw stats for every player seen in
/// any of the trended sessions. A player absent from this session is present
/// with empty stats, so lookups read zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub session_id: String,
    pub attack_efficiency: f64,
    pub serve_efficiency: f64,
    pub receive_efficiency: f64,
    pub set_efficiency: f64,
    pub players: BTreeMap<String, PlayerStats>,
}

/// One line of a player chart: a stat's value in each session, in session
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSeries {
    pub stat: StatCode,
    pub values: Vec<f64>,
}

pub type PlayerTrend = BTreeMap<TrendCategory, Vec<StatSeries>>;

/// Sessions are taken in the order given.
pub fn build_team_trend(sessions: &[Session], policy: ReceivePolicy) -> Vec<TrendPoint> {
    let seen = roster(sessions);
    sessions
        .iter()
        .map(|session| {
            let team = metrics::team_stats(&session.stats);
            TrendPoint {
                session_id: session.id.clone(),
                attack_efficiency: metrics::attack_efficiency(&team),
                serve_efficiency: metrics::serve_efficiency(&team),
                receive_efficiency: metrics::receive_efficiency(&team, policy),
                set_efficiency: metrics::set_efficiency(&team),
                players: seen
                    .iter()
                    .map(|name| {
                        let stats = session.stats.player(name).cloned().unwrap_or_default();
                        (name.to_string(), stats)
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Per-category series for one player. A session without the player
/// contributes zeros, so every series has one value per session.
pub fn build_player_trend(player: &str, sessions: &[Session]) -> PlayerTrend {
    let key = canonical_player(player);
    let empty = PlayerStats::new();
    let per_session: Vec<&PlayerStats> = sessions
        .iter()
        .map(|s| s.stats.player(&key).unwrap_or(&empty))
        .collect();

    TrendCategory::ALL
        .into_iter()
        .map(|category| {
            let series = category
                .stats()
                .iter()
                .map(|stat| StatSeries {
                    stat: *stat,
                    values: per_session.iter().map(|p| p.get(*stat)).collect(),
                })
                .collect();
            (category, series)
        })
        .collect()
}

fn roster(sessions: &[Session]) -> BTreeSet<&str> {
    sessions.iter().flat_map(|s| s.stats.players()).collect()
}

/// Trends for every player seen in any of the sessions.
pub fn build_all_player_trends(sessions: &[Session]) -> BTreeMap<String, PlayerTrend> {
    roster(sessions)
        .into_iter()
        .map(|player| (player.to_string(), build_player_trend(player, sessions)))
        .collect()
}
