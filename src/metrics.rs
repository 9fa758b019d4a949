use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::session::{PlayerStats, SessionStats};
use crate::stat_code::StatCode;

pub const TOTAL_ROW_LABEL: &str = "total";

const ATTACK_ERRORS: &[StatCode] = &[StatCode::AttackNet, StatCode::Out];
const SERVE_SCORED: &[StatCode] = &[StatCode::Ace, StatCode::ServePoint];
const SERVE_ERRORS: &[StatCode] = &[StatCode::ServeNet, StatCode::ServeOut];
const SET_GOOD: &[StatCode] = &[StatCode::PerfectSet, StatCode::GoodSet];
const SET_ALL: &[StatCode] = &[
    StatCode::PerfectSet,
    StatCode::GoodSet,
    StatCode::PlayableSet,
    StatCode::BadSet,
];
const POINTS_WON: &[StatCode] = &[StatCode::Attack, StatCode::Ace, StatCode::ServePoint];
const POINTS_GIVEN: &[StatCode] = &[
    StatCode::AttackNet,
    StatCode::Out,
    StatCode::ServeNet,
    StatCode::ServeOut,
    StatCode::ReceiveOut,
    StatCode::EnemyAce,
    StatCode::EnemyBlock,
];

/// How a receive is credited. The two formulas have both been in use; each
/// report picks one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceivePolicy {
    /// Good and ok receives count as successes; bad receives and conceded
    /// aces as failures. Always within 0..=100.
    Inclusive,
    /// Partial credit (good 1.0, ok 0.66, bad 0.33) minus one per conceded
    /// ace. Can go negative.
    Weighted,
}

impl ReceivePolicy {
    pub fn name(self) -> &'static str {
        match self {
            ReceivePolicy::Inclusive => "inclusive",
            ReceivePolicy::Weighted => "weighted",
        }
    }
}

impl fmt::Display for ReceivePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReceivePolicy {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "inclusive" => Ok(ReceivePolicy::Inclusive),
            "weighted" => Ok(ReceivePolicy::Weighted),
            other => Err(format!("unknown receive policy: {other}")),
        }
    }
}

/// `part / whole * 100`, zero when there is nothing to divide by.
pub fn ratio_pct(part: f64, whole: f64) -> f64 {
    if whole == 0.0 { 0.0 } else { part / whole * 100.0 }
}

/// Display rounding. Never feed the result back into aggregation.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn attack_efficiency(stats: &PlayerStats) -> f64 {
    let attacks = stats.get(StatCode::Attack);
    ratio_pct(attacks, attacks + stats.sum(ATTACK_ERRORS))
}

pub fn serve_efficiency(stats: &PlayerStats) -> f64 {
    let scored = stats.sum(SERVE_SCORED);
    ratio_pct(scored, scored + stats.sum(SERVE_ERRORS))
}

pub fn receive_efficiency(stats: &PlayerStats, policy: ReceivePolicy) -> f64 {
    let good = stats.get(StatCode::GoodReceive);
    let ok = stats.get(StatCode::OkReceive);
    let bad = stats.get(StatCode::BadReceive);
    let aces = stats.get(StatCode::EnemyAce);
    let total = good + ok + bad + aces;
    match policy {
        ReceivePolicy::Inclusive => ratio_pct(good + ok, total),
        ReceivePolicy::Weighted => ratio_pct(good + ok * 0.66 + bad * 0.33 - aces, total),
    }
}

pub fn set_efficiency(stats: &PlayerStats) -> f64 {
    ratio_pct(stats.sum(SET_GOOD), stats.sum(SET_ALL))
}

/// Receive quality split: each grade as a share of good + ok + bad receives.
/// Conceded aces are not part of this total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiveMix {
    pub total: f64,
    pub good_pct: f64,
    pub ok_pct: f64,
    pub bad_pct: f64,
}

impl ReceiveMix {
    pub fn from_stats(stats: &PlayerStats) -> Self {
        let good = stats.get(StatCode::GoodReceive);
        let ok = stats.get(StatCode::OkReceive);
        let bad = stats.get(StatCode::BadReceive);
        let total = good + ok + bad;
        Self {
            total,
            good_pct: ratio_pct(good, total),
            ok_pct: ratio_pct(ok, total),
            bad_pct: ratio_pct(bad, total),
        }
    }
}

/// Set quality split over all sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SetMix {
    pub total: f64,
    pub perfect_pct: f64,
    pub good_pct: f64,
    pub playable_pct: f64,
    pub bad_pct: f64,
}

impl SetMix {
    pub fn from_stats(stats: &PlayerStats) -> Self {
        let total = stats.sum(SET_ALL);
        Self {
            total,
            perfect_pct: ratio_pct(stats.get(StatCode::PerfectSet), total),
            good_pct: ratio_pct(stats.get(StatCode::GoodSet), total),
            playable_pct: ratio_pct(stats.get(StatCode::PlayableSet), total),
            bad_pct: ratio_pct(stats.get(StatCode::BadSet), total),
        }
    }
}

/// Points a player won directly: attack kills, aces and serve points.
pub fn points_won(stats: &PlayerStats) -> f64 {
    stats.sum(POINTS_WON)
}

/// Points a player gave away through attack, serve and receive errors,
/// conceded aces and being blocked.
pub fn points_given(stats: &PlayerStats) -> f64 {
    stats.sum(POINTS_GIVEN)
}

/// Raw totals and derived efficiencies for one player (or the team total).
/// Efficiencies are unrounded; apply [`round1`] only when presenting them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub player: String,
    pub attacks: f64,
    pub attack_net: f64,
    pub outs: f64,
    pub attack_errors: f64,
    pub position_errors: f64,
    pub stance_errors: f64,
    pub aces: f64,
    pub serve_points: f64,
    pub serve_net: f64,
    pub serve_out: f64,
    pub good_receives: f64,
    pub ok_receives: f64,
    pub bad_receives: f64,
    pub receive_outs: f64,
    pub enemy_aces: f64,
    pub perfect_sets: f64,
    pub good_sets: f64,
    pub playable_sets: f64,
    pub bad_sets: f64,
    pub digs: f64,
    pub defences: f64,
    pub blocks: f64,
    pub free_balls: f64,
    pub enemy_blocks: f64,
    pub enemy_faults: f64,
    pub lost_point_other: f64,
    pub scored_points: f64,
    pub lost_points: f64,
    pub points_won: f64,
    pub points_given: f64,
    pub receive_mix: ReceiveMix,
    pub set_mix: SetMix,
    pub attack_efficiency: f64,
    pub serve_efficiency: f64,
    pub receive_efficiency: f64,
    pub set_efficiency: f64,
    pub receive_policy: ReceivePolicy,
}

impl SummaryRow {
    pub fn from_stats(player: &str, stats: &PlayerStats, policy: ReceivePolicy) -> Self {
        Self {
            player: player.to_string(),
            attacks: stats.get(StatCode::Attack),
            attack_net: stats.get(StatCode::AttackNet),
            outs: stats.get(StatCode::Out),
            attack_errors: stats.sum(ATTACK_ERRORS),
            position_errors: stats.get(StatCode::PositionError),
            stance_errors: stats.get(StatCode::StanceError),
            aces: stats.get(StatCode::Ace),
            serve_points: stats.get(StatCode::ServePoint),
            serve_net: stats.get(StatCode::ServeNet),
            serve_out: stats.get(StatCode::ServeOut),
            good_receives: stats.get(StatCode::GoodReceive),
            ok_receives: stats.get(StatCode::OkReceive),
            bad_receives: stats.get(StatCode::BadReceive),
            receive_outs: stats.get(StatCode::ReceiveOut),
            enemy_aces: stats.get(StatCode::EnemyAce),
            perfect_sets: stats.get(StatCode::PerfectSet),
            good_sets: stats.get(StatCode::GoodSet),
            playable_sets: stats.get(StatCode::PlayableSet),
            bad_sets: stats.get(StatCode::BadSet),
            digs: stats.get(StatCode::Dig),
            defences: stats.get(StatCode::Defence),
            blocks: stats.get(StatCode::Block),
            free_balls: stats.get(StatCode::FreeBall),
            enemy_blocks: stats.get(StatCode::EnemyBlock),
            enemy_faults: stats.get(StatCode::EnemyFault),
            lost_point_other: stats.get(StatCode::LostPoint),
            scored_points: stats.get(StatCode::ScoredPoints),
            lost_points: stats.get(StatCode::LostPoints),
            points_won: points_won(stats),
            points_given: points_given(stats),
            receive_mix: ReceiveMix::from_stats(stats),
            set_mix: SetMix::from_stats(stats),
            attack_efficiency: attack_efficiency(stats),
            serve_efficiency: serve_efficiency(stats),
            receive_efficiency: receive_efficiency(stats, policy),
            set_efficiency: set_efficiency(stats),
            receive_policy: policy,
        }
    }

    pub fn total_receives(&self) -> f64 {
        self.good_receives + self.ok_receives + self.bad_receives + self.enemy_aces
    }

    pub fn serve_errors(&self) -> f64 {
        self.serve_net + self.serve_out
    }

    pub fn total_sets(&self) -> f64 {
        self.perfect_sets + self.good_sets + self.playable_sets + self.bad_sets
    }

    pub fn is_total(&self) -> bool {
        self.player == TOTAL_ROW_LABEL
    }
}

/// One row per player, ascending by canonical name.
pub fn summarize(stats: &SessionStats, policy: ReceivePolicy) -> Vec<SummaryRow> {
    stats
        .iter()
        .map(|(player, values)| SummaryRow::from_stats(player, values, policy))
        .collect()
}

/// Stats of every player added together.
pub fn team_stats(stats: &SessionStats) -> PlayerStats {
    let mut team = PlayerStats::new();
    for (_, values) in stats {
        team.add_all(values);
    }
    team
}

/// The team row: efficiencies recomputed from summed counts, not averaged.
pub fn team_totals(stats: &SessionStats, policy: ReceivePolicy) -> SummaryRow {
    SummaryRow::from_stats(TOTAL_ROW_LABEL, &team_stats(stats), policy)
}

pub fn summarize_with_total(stats: &SessionStats, policy: ReceivePolicy) -> Vec<SummaryRow> {
    let mut rows = summarize(stats, policy);
    if !rows.is_empty() {
        rows.push(team_totals(stats, policy));
    }
    rows
}

const RULE_WIDE: usize = 50;
const RULE_NARROW: usize = 30;

/// Console report, one block per player.
pub fn render_report(rows: &[SummaryRow], is_summary: bool) -> String {
    if rows.is_empty() {
        return "No player stats found\n".to_string();
    }

    let mut out = String::new();
    out.push_str(if is_summary {
        "\nSUMMARY OF ALL SESSIONS:\n"
    } else {
        "\nPlayer stats:\n"
    });
    out.push_str(&"-".repeat(RULE_WIDE));
    out.push('\n');

    for row in rows {
        out.push_str(&format!("\n{}:\n", row.player.to_uppercase()));

        out.push_str("ATTACK:\n");
        out.push_str(&format!("  Points: {}\n", num(row.attacks)));
        out.push_str(&format!("  Errors: {}\n", num(row.attack_errors)));
        out.push_str(&format!("  Efficiency: {:.1}%\n", row.attack_efficiency));

        out.push_str("\nSERVE:\n");
        out.push_str(&format!("  Aces: {}\n", num(row.aces + row.serve_points)));
        out.push_str(&format!("  Errors: {}\n", num(row.serve_errors())));
        out.push_str(&format!("  Efficiency: {:.1}%\n", row.serve_efficiency));

        out.push_str("\nRECEIVE:\n");
        out.push_str(&format!("  Perfect: {}\n", num(row.good_receives)));
        out.push_str(&format!("  Fairly good: {}\n", num(row.ok_receives)));
        out.push_str(&format!("  Poor: {}\n", num(row.bad_receives)));
        out.push_str(&format!("  Opponent aces: {}\n", num(row.enemy_aces)));
        out.push_str(&format!("  Total receives: {}\n", num(row.total_receives())));
        out.push_str(&format!(
            "  Mix: good {:.1}% / ok {:.1}% / poor {:.1}% of {}\n",
            row.receive_mix.good_pct,
            row.receive_mix.ok_pct,
            row.receive_mix.bad_pct,
            num(row.receive_mix.total)
        ));
        out.push_str(&format!(
            "  Efficiency ({}): {:.1}%\n",
            row.receive_policy, row.receive_efficiency
        ));

        out.push_str("\nSET:\n");
        out.push_str(&format!("  Total sets: {}\n", num(row.total_sets())));
        out.push_str(&format!(
            "  Mix: perfect {:.1}% / good {:.1}% / playable {:.1}% / bad {:.1}%\n",
            row.set_mix.perfect_pct,
            row.set_mix.good_pct,
            row.set_mix.playable_pct,
            row.set_mix.bad_pct
        ));
        out.push_str(&format!("  Efficiency: {:.1}%\n", row.set_efficiency));

        out.push_str("\nPOINTS:\n");
        out.push_str(&format!("  Won: {}\n", num(row.points_won)));
        out.push_str(&format!("  Given away: {}\n", num(row.points_given)));

        out.push_str("\nOTHER:\n");
        out.push_str(&format!("  Blocks: {}\n", num(row.blocks)));
        out.push_str(&format!("  Free balls: {}\n", num(row.free_balls)));
        out.push_str(&"-".repeat(RULE_NARROW));
        out.push('\n');
    }
    out
}

// Whole counts print without a trailing ".0".
fn num(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
