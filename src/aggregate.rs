use std::collections::BTreeMap;

use crate::session::{Session, SessionStats, canonical_player};
use crate::stat_code::StatCode;

/// Sum every (player, stat) across sessions. Missing cells count as zero and
/// a player appears only if some session has them. The result is itself a
/// valid input, so partial merges can be combined.
///
/// Each cell is summed over its values in sorted order, so any permutation of
/// the same sessions yields bit-identical totals.
pub fn merge_stats<'a, I>(sessions: I) -> SessionStats
where
    I: IntoIterator<Item = &'a SessionStats>,
{
    let mut merged = SessionStats::new();
    let mut cells: BTreeMap<(String, StatCode), Vec<f64>> = BTreeMap::new();
    for stats in sessions {
        for (player, values) in stats {
            let key = canonical_player(player);
            merged.entry(&key);
            for (code, value) in values.iter() {
                cells.entry((key.clone(), code)).or_default().push(value);
            }
        }
    }
    for ((player, code), values) in cells {
        merged.set(&player, code, ordered_sum(values));
    }
    merged
}

pub fn merge_sessions(sessions: &[Session]) -> SessionStats {
    merge_stats(sessions.iter().map(|s| &s.stats))
}

// Sorted, compensated (Neumaier) sum.
fn ordered_sum(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    let mut sum = 0.0_f64;
    let mut carry = 0.0_f64;
    for value in values {
        let next = sum + value;
        if sum.abs() >= value.abs() {
            carry += (sum - next) + value;
        } else {
            carry += (value - next) + sum;
        }
        sum = next;
    }
    sum + carry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stat_code::StatCode;

    fn stats(rows: &[(&str, StatCode, f64)]) -> SessionStats {
        let mut out = SessionStats::new();
        for (player, code, value) in rows {
            out.set(player, *code, *value);
        }
        out
    }

    #[test]
    fn sums_overlapping_and_disjoint_players() {
        let a = stats(&[("Ann", StatCode::Attack, 5.0), ("Bob", StatCode::Ace, 1.0)]);
        let b = stats(&[
            ("ann", StatCode::Attack, 7.0),
            ("ann", StatCode::Out, 3.0),
            ("Cleo", StatCode::Dig, 2.0),
        ]);
        let merged = merge_stats([&a, &b]);
        assert_eq!(merged.get("ann", StatCode::Attack), 12.0);
        assert_eq!(merged.get("ann", StatCode::Out), 3.0);
        assert_eq!(merged.get("bob", StatCode::Ace), 1.0);
        assert_eq!(merged.get("cleo", StatCode::Dig), 2.0);
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn merge_is_order_independent() {
        let a = stats(&[("ann", StatCode::Attack, 5.0), ("ann", StatCode::Block, 0.5)]);
        let b = stats(&[("bob", StatCode::Attack, 2.0), ("ann", StatCode::Block, 1.25)]);
        let c = stats(&[("ann", StatCode::Ace, 1.0)]);
        assert_eq!(merge_stats([&a, &b]), merge_stats([&b, &a]));

        let left = merge_stats([&merge_stats([&a, &b]), &c]);
        let right = merge_stats([&a, &merge_stats([&b, &c])]);
        assert_eq!(left, right);
    }

    #[test]
    fn fractional_values_merge_identically_in_any_order() {
        let a = stats(&[("ann", StatCode::Attack, 0.1)]);
        let b = stats(&[("ann", StatCode::Attack, 0.2)]);
        let c = stats(&[("Ann", StatCode::Attack, 0.3), ("bob", StatCode::Out, 0.7)]);

        let abc = merge_stats([&a, &b, &c]);
        let orders = [
            merge_stats([&c, &b, &a]),
            merge_stats([&b, &c, &a]),
            merge_stats([&c, &a, &b]),
        ];
        for other in &orders {
            assert_eq!(&abc, other);
        }
        assert!((abc.get("ann", StatCode::Attack) - 0.6).abs() < 1e-12);
        assert_eq!(abc.get("bob", StatCode::Out), 0.7);
    }

    #[test]
    fn players_without_values_still_appear() {
        let mut a = SessionStats::new();
        a.entry("Dora");
        let merged = merge_stats([&a]);
        assert!(merged.player("dora").is_some());
        assert_eq!(merged.get("dora", StatCode::Attack), 0.0);
    }

    #[test]
    fn empty_input_merges_to_empty() {
        let none: [&SessionStats; 0] = [];
        assert!(merge_stats(none).is_empty());
        let a = stats(&[("ann", StatCode::Attack, 5.0)]);
        assert_eq!(merge_stats([&a]), a);
    }
}
