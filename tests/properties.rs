use volley_stats::aggregate::{merge_sessions, merge_stats};
use volley_stats::metrics::{ReceivePolicy, receive_efficiency, round1, summarize};
use volley_stats::parser::{ParserConfig, parse_sheet};
use volley_stats::session::{PlayerStats, Session, SessionStats};
use volley_stats::sheet::{Cell, Sheet};
use volley_stats::stat_code::StatCode;
use volley_stats::trend::{TrendCategory, build_player_trend};

fn stats(rows: &[(&str, StatCode, f64)]) -> SessionStats {
    let mut out = SessionStats::new();
    for (player, code, value) in rows {
        out.set(player, *code, *value);
    }
    out
}

// Small deterministic generator so the property checks cover more than a
// couple of hand-picked inputs.
fn sample_sessions(seed: u64, count: usize) -> Vec<SessionStats> {
    let players = ["ann", "bob", "cleo", "dora", "ela"];
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 33) as usize
    };
    (0..count)
        .map(|_| {
            let mut out = SessionStats::new();
            for _ in 0..12 {
                let player = players[next() % players.len()];
                let code = StatCode::ALL[next() % StatCode::ALL.len()];
                out.set(player, code, (next() % 9) as f64);
            }
            out
        })
        .collect()
}

#[test]
fn merge_is_commutative() {
    for seed in 1..20 {
        let sessions = sample_sessions(seed, 2);
        let (a, b) = (&sessions[0], &sessions[1]);
        assert_eq!(merge_stats([a, b]), merge_stats([b, a]));
    }
}

#[test]
fn merge_of_one_session_summarizes_identically() {
    for seed in 1..20 {
        let s = &sample_sessions(seed, 1)[0];
        for policy in [ReceivePolicy::Inclusive, ReceivePolicy::Weighted] {
            assert_eq!(summarize(&merge_stats([s]), policy), summarize(s, policy));
        }
    }
}

#[test]
fn inclusive_receive_stays_in_range() {
    for session in sample_sessions(7, 10) {
        for (_, player) in &session {
            let value = receive_efficiency(player, ReceivePolicy::Inclusive);
            assert!((0.0..=100.0).contains(&value), "{value}");
        }
    }
}

#[test]
fn weighted_receive_goes_negative_when_aces_dominate() {
    let player: PlayerStats = [(StatCode::OkReceive, 1.0), (StatCode::EnemyAce, 2.0)]
        .into_iter()
        .collect();
    assert!(receive_efficiency(&player, ReceivePolicy::Weighted) < 0.0);
}

#[test]
fn all_zero_attack_is_zero_efficiency() {
    let s = stats(&[("ann", StatCode::Attack, 0.0), ("ann", StatCode::Out, 0.0)]);
    assert_eq!(summarize(&s, ReceivePolicy::Inclusive)[0].attack_efficiency, 0.0);
}

#[test]
fn parsed_sheet_gives_expected_attack_efficiency() {
    let n = Cell::Empty;
    let sheet = Sheet::new(vec![
        vec![],
        vec![],
        vec![n.clone(), n.clone(), n.clone(), "Ann".into(), "Bob".into()],
        vec![n.clone(), "^1".into(), n.clone(), 10.into(), 3.into()],
        vec![n.clone(), "^3".into(), n.clone(), 2.into(), n.clone()],
        vec![n.clone(), "^2".into(), n.clone(), 1.into(), n.clone()],
    ]);
    let parsed = parse_sheet(&sheet, &ParserConfig::default()).expect("coded sheet");
    let rows = summarize(&parsed, ReceivePolicy::Inclusive);
    assert_eq!(rows[0].player, "ann");
    assert_eq!(round1(rows[0].attack_efficiency), 76.9);
    assert_eq!(rows[1].attack_efficiency, 100.0);
}

#[test]
fn two_session_merge_scenario() {
    let s1 = stats(&[("Ann", StatCode::Attack, 5.0)]);
    let s2 = stats(&[("Ann", StatCode::Attack, 7.0), ("Ann", StatCode::Out, 3.0)]);
    let merged = merge_stats([&s1, &s2]);
    assert_eq!(merged.get("ann", StatCode::Attack), 12.0);
    assert_eq!(merged.get("ann", StatCode::Out), 3.0);
    let rows = summarize(&merged, ReceivePolicy::Inclusive);
    assert_eq!(round1(rows[0].attack_efficiency), 80.0);
}

#[test]
fn player_missing_from_later_session_reads_zero() {
    let sessions = vec![
        Session::new("s1", stats(&[("Ann", StatCode::Attack, 5.0)])),
        Session::new("s2", stats(&[("Bob", StatCode::Attack, 1.0)])),
    ];
    let trend = build_player_trend("ann", &sessions);
    for category in TrendCategory::ALL {
        for series in &trend[&category] {
            assert_eq!(series.values.len(), 2);
            assert_eq!(series.values[1], 0.0);
        }
    }
    assert_eq!(trend[&TrendCategory::Attack][0].values, vec![5.0, 0.0]);
    assert_eq!(merge_sessions(&sessions).len(), 2);
}

#[test]
fn fractional_merge_ignores_session_order() {
    for seed in 1..20 {
        let sessions: Vec<SessionStats> = sample_sessions(seed, 4)
            .into_iter()
            .map(|s| {
                let mut scaled = SessionStats::new();
                for (player, values) in &s {
                    for (code, value) in values.iter() {
                        scaled.set(player, code, value * 0.1);
                    }
                }
                scaled
            })
            .collect();
        let forward = merge_stats(&sessions);
        let backward = merge_stats(sessions.iter().rev());
        let rotated = merge_stats(sessions[2..].iter().chain(&sessions[..2]));
        assert_eq!(forward, backward);
        assert_eq!(forward, rotated);
        assert_eq!(
            summarize(&forward, ReceivePolicy::Weighted),
            summarize(&backward, ReceivePolicy::Weighted)
        );
    }
}
