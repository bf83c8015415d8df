//! Layout invariants checked across every supported team count.

use proptest::prelude::*;

use ts_algo::topology::SUPPORTED_TEAM_COUNTS;
use ts_core::{CellRef, DivisionName, Roster, Team};
use ts_io::config::{parse_config_str, TournamentConfig};
use ts_pipeline::{deliver, generate, Document, MemoryWorkbook};

/// One division of `n` teams spread round-robin over `pools`.
fn roster(division: &str, n: usize, pools: &[&str]) -> Roster {
    let name: DivisionName = division.parse().unwrap();
    let mut r = Roster::default();
    for i in 0..n {
        r.push_team(Team::new(
            name.clone(),
            format!("Club {i:02}").parse().unwrap(),
            pools[i % pools.len()].parse().unwrap(),
        ));
    }
    r
}

fn pools_for(n: u32) -> &'static [&'static str] {
    match n {
        4 | 5 => &["A"],
        6 | 8 | 10 => &["A", "B"],
        _ => &["A", "B", "C"],
    }
}

fn all_counts() -> Roster {
    let mut r = Roster::default();
    for n in SUPPORTED_TEAM_COUNTS {
        let d = roster(&format!("D{n}"), n as usize, pools_for(n));
        for div in d.divisions {
            for t in div.teams {
                r.push_team(t);
            }
        }
    }
    r
}

fn doc(r: &Roster, cfg: &TournamentConfig) -> Document {
    generate(r, cfg).unwrap()
}

#[test]
fn reserved_spans_are_disjoint_and_ordered() {
    let d = doc(&all_counts(), &TournamentConfig::default());
    for b in &d.divisions {
        let spans = b.layout.reserved_spans(&b.pools);
        for (i, (a_label, a)) in spans.iter().enumerate() {
            for (b_label, other) in &spans[i + 1..] {
                assert!(!a.overlaps(other), "{}: {a_label} overlaps {b_label}", b.plan.division);
                assert!(a.last < other.first, "{}: {a_label} after {b_label}", b.plan.division);
            }
        }
        let firsts: Vec<u32> = b.layout.standings_row_ranges.iter().map(|r| r.first).collect();
        let mut sorted = firsts.clone();
        sorted.sort_unstable();
        assert_eq!(firsts, sorted);
        if let (Some(h), Some(bracket)) = (b.layout.pool_winner_tables, b.layout.bracket_rows) {
            assert!(h.block.last < bracket.first);
        }
    }
}

#[test]
fn no_cell_is_written_twice() {
    let d = doc(&all_counts(), &TournamentConfig::default());
    let mut wb = MemoryWorkbook::new();
    let sent = deliver(&d, &mut wb).unwrap();
    assert_eq!(sent.len(), SUPPORTED_TEAM_COUNTS.len() + 1);
    assert!(wb.overwrites.is_empty(), "overwritten: {:?}", wb.overwrites);
    for req in d.sheets() {
        let mut cells: Vec<CellRef> = req.values.iter().map(|w| w.cell).collect();
        let n = cells.len();
        cells.sort_unstable();
        cells.dedup();
        assert_eq!(cells.len(), n, "{}", req.sheet);
    }
}

#[test]
fn generation_is_idempotent() {
    let r = all_counts();
    let cfg = TournamentConfig::default();
    let (a, b) = (doc(&r, &cfg), doc(&r, &cfg));
    assert_eq!(a.digest().unwrap(), b.digest().unwrap());
    let (ja, jb) = (
        serde_json::to_value(a.operations()).unwrap(),
        serde_json::to_value(b.operations()).unwrap(),
    );
    assert_json_diff::assert_json_eq!(ja, jb);
}

#[test]
fn digest_changes_with_the_roster() {
    let cfg = TournamentConfig::default();
    let a = doc(&roster("U8", 4, &["A"]), &cfg);
    let b = doc(&roster("U8", 6, &["A", "B"]), &cfg);
    assert_ne!(a.digest().unwrap(), b.digest().unwrap());
}

#[test]
fn every_advancement_lookup_is_guarded() {
    let d = doc(&all_counts(), &TournamentConfig::default());
    for b in &d.divisions {
        let Some(bracket) = b.layout.bracket_rows else { continue };
        let quota = b.plan.topology.game_quota();
        let teams: usize = b.pools.iter().map(|p| p.teams.len()).sum();
        for (cell, f) in b.requests.formulas().filter(|(c, _)| bracket.contains(c.row)) {
            if f.contains("INDEX(") {
                assert!(f.starts_with("=IF(COUNTIF("), "{} {cell}: {f}", b.plan.division);
                assert!(f.contains(&format!(",{quota})")) || f.contains(&format!(",{quota})+")));
                assert!(f.contains(&format!("={teams},")), "{} {cell}: {f}", b.plan.division);
            }
        }
    }
}

#[test]
fn cross_pool_divisions_rank_overall() {
    let d = doc(&all_counts(), &TournamentConfig::default());
    for b in d.divisions.iter().filter(|b| b.plan.topology.uses_cross_pool_rank()) {
        assert!(b.layout.bracket_rows.is_none());
        let overall = b.plan.schemas.standings.require(ts_algo::Column::OverallRank).unwrap();
        for p in &b.pools {
            for row in p.occupied_rows() {
                assert!(b.requests.formula_at(CellRef::new(row, overall)).is_some());
            }
        }
    }
}

#[test]
fn round_spacing_moves_every_round() {
    let cfg = parse_config_str(r#"{"layout": {"round_spacing": 3}}"#).unwrap();
    let d = doc(&roster("U8", 4, &["A"]), &cfg);
    let b = &d.divisions[0];
    let score = b.pools[0].score;
    assert_eq!(score.first_row, 6);
    let stride = b.plan.topology.games_per_round + 3;
    for r in 0..score.rounds {
        let label = score.round_label_row(r);
        assert_eq!(label, 6 + r * stride);
        assert!(b.requests.value_at(CellRef::new(label, 0)).is_some());
        assert!(b.requests.formula_at(CellRef::new(label + 1, 0)).is_some());
    }
    // aggregates range over exactly the game span
    assert_eq!(
        b.requests.formula_at(CellRef::new(2, 1)),
        Some("=COUNTIFS($A$8:$A$19,$A3,$E$8:$E$19,\"?*\")+COUNTIFS($D$8:$D$19,$A3,$E$8:$E$19,\"?*\")")
    );
}

#[test]
fn division_sheets_precede_the_shootout_sheet() {
    let d = doc(&all_counts(), &TournamentConfig::default());
    let names: Vec<&str> = d.sheet_names().into_iter().map(|s| s.as_str()).collect();
    assert_eq!(names.last(), Some(&"Shootout"));
    assert_eq!(names.len(), SUPPORTED_TEAM_COUNTS.len() + 1);
    let shootout = d.shootout.as_ref().unwrap();
    assert_eq!(shootout.sections.len(), SUPPORTED_TEAM_COUNTS.len());
    for w in shootout.sections.windows(2) {
        assert!(w[0].block.last < w[1].block.first);
    }
    assert!(shootout.sections.last().unwrap().block.last < shootout.leaders.first);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Any team count lays out without overwrites or overlapping spans.
    #[test]
    fn arbitrary_counts_lay_out_cleanly(n in 1usize..16, pools in 1usize..4) {
        let labels = ["A", "B", "C"];
        let r = roster("Open", n, &labels[..pools]);
        let Ok(d) = generate(&r, &TournamentConfig::default()) else {
            // oversize pools and too many pools are rejected by validation
            return Ok(());
        };
        let mut wb = MemoryWorkbook::new();
        deliver(&d, &mut wb).unwrap();
        prop_assert!(wb.overwrites.is_empty());
        let b = &d.divisions[0];
        let spans = b.layout.reserved_spans(&b.pools);
        for (i, (_, a)) in spans.iter().enumerate() {
            for (_, other) in &spans[i + 1..] {
                prop_assert!(!a.overlaps(other));
            }
        }
    }
}
