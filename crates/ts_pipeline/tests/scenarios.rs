//! End-to-end scenarios: roster CSV in, delivered workbook out.
//!
//! Coordinates are 0-based in code; formula text is A1 (1-based).

use ts_core::{CellRef, Roster, SheetName};
use ts_io::config::{parse_config_str, TournamentConfig};
use ts_io::roster::read_roster;
use ts_pipeline::{deliver, generate, retrofit_widths, CellValue, DocumentService, MemoryWorkbook, PipelineError};

fn roster(csv: &str) -> Roster {
    read_roster(csv.as_bytes()).expect("roster parses")
}

fn teams(division: &str, names: &[(&str, &str)]) -> String {
    let mut s = String::from("division,team,pool\n");
    for (team, pool) in names {
        s.push_str(&format!("{division},{team},{pool}\n"));
    }
    s
}

fn four_team_csv() -> String {
    teams("U8", &[("Ants", "A"), ("Bees", "A"), ("Cats", "A"), ("Dogs", "A")])
}

fn twelve_team_csv() -> String {
    let names = [
        ("Ash", "A"), ("Birch", "A"), ("Cedar", "A"), ("Dogwood", "A"),
        ("Elm", "B"), ("Fir", "B"), ("Gum", "B"), ("Hazel", "B"),
        ("Ivy", "C"), ("Juniper", "C"), ("Kauri", "C"), ("Larch", "C"),
    ];
    teams("U12", &names)
}

fn sheet(name: &str) -> SheetName {
    name.parse().unwrap()
}

fn delivered(csv: &str, cfg: &TournamentConfig) -> MemoryWorkbook {
    let doc = generate(&roster(csv), cfg).unwrap();
    let mut wb = MemoryWorkbook::new();
    deliver(&doc, &mut wb).unwrap();
    wb
}

fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

fn formula(s: &str) -> CellValue {
    CellValue::Formula(s.to_string())
}

#[test]
fn four_team_division_end_to_end() {
    let wb = delivered(&four_team_csv(), &TournamentConfig::default());
    let s = wb.sheet(&sheet("U8")).unwrap();

    assert_eq!(s.value(CellRef::new(0, 0)), Some(&text("Pool A")));
    let standings: Vec<&CellValue> = (2..6).filter_map(|r| s.value(CellRef::new(r, 0))).collect();
    assert_eq!(standings, vec![&text("Ants"), &text("Bees"), &text("Cats"), &text("Dogs")]);

    // three rounds, two games each, stride 4
    for (r, label_row) in [6u32, 10, 14].into_iter().enumerate() {
        assert_eq!(s.value(CellRef::new(label_row, 0)), Some(&text(&format!("Round {}", r + 1))));
        for g in 1..=2 {
            let row = label_row + g;
            assert!(s.value(CellRef::new(row, 0)).and_then(CellValue::as_formula).is_some());
            assert!(s.value(CellRef::new(row, 3)).and_then(CellValue::as_formula).is_some());
        }
    }

    let guard = "COUNTIF($B$3:$B$6,3)=4";
    assert_eq!(s.value(CellRef::new(19, 0)), Some(&text("Consolation")));
    assert_eq!(
        s.value(CellRef::new(20, 0)),
        Some(&formula(&format!("=IF({guard},IFERROR(INDEX($A$3:$A$6,MATCH(3,$I$3:$I$6,0)),\"\"),\"\")")))
    );
    assert_eq!(
        s.value(CellRef::new(20, 3)),
        Some(&formula(&format!("=IF({guard},IFERROR(INDEX($A$3:$A$6,MATCH(4,$I$3:$I$6,0)),\"\"),\"\")")))
    );
    assert_eq!(s.value(CellRef::new(21, 0)), Some(&text("Championship")));
    assert_eq!(
        s.value(CellRef::new(22, 0)),
        Some(&formula(&format!("=IF({guard},IFERROR(INDEX($A$3:$A$6,MATCH(1,$I$3:$I$6,0)),\"\"),\"\")")))
    );
}

#[test]
fn every_team_plays_once_per_round() {
    let doc = generate(&roster(&four_team_csv()), &TournamentConfig::default()).unwrap();
    let req = &doc.divisions[0].requests;
    for label_row in [6u32, 10, 14] {
        let mut seen: Vec<&str> = Vec::new();
        for row in [label_row + 1, label_row + 2] {
            for col in [0, 3] {
                seen.push(req.formula_at(CellRef::new(row, col)).unwrap());
            }
        }
        seen.sort_unstable();
        assert_eq!(seen, vec!["=$A$3", "=$A$4", "=$A$5", "=$A$6"]);
    }
}

#[test]
fn golden_game_and_standings_formulas() {
    let doc = generate(&roster(&four_team_csv()), &TournamentConfig::default()).unwrap();
    let req = &doc.divisions[0].requests;
    assert_eq!(
        req.formula_at(CellRef::new(7, 4)),
        Some("=IFS(F8,\"A\",G8,\"H\",OR(B8=\"\",C8=\"\"),\"\",B8>C8,\"H\",B8<C8,\"A\",TRUE,\"D\")")
    );
    assert_eq!(
        req.formula_at(CellRef::new(7, 7)),
        Some("=IF(E8=\"\",\"\",SWITCH(E8,\"H\",6,\"D\",3,0)+MIN(N(B8),3)+IF(AND(N(C8)=0,NOT(OR(F8,G8))),1,0))")
    );
    assert_eq!(
        req.formula_at(CellRef::new(2, 1)),
        Some("=COUNTIFS($A$8:$A$17,$A3,$E$8:$E$17,\"?*\")+COUNTIFS($D$8:$D$17,$A3,$E$8:$E$17,\"?*\")")
    );
}

#[test]
fn twelve_team_third_place_reads_both_helper_tables() {
    let wb = delivered(&twelve_team_csv(), &TournamentConfig::default());
    let s = wb.sheet(&sheet("U12")).unwrap();

    for first in [2u32, 20, 38] {
        assert!((first..first + 4).all(|r| matches!(s.value(CellRef::new(r, 0)), Some(CellValue::Text(_)))));
    }
    for row in (43..46).chain(47..50) {
        assert!(s.value(CellRef::new(row, 10)).and_then(CellValue::as_formula).is_some(), "helper row {row}");
    }

    let guard = "COUNTIF($B$3:$B$6,3)+COUNTIF($B$21:$B$24,3)+COUNTIF($B$39:$B$42,3)=12";
    assert_eq!(s.value(CellRef::new(55, 0)), Some(&text("Third Place")));
    assert_eq!(
        s.value(CellRef::new(56, 0)),
        Some(&formula(&format!("=IF({guard},IFERROR(INDEX($K$44:$K$46,MATCH(3,$J$44:$J$46,0)),\"\"),\"\")")))
    );
    assert_eq!(
        s.value(CellRef::new(56, 3)),
        Some(&formula(&format!("=IF({guard},IFERROR(INDEX($K$48:$K$50,MATCH(1,$J$48:$J$50,0)),\"\"),\"\")")))
    );
}

#[test]
fn shootout_sheet_mirrors_division_cells() {
    let wb = delivered(&four_team_csv(), &TournamentConfig::default());
    let names: Vec<&str> = wb.sheet_names().map(|n| n.as_str()).collect();
    assert_eq!(names, vec!["U8", "Shootout"]);

    let s = wb.sheet(&sheet("Shootout")).unwrap();
    assert_eq!(s.value(CellRef::new(0, 0)), Some(&text("U8")));
    assert_eq!(s.value(CellRef::new(1, 1)), Some(&text("R1 Home")));
    assert_eq!(s.value(CellRef::new(2, 0)), Some(&text("Pool A G1")));
    assert_eq!(s.value(CellRef::new(2, 1)), Some(&formula("=IF('U8'!$A$8=\"\",\"\",'U8'!$A$8)")));
    // display rows mirror the standings team cells
    assert_eq!(s.value(CellRef::new(5, 0)), Some(&text("Team")));
    assert_eq!(s.value(CellRef::new(6, 0)), Some(&formula("=IF('U8'!$A$3=\"\",\"\",'U8'!$A$3)")));
    assert!(s.value(CellRef::new(9, 0)).is_some());
    assert_eq!(s.value(CellRef::new(11, 0)), Some(&text("Overall Leaders")));
}

#[test]
fn shootout_round_total_waits_only_for_the_teams_own_game() {
    // Ants v Bees fully entered while Cats v Dogs is still blank must still
    // give Ants a total, so every blank count is keyed on the team's name.
    let wb = delivered(&four_team_csv(), &TournamentConfig::default());
    let s = wb.sheet(&sheet("Shootout")).unwrap();
    for row in 6..10u32 {
        let own = format!(",$A{},", row + 1);
        for r in 0..3u32 {
            let f = s.value(CellRef::new(row, 1 + r)).and_then(CellValue::as_formula).unwrap();
            assert!(!f.contains("COUNTBLANK"), "{f}");
            assert_eq!(f.matches("COUNTIFS(").count(), 6, "{f}");
            assert_eq!(f.matches(own.as_str()).count(), 6, "{f}");
        }
    }
    let first = s.value(CellRef::new(6, 1)).and_then(CellValue::as_formula).unwrap();
    assert!(first.starts_with("=IF(COUNTIFS($B$3:$B$4,$A7,$E$3:$E$4,\"\")"), "{first}");
}

#[test]
fn shootout_can_be_disabled() {
    let cfg = parse_config_str(r#"{"shootout": {"enabled": false}}"#).unwrap();
    let doc = generate(&roster(&four_team_csv()), &cfg).unwrap();
    assert!(doc.shootout.is_none());
    assert_eq!(doc.sheet_names().len(), 1);
}

#[test]
fn fallback_count_generates_with_a_warning() {
    let names: Vec<(String, &str)> = (0..7).map(|i| (format!("Side {i}"), ["A", "B", "C"][i % 3])).collect();
    let refs: Vec<(&str, &str)> = names.iter().map(|(n, p)| (n.as_str(), *p)).collect();
    let doc = generate(&roster(&teams("U9", &refs)), &TournamentConfig::default()).unwrap();
    assert!(doc.validation.pass);
    assert!(doc.validation.warnings().any(|w| w.code == "topology.fallback"));
    assert_eq!(doc.divisions[0].layout.standings_row_ranges.len(), 3);
}

#[test]
fn duplicate_team_aborts_generation() {
    let csv = teams("U8", &[("Ants", "A"), ("Ants", "A"), ("Cats", "A"), ("Dogs", "A")]);
    match generate(&roster(&csv), &TournamentConfig::default()) {
        Err(PipelineError::Validate(rep)) => {
            assert!(!rep.pass);
            assert!(rep.errors().any(|i| i.code == "team.duplicate"));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn widths_are_measured_and_recorded() {
    let cfg = TournamentConfig::default();
    let doc = generate(&roster(&four_team_csv()), &cfg).unwrap();
    let mut wb = MemoryWorkbook::new();
    deliver(&doc, &mut wb).unwrap();
    let fitted = retrofit_widths(&doc, &mut wb, &cfg).unwrap();
    let u8: ts_core::DivisionName = "U8".parse().unwrap();
    // "Championship" is the longest text in column A
    assert_eq!(fitted.team_column_width(&u8), 12 * 7 + 16);
    assert_eq!(cfg.team_column_width(&u8), 160);
    let id = wb.ensure_sheet(&sheet("U8")).unwrap();
    assert_eq!(wb.auto_fit_column(id, 0).unwrap(), 100);
}
