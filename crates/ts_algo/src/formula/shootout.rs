//! Shootout sheet formulas.
//!
//! A round block is four adjacent columns over the division's game rows:
//! home team, home kicks, away kicks, away team. Every cell mirrors the
//! division sheet. A team's round total stays blank until its own game in
//! that round has both team cells and both kick cells entered.

use ts_core::{qualify, CellRef, GridRange, RowRange, SheetName};

/// Columns of one shootout round on the shootout sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundBlock {
    pub games: RowRange,
    pub first_col: u32,
}

impl RoundBlock {
    pub const WIDTH: u32 = 4;

    #[inline] pub fn home_team(&self) -> GridRange { self.games.column(self.first_col) }
    #[inline] pub fn home_kicks(&self) -> GridRange { self.games.column(self.first_col + 1) }
    #[inline] pub fn away_kicks(&self) -> GridRange { self.games.column(self.first_col + 2) }
    #[inline] pub fn away_team(&self) -> GridRange { self.games.column(self.first_col + 3) }

    /// Both kick columns.
    #[inline]
    pub fn kicks(&self) -> GridRange {
        self.games.columns(self.first_col + 1, self.first_col + 2)
    }
}

/// Mirror a division-sheet cell, blank while the source is blank.
pub fn mirror(sheet: &SheetName, cell: CellRef) -> String {
    let src = qualify(sheet, &cell.abs());
    format!("=IF({src}=\"\",\"\",{src})")
}

/// Kicks this team scored in one round.
///
/// Blank while the team's own game row has an empty cell; other games of
/// the round do not hold it back. With byes a team can sit a round out;
/// it must appear in the round's team columns before the round counts for it.
pub fn round_total(team: CellRef, block: &RoundBlock, byes: bool) -> String {
    let t = team.col_abs();
    let sum = format!(
        "SUMIFS({},{},{t})+SUMIFS({},{},{t})",
        block.home_kicks().abs(),
        block.home_team().abs(),
        block.away_kicks().abs(),
        block.away_team().abs()
    );
    let complete = format!("IF({}>0,\"\",{sum})", own_game_blanks(t.as_str(), block));
    if byes {
        format!(
            "=IF(COUNTIF({},{t})+COUNTIF({},{t})=0,\"\",{complete})",
            block.home_team().abs(),
            block.away_team().abs()
        )
    } else {
        format!("={complete}")
    }
}

/// Empty cells on the rows where `team` plays: the opponent and both kicks.
fn own_game_blanks(team: &str, block: &RoundBlock) -> String {
    let mut parts = Vec::with_capacity(6);
    for (side, opponent) in [(block.home_team(), block.away_team()), (block.away_team(), block.home_team())] {
        for other in [opponent, block.home_kicks(), block.away_kicks()] {
            parts.push(format!("COUNTIFS({},{team},{},\"\")", side.abs(), other.abs()));
        }
    }
    parts.join("+")
}

/// Kicks conceded over every round.
pub fn kicks_against(team: CellRef, blocks: &[RoundBlock]) -> String {
    let t = team.col_abs();
    let terms: Vec<String> = blocks
        .iter()
        .map(|b| {
            format!(
                "SUMIFS({},{},{t})+SUMIFS({},{},{t})",
                b.away_kicks().abs(),
                b.home_team().abs(),
                b.home_kicks().abs(),
                b.away_team().abs()
            )
        })
        .collect();
    if terms.is_empty() {
        return "=0".to_string();
    }
    format!("={}", terms.join("+"))
}

/// `=SUM($B7:$D7)` over the per-round cells of one team row.
pub fn total(first: CellRef, last: CellRef) -> String {
    format!("=SUM({}:{})", first.col_abs(), last.col_abs())
}

pub fn short_name(team: CellRef, len: u32) -> String {
    format!("=LEFT({},{len})", team.col_abs())
}

/// Total desc, kicks against asc, kicks-from-the-mark desc.
pub fn sorted(names: GridRange, totals: GridRange, against: GridRange, kftm: GridRange) -> String {
    format!(
        "=SORT({},{},FALSE,{},TRUE,{},FALSE)",
        names.abs(),
        totals.abs(),
        against.abs(),
        kftm.abs()
    )
}

pub fn rank(name: CellRef, sorted: GridRange) -> String {
    format!("=IFERROR(MATCH({},{},0),\"\")", name.col_abs(), sorted.abs())
}

/// Count of kick cells still empty across all rounds (no leading '=').
pub fn blanks_remaining(blocks: &[RoundBlock]) -> String {
    let parts: Vec<String> = blocks.iter().map(|b| format!("COUNTBLANK({})", b.kicks().abs())).collect();
    if parts.is_empty() {
        return "0".to_string();
    }
    parts.join("+")
}

/// Conditional-format rule: rank 1 while kicks are still missing.
pub fn leader_rule(rank: CellRef, blocks: &[RoundBlock]) -> String {
    format!("=AND({}=1,{}>0)", rank.col_abs(), blanks_remaining(blocks))
}

/// Conditional-format rule: rank 1 with every kick entered.
pub fn winner_rule(rank: CellRef, blocks: &[RoundBlock]) -> String {
    format!("=AND({}=1,{}=0)", rank.col_abs(), blanks_remaining(blocks))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(r: u32) -> RoundBlock {
        RoundBlock { games: RowRange::new(2, 3).unwrap(), first_col: 1 + r * RoundBlock::WIDTH }
    }

    #[test]
    fn mirror_quotes_sheet() {
        let s: SheetName = "U8".parse().unwrap();
        assert_eq!(mirror(&s, CellRef::new(7, 9)), "=IF('U8'!$J$8=\"\",\"\",'U8'!$J$8)");
    }

    #[test]
    fn round_total_golden() {
        assert_eq!(
            round_total(CellRef::new(6, 0), &block(0), false),
            "=IF(COUNTIFS($B$3:$B$4,$A7,$E$3:$E$4,\"\")+COUNTIFS($B$3:$B$4,$A7,$C$3:$C$4,\"\")\
             +COUNTIFS($B$3:$B$4,$A7,$D$3:$D$4,\"\")+COUNTIFS($E$3:$E$4,$A7,$B$3:$B$4,\"\")\
             +COUNTIFS($E$3:$E$4,$A7,$C$3:$C$4,\"\")+COUNTIFS($E$3:$E$4,$A7,$D$3:$D$4,\"\")>0,\"\",\
             SUMIFS($C$3:$C$4,$B$3:$B$4,$A7)+SUMIFS($D$3:$D$4,$E$3:$E$4,$A7))"
        );
    }

    #[test]
    fn round_total_only_checks_the_teams_own_row() {
        let f = round_total(CellRef::new(6, 0), &block(0), false);
        assert!(!f.contains("COUNTBLANK"));
        // every blank count is keyed on this team's name in a team column
        assert_eq!(f.matches("COUNTIFS(").count(), 6);
        assert_eq!(f.matches("$B$3:$B$4,$A7,").count() + f.matches("$E$3:$E$4,$A7,").count(), 6);
    }

    #[test]
    fn round_total_with_byes_checks_presence() {
        let f = round_total(CellRef::new(6, 0), &block(1), true);
        assert!(f.starts_with("=IF(COUNTIF($F$3:$F$4,$A7)+COUNTIF($I$3:$I$4,$A7)=0,\"\",IF(COUNTIFS($F$3:$F$4,$A7,$I$3:$I$4,\"\")"));
        assert!(f.ends_with(">0,\"\",SUMIFS($G$3:$G$4,$F$3:$F$4,$A7)+SUMIFS($H$3:$H$4,$I$3:$I$4,$A7)))"));
    }

    #[test]
    fn against_sums_every_round() {
        let f = kicks_against(CellRef::new(6, 0), &[block(0), block(1)]);
        assert_eq!(
            f,
            "=SUMIFS($D$3:$D$4,$B$3:$B$4,$A7)+SUMIFS($C$3:$C$4,$E$3:$E$4,$A7)+SUMIFS($H$3:$H$4,$F$3:$F$4,$A7)+SUMIFS($G$3:$G$4,$I$3:$I$4,$A7)"
        );
        assert_eq!(kicks_against(CellRef::new(6, 0), &[]), "=0");
    }

    #[test]
    fn ranking_helpers() {
        let rows = RowRange::new(6, 9).unwrap();
        assert_eq!(
            sorted(rows.column(5), rows.column(4), rows.column(6), rows.column(7)),
            "=SORT($F$7:$F$10,$E$7:$E$10,FALSE,$G$7:$G$10,TRUE,$H$7:$H$10,FALSE)"
        );
        assert_eq!(rank(CellRef::new(6, 5), rows.column(8)), "=IFERROR(MATCH($F7,$I$7:$I$10,0),\"\")");
        assert_eq!(total(CellRef::new(6, 1), CellRef::new(6, 3)), "=SUM($B7:$D7)");
        assert_eq!(short_name(CellRef::new(6, 0), 12), "=LEFT($A7,12)");
    }

    #[test]
    fn highlight_rules() {
        let r = CellRef::new(6, 9);
        assert_eq!(
            leader_rule(r, &[block(0), block(1)]),
            "=AND($J7=1,COUNTBLANK($C$3:$D$4)+COUNTBLANK($G$3:$H$4)>0)"
        );
        assert_eq!(winner_rule(r, &[block(0)]), "=AND($J7=1,COUNTBLANK($C$3:$D$4)=0)");
    }
}
