//! Per-game formulas on a score-entry row: winner token and game points.
//!
//! Winner tokens: "H" home, "A" away, "D" draw, "" not played. A checked
//! forfeit box hands the game to the other side regardless of goals.

use ts_core::CellRef;

use crate::formula::refs::{rel_cell, FormulaError, Side};
use crate::schema::{Column, ColumnSchema};

pub const WIN_POINTS: u32 = 6;
pub const DRAW_POINTS: u32 = 3;
/// One bonus point per goal, up to this many.
pub const GOAL_BONUS_CAP: u32 = 3;
/// Awarded for holding the opponent scoreless, unless a forfeit occurred.
pub const SHUTOUT_POINTS: u32 = 1;

/// `=IFS(F8,"A",G8,"H",OR(B8="",C8=""),"",B8>C8,"H",B8<C8,"A",TRUE,"D")`
pub fn winner(row: u32, score: &ColumnSchema) -> Result<String, FormulaError> {
    let hg = rel_cell(score, Column::HomeGoals, row)?;
    let ag = rel_cell(score, Column::AwayGoals, row)?;
    let hf = rel_cell(score, Column::HomeForfeit, row)?;
    let af = rel_cell(score, Column::AwayForfeit, row)?;
    Ok(format!(
        "=IFS({hf},\"A\",{af},\"H\",OR({hg}=\"\",{ag}=\"\"),\"\",{hg}>{ag},\"H\",{hg}<{ag},\"A\",TRUE,\"D\")"
    ))
}

/// Points one side earns from one game; blank until a winner exists.
pub fn game_points(row: u32, side: Side, score: &ColumnSchema) -> Result<String, FormulaError> {
    let w = rel_cell(score, Column::Winner, row)?;
    let own = rel_cell(score, side.goals_column(), row)?;
    let opp = rel_cell(score, side.other().goals_column(), row)?;
    let hf = rel_cell(score, Column::HomeForfeit, row)?;
    let af = rel_cell(score, Column::AwayForfeit, row)?;
    let tok = side.token();
    Ok(format!(
        "=IF({w}=\"\",\"\",SWITCH({w},\"{tok}\",{WIN_POINTS},\"D\",{DRAW_POINTS},0)+MIN(N({own}),{GOAL_BONUS_CAP})+IF(AND(N({opp})=0,NOT(OR({hf},{af}))),{SHUTOUT_POINTS},0))"
    ))
}

/// Reference to a team's standings cell, written into a score-entry team cell.
pub fn team_ref(cell: CellRef) -> String {
    format!("={}", cell.abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SCORE_BASE;

    fn schema() -> ColumnSchema {
        ColumnSchema::from_blocks(&[&SCORE_BASE]).unwrap()
    }

    #[test]
    fn winner_golden() {
        assert_eq!(
            winner(7, &schema()).unwrap(),
            "=IFS(F8,\"A\",G8,\"H\",OR(B8=\"\",C8=\"\"),\"\",B8>C8,\"H\",B8<C8,\"A\",TRUE,\"D\")"
        );
    }

    #[test]
    fn game_points_golden_both_sides() {
        assert_eq!(
            game_points(7, Side::Home, &schema()).unwrap(),
            "=IF(E8=\"\",\"\",SWITCH(E8,\"H\",6,\"D\",3,0)+MIN(N(B8),3)+IF(AND(N(C8)=0,NOT(OR(F8,G8))),1,0))"
        );
        assert_eq!(
            game_points(20, Side::Away, &schema()).unwrap(),
            "=IF(E21=\"\",\"\",SWITCH(E21,\"A\",6,\"D\",3,0)+MIN(N(C21),3)+IF(AND(N(B21)=0,NOT(OR(F21,G21))),1,0))"
        );
    }

    #[test]
    fn team_ref_is_absolute() {
        assert_eq!(team_ref(CellRef::new(2, 0)), "=$A$3");
    }

    #[test]
    fn missing_forfeit_columns_error() {
        let s = ColumnSchema::from_blocks(&[&[Column::HomeGoals, Column::AwayGoals]]).unwrap();
        assert!(winner(0, &s).is_err());
    }
}
