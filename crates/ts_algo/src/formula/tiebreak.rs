//! Ranking and the seven-level tiebreak cascade.
//!
//! Cascade keys, in order:
//! 1. points (desc)
//! 2. head-to-head among teams level on points (desc)
//! 3. wins (desc)
//! 4. cards (asc)
//! 5. goals against, per game capped at 5 (asc)
//! 6. goal difference, scored capped at 3 minus capped goals against;
//!    zero for everyone once the pool has a forfeit (desc)
//! 7. kicks from the mark, a manual checkbox (desc)
//!
//! Each key is its own helper column; one `SORT` over the pool rows yields
//! the ordered team list and the calculated rank is a `MATCH` into it. The
//! displayed rank stays points-based with a manual tiebreaker checkbox as the
//! last word on ties.

use ts_core::RowRange;

use crate::formula::refs::{col_range, row_cell, FormulaError, PoolRefs};
use crate::schema::{Column, ColumnSchema, SchemaSet};

pub const GOALS_SCORED_CAP: u32 = 3;
pub const GOALS_CONCEDED_CAP: u32 = 5;

/// Sort keys of the cascade; `true` sorts ascending.
pub const CASCADE: [(Column, bool); 7] = [
    (Column::Points, false),
    (Column::HeadToHead, false),
    (Column::Wins, false),
    (Column::CardCount, true),
    (Column::CappedGoalsAgainst, true),
    (Column::CappedGoalDiff, false),
    (Column::KicksFromMark, false),
];

/* -------------------------------------------------------------------------- */
/*                            Rank with tiebreaker                            */
/* -------------------------------------------------------------------------- */

/// Rank expression (no leading '='):
/// unique points → `RANK`; tied and checkbox unchecked → `RANK + 1`;
/// tied and checked → `RANK`.
pub fn rank_with_tiebreaker_expr(points_cell: &str, points_range: &str, tiebreak_cell: &str) -> String {
    let rank = format!("RANK({points_cell},{points_range})");
    format!(
        "IF(COUNTIF({points_range},{points_cell})=1,{rank},IF({tiebreak_cell}=FALSE,{rank}+1,{rank}))"
    )
}

/// Rank column of a standings row.
pub fn pool_rank(row: u32, standings: RowRange, schema: &ColumnSchema) -> Result<String, FormulaError> {
    let pts = row_cell(schema, Column::Points, row)?;
    let range = col_range(schema, Column::Points, standings)?;
    let tb = row_cell(schema, Column::Tiebreaker, row)?;
    Ok(format!("={}", rank_with_tiebreaker_expr(&pts, &range, &tb)))
}

/// Overall rank across pools for topologies decided on points alone.
pub fn cross_pool_rank(row: u32, pools: &[RowRange], schema: &ColumnSchema) -> Result<String, FormulaError> {
    let pts = row_cell(schema, Column::Points, row)?;
    let tb = row_cell(schema, Column::Tiebreaker, row)?;
    let mut above = Vec::with_capacity(pools.len());
    let mut level = Vec::with_capacity(pools.len());
    for p in pools {
        let range = col_range(schema, Column::Points, *p)?;
        above.push(format!("COUNTIF({range},\">\"&{pts})"));
        level.push(format!("COUNTIF({range},{pts})"));
    }
    let base = format!("{}+1", above.join("+"));
    let ties = level.join("+");
    Ok(format!("=IF({ties}=1,{base},IF({tb}=FALSE,{base}+1,{base}))"))
}

/* -------------------------------------------------------------------------- */
/*                                Head to head                                */
/* -------------------------------------------------------------------------- */

/// "W"/"L"/"D" for the team on `row` against the team on `opponent_row`,
/// blank while unplayed (no leading '=').
pub fn head_to_head_expr(row: u32, opponent_row: u32, pool: &PoolRefs, schemas: &SchemaSet) -> Result<String, FormulaError> {
    let span = pool.score.span()?;
    let ht = col_range(&schemas.score, Column::HomeTeam, span)?;
    let at = col_range(&schemas.score, Column::AwayTeam, span)?;
    let w = col_range(&schemas.score, Column::Winner, span)?;
    let me = row_cell(&schemas.standings, Column::Team, row)?;
    let opp = row_cell(&schemas.standings, Column::Team, opponent_row)?;
    // result as home side token + result as away side token
    let outcome = |as_home: &str, as_away: &str| {
        format!(
            "COUNTIFS({ht},{me},{at},{opp},{w},\"{as_home}\")+COUNTIFS({ht},{opp},{at},{me},{w},\"{as_away}\")>0"
        )
    };
    Ok(format!(
        "IFS({},\"W\",{},\"L\",{},\"D\",TRUE,\"\")",
        outcome("H", "A"),
        outcome("A", "H"),
        outcome("D", "D")
    ))
}

/// Head-to-head points against the opponents level on points with this
/// team: 3 per win, 1 per draw.
pub fn head_to_head_points(row: u32, opponents: &[u32], pool: &PoolRefs, schemas: &SchemaSet) -> Result<String, FormulaError> {
    let pts = row_cell(&schemas.standings, Column::Points, row)?;
    let mut terms = Vec::with_capacity(opponents.len());
    for &o in opponents.iter().filter(|o| **o != row) {
        let opp_pts = row_cell(&schemas.standings, Column::Points, o)?;
        let h2h = head_to_head_expr(row, o, pool, schemas)?;
        terms.push(format!("IF({opp_pts}={pts},SWITCH({h2h},\"W\",3,\"D\",1,0),0)"));
    }
    if terms.is_empty() {
        return Ok("=0".to_string());
    }
    Ok(format!("={}", terms.join("+")))
}

/* -------------------------------------------------------------------------- */
/*                              Cascade helpers                               */
/* -------------------------------------------------------------------------- */

pub fn card_count(row: u32, schema: &ColumnSchema) -> Result<String, FormulaError> {
    let y = row_cell(schema, Column::YellowCards, row)?;
    let r = row_cell(schema, Column::RedCards, row)?;
    Ok(format!("={y}+{r}"))
}

/// Per-game capped goal sum for the team while on one side (array context).
fn capped_sum(team_range: &str, team: &str, winner_range: &str, goals_range: &str, cap: u32) -> String {
    format!(
        "SUM(IF(({team_range}={team})*({winner_range}<>\"\"),IF(ISNUMBER({goals_range}),IF({goals_range}>{cap},{cap},{goals_range}),0),0))"
    )
}

struct CappedLog {
    home: String,
    away: String,
    winner: String,
    home_goals: String,
    away_goals: String,
    team: String,
}

fn capped_log(row: u32, pool: &PoolRefs, schemas: &SchemaSet) -> Result<CappedLog, FormulaError> {
    let span = pool.score.span()?;
    Ok(CappedLog {
        home: col_range(&schemas.score, Column::HomeTeam, span)?,
        away: col_range(&schemas.score, Column::AwayTeam, span)?,
        winner: col_range(&schemas.score, Column::Winner, span)?,
        home_goals: col_range(&schemas.score, Column::HomeGoals, span)?,
        away_goals: col_range(&schemas.score, Column::AwayGoals, span)?,
        team: row_cell(&schemas.standings, Column::Team, row)?,
    })
}

/// Goals conceded, each game capped at `GOALS_CONCEDED_CAP`.
pub fn capped_goals_against(row: u32, pool: &PoolRefs, schemas: &SchemaSet) -> Result<String, FormulaError> {
    let l = capped_log(row, pool, schemas)?;
    Ok(format!(
        "=ArrayFormula({}+{})",
        capped_sum(&l.home, &l.team, &l.winner, &l.away_goals, GOALS_CONCEDED_CAP),
        capped_sum(&l.away, &l.team, &l.winner, &l.home_goals, GOALS_CONCEDED_CAP)
    ))
}

/// Capped goals scored minus capped goals against; 0 once any game in the
/// pool was forfeited.
pub fn capped_goal_diff(row: u32, pool: &PoolRefs, schemas: &SchemaSet) -> Result<String, FormulaError> {
    let l = capped_log(row, pool, schemas)?;
    let span = pool.score.span()?;
    let hf = schemas.score.require(Column::HomeForfeit)?;
    let af = schemas.score.require(Column::AwayForfeit)?;
    let forfeits = span.columns(hf, af).abs();
    let cga = row_cell(&schemas.standings, Column::CappedGoalsAgainst, row)?;
    Ok(format!(
        "=IF(COUNTIF({forfeits},TRUE)>0,0,ArrayFormula({}+{})-{cga})",
        capped_sum(&l.home, &l.team, &l.winner, &l.home_goals, GOALS_SCORED_CAP),
        capped_sum(&l.away, &l.team, &l.winner, &l.away_goals, GOALS_SCORED_CAP)
    ))
}

/// One `SORT` over the pool rows by the cascade keys; spills down the
/// sorted-standings column from the first standings row.
pub fn sorted_standings(standings: RowRange, schema: &ColumnSchema) -> Result<String, FormulaError> {
    let mut args = vec![col_range(schema, Column::Team, standings)?];
    for (col, asc) in CASCADE {
        args.push(col_range(schema, col, standings)?);
        args.push(if asc { "TRUE" } else { "FALSE" }.to_string());
    }
    Ok(format!("=SORT({})", args.join(",")))
}

/// Position of this team in the sorted list.
pub fn calculated_rank(row: u32, standings: RowRange, schema: &ColumnSchema) -> Result<String, FormulaError> {
    let team = row_cell(schema, Column::Team, row)?;
    let sorted = col_range(schema, Column::SortedStandings, standings)?;
    Ok(format!("=IFERROR(MATCH({team},{sorted},0),\"\")"))
}

/// Formula for a cascade helper column, `None` for manual columns and for
/// the sorted list (written once per pool, see `sorted_standings`).
pub fn helper(column: Column, row: u32, occupied: &[u32], pool: &PoolRefs, schemas: &SchemaSet) -> Option<Result<String, FormulaError>> {
    match column {
        Column::HeadToHead => Some(head_to_head_points(row, occupied, pool, schemas)),
        Column::CardCount => Some(card_count(row, &schemas.standings)),
        Column::CappedGoalsAgainst => Some(capped_goals_against(row, pool, schemas)),
        Column::CappedGoalDiff => Some(capped_goal_diff(row, pool, schemas)),
        Column::CalculatedRank => Some(calculated_rank(row, pool.standings, &schemas.standings)),
        _ => None,
    }
}

/* ---------------------------------- Tests --------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::refs::ScoreBlock;
    use crate::topology::resolve;
    use ts_core::LayoutParams;

    fn four_team() -> (PoolRefs, SchemaSet) {
        let pool = PoolRefs {
            standings: RowRange::new(2, 5).unwrap(),
            score: ScoreBlock::new(6, 3, 2, LayoutParams::default()),
        };
        (pool, SchemaSet::for_topology(&resolve(4), true).unwrap())
    }

    #[test]
    fn rank_with_tiebreaker_golden() {
        let (p, s) = four_team();
        assert_eq!(
            pool_rank(2, p.standings, &s.standings).unwrap(),
            "=IF(COUNTIF($H$3:$H$6,$H3)=1,RANK($H3,$H$3:$H$6),IF($K3=FALSE,RANK($H3,$H$3:$H$6)+1,RANK($H3,$H$3:$H$6)))"
        );
    }

    #[test]
    fn capped_goals_against_golden() {
        let (p, s) = four_team();
        assert_eq!(
            capped_goals_against(2, &p, &s).unwrap(),
            "=ArrayFormula(SUM(IF(($A$8:$A$17=$A3)*($E$8:$E$17<>\"\"),IF(ISNUMBER($C$8:$C$17),IF($C$8:$C$17>5,5,$C$8:$C$17),0),0))\
+SUM(IF(($D$8:$D$17=$A3)*($E$8:$E$17<>\"\"),IF(ISNUMBER($B$8:$B$17),IF($B$8:$B$17>5,5,$B$8:$B$17),0),0)))"
        );
    }

    #[test]
    fn capped_goal_diff_zeroes_on_forfeit() {
        let (p, s) = four_team();
        let f = capped_goal_diff(2, &p, &s).unwrap();
        assert!(f.starts_with("=IF(COUNTIF($F$8:$G$17,TRUE)>0,0,ArrayFormula("));
        assert!(f.ends_with("-$Q3)"));
        assert!(f.contains("IF($B$8:$B$17>3,3,$B$8:$B$17)"));
    }

    #[test]
    fn head_to_head_golden() {
        let (p, s) = four_team();
        assert_eq!(
            head_to_head_expr(2, 3, &p, &s).unwrap(),
            "IFS(COUNTIFS($A$8:$A$17,$A3,$D$8:$D$17,$A4,$E$8:$E$17,\"H\")+COUNTIFS($A$8:$A$17,$A4,$D$8:$D$17,$A3,$E$8:$E$17,\"A\")>0,\"W\",\
COUNTIFS($A$8:$A$17,$A3,$D$8:$D$17,$A4,$E$8:$E$17,\"A\")+COUNTIFS($A$8:$A$17,$A4,$D$8:$D$17,$A3,$E$8:$E$17,\"H\")>0,\"L\",\
COUNTIFS($A$8:$A$17,$A3,$D$8:$D$17,$A4,$E$8:$E$17,\"D\")+COUNTIFS($A$8:$A$17,$A4,$D$8:$D$17,$A3,$E$8:$E$17,\"D\")>0,\"D\",TRUE,\"\")"
        );
    }

    #[test]
    fn head_to_head_points_skip_self() {
        let (p, s) = four_team();
        let f = head_to_head_points(2, &[2, 3, 4, 5], &p, &s).unwrap();
        assert_eq!(f.matches("SWITCH(").count(), 3);
        assert!(f.starts_with("=IF($H4=$H3,SWITCH(IFS("));
        assert_eq!(head_to_head_points(2, &[2], &p, &s).unwrap(), "=0");
    }

    #[test]
    fn sorted_standings_golden() {
        let (p, s) = four_team();
        assert_eq!(
            sorted_standings(p.standings, &s.standings).unwrap(),
            "=SORT($A$3:$A$6,$H$3:$H$6,FALSE,$O$3:$O$6,FALSE,$C$3:$C$6,FALSE,$P$3:$P$6,TRUE,$Q$3:$Q$6,TRUE,$R$3:$R$6,FALSE,$S$3:$S$6,FALSE)"
        );
        assert_eq!(calculated_rank(4, p.standings, &s.standings).unwrap(), "=IFERROR(MATCH($A5,$T$3:$T$6,0),\"\")");
    }

    #[test]
    fn cross_pool_rank_golden() {
        let s = SchemaSet::for_topology(&resolve(10), true).unwrap();
        let a = RowRange::new(2, 6).unwrap();
        let b = RowRange::new(31, 35).unwrap();
        assert_eq!(
            cross_pool_rank(2, &[a, b], &s.standings).unwrap(),
            "=IF(COUNTIF($H$3:$H$7,$H3)+COUNTIF($H$32:$H$36,$H3)=1,COUNTIF($H$3:$H$7,\">\"&$H3)+COUNTIF($H$32:$H$36,\">\"&$H3)+1,\
IF($J3=FALSE,COUNTIF($H$3:$H$7,\">\"&$H3)+COUNTIF($H$32:$H$36,\">\"&$H3)+1+1,COUNTIF($H$3:$H$7,\">\"&$H3)+COUNTIF($H$32:$H$36,\">\"&$H3)+1))"
        );
    }

    #[test]
    fn cascade_needs_helper_columns() {
        let s = SchemaSet::for_topology(&resolve(10), true).unwrap();
        assert!(sorted_standings(RowRange::new(2, 6).unwrap(), &s.standings).is_err());
    }
}
