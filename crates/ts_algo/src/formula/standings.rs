//! Standings aggregates over a pool's game log.
//!
//! Every aggregate looks the team up in both team columns of the pool's
//! score span: once as home, once as away. "Played" means the winner cell
//! holds a token.

use crate::formula::refs::{col_range, row_cell, FormulaError, PoolRefs, Side};
use crate::schema::{Column, SchemaSet};

/// Criterion matching any non-empty winner token.
const PLAYED: &str = "\"?*\"";

struct Log {
    home: String,
    away: String,
    winner: String,
}

fn log(pool: &PoolRefs, schemas: &SchemaSet) -> Result<Log, FormulaError> {
    let span = pool.score.span()?;
    Ok(Log {
        home: col_range(&schemas.score, Column::HomeTeam, span)?,
        away: col_range(&schemas.score, Column::AwayTeam, span)?,
        winner: col_range(&schemas.score, Column::Winner, span)?,
    })
}

fn team(row: u32, schemas: &SchemaSet) -> Result<String, FormulaError> {
    row_cell(&schemas.standings, Column::Team, row)
}

/// `COUNTIFS` as home with `home_crit` plus as away with `away_crit`.
fn count_both(row: u32, pool: &PoolRefs, schemas: &SchemaSet, home_crit: &str, away_crit: &str) -> Result<String, FormulaError> {
    let l = log(pool, schemas)?;
    let t = team(row, schemas)?;
    Ok(format!(
        "=COUNTIFS({},{t},{},{home_crit})+COUNTIFS({},{t},{},{away_crit})",
        l.home, l.winner, l.away, l.winner
    ))
}

pub fn games_played(row: u32, pool: &PoolRefs, schemas: &SchemaSet) -> Result<String, FormulaError> {
    count_both(row, pool, schemas, PLAYED, PLAYED)
}

pub fn wins(row: u32, pool: &PoolRefs, schemas: &SchemaSet) -> Result<String, FormulaError> {
    count_both(row, pool, schemas, "\"H\"", "\"A\"")
}

pub fn losses(row: u32, pool: &PoolRefs, schemas: &SchemaSet) -> Result<String, FormulaError> {
    count_both(row, pool, schemas, "\"A\"", "\"H\"")
}

pub fn draws(row: u32, pool: &PoolRefs, schemas: &SchemaSet) -> Result<String, FormulaError> {
    count_both(row, pool, schemas, "\"D\"", "\"D\"")
}

/// `SUMIFS(home_value, home_team, team) + SUMIFS(away_value, away_team, team)`
fn sum_both(row: u32, pool: &PoolRefs, schemas: &SchemaSet, home_value: Column, away_value: Column) -> Result<String, FormulaError> {
    let span = pool.score.span()?;
    let l = log(pool, schemas)?;
    let hv = col_range(&schemas.score, home_value, span)?;
    let av = col_range(&schemas.score, away_value, span)?;
    let t = team(row, schemas)?;
    Ok(format!("=SUMIFS({hv},{},{t})+SUMIFS({av},{},{t})", l.home, l.away))
}

pub fn points(row: u32, pool: &PoolRefs, schemas: &SchemaSet) -> Result<String, FormulaError> {
    sum_both(row, pool, schemas, Side::Home.points_column(), Side::Away.points_column())
}

pub fn goals_for(row: u32, pool: &PoolRefs, schemas: &SchemaSet) -> Result<String, FormulaError> {
    sum_both(row, pool, schemas, Column::HomeGoals, Column::AwayGoals)
}

pub fn goals_against(row: u32, pool: &PoolRefs, schemas: &SchemaSet) -> Result<String, FormulaError> {
    sum_both(row, pool, schemas, Column::AwayGoals, Column::HomeGoals)
}

pub fn goal_diff(row: u32, schemas: &SchemaSet) -> Result<String, FormulaError> {
    let gf = row_cell(&schemas.standings, Column::GoalsFor, row)?;
    let ga = row_cell(&schemas.standings, Column::GoalsAgainst, row)?;
    Ok(format!("={gf}-{ga}"))
}

/// Formula for a derived standings column, or `None` when the column is
/// entered by hand or filled by a later step (rank, cascade helpers).
pub fn aggregate(column: Column, row: u32, pool: &PoolRefs, schemas: &SchemaSet) -> Option<Result<String, FormulaError>> {
    match column {
        Column::GamesPlayed => Some(games_played(row, pool, schemas)),
        Column::Wins => Some(wins(row, pool, schemas)),
        Column::Losses => Some(losses(row, pool, schemas)),
        Column::Draws => Some(draws(row, pool, schemas)),
        Column::Points => Some(points(row, pool, schemas)),
        Column::GoalsFor => Some(goals_for(row, pool, schemas)),
        Column::GoalsAgainst => Some(goals_against(row, pool, schemas)),
        Column::GoalDiff => Some(goal_diff(row, schemas)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::refs::ScoreBlock;
    use crate::topology::resolve;
    use ts_core::{LayoutParams, RowRange};

    fn four_team() -> (PoolRefs, SchemaSet) {
        let pool = PoolRefs {
            standings: RowRange::new(2, 5).unwrap(),
            score: ScoreBlock::new(6, 3, 2, LayoutParams::default()),
        };
        (pool, SchemaSet::for_topology(&resolve(4), true).unwrap())
    }

    #[test]
    fn games_played_golden() {
        let (p, s) = four_team();
        assert_eq!(
            games_played(2, &p, &s).unwrap(),
            "=COUNTIFS($A$8:$A$17,$A3,$E$8:$E$17,\"?*\")+COUNTIFS($D$8:$D$17,$A3,$E$8:$E$17,\"?*\")"
        );
    }

    #[test]
    fn wins_and_losses_mirror() {
        let (p, s) = four_team();
        assert_eq!(
            wins(3, &p, &s).unwrap(),
            "=COUNTIFS($A$8:$A$17,$A4,$E$8:$E$17,\"H\")+COUNTIFS($D$8:$D$17,$A4,$E$8:$E$17,\"A\")"
        );
        assert_eq!(
            losses(3, &p, &s).unwrap(),
            "=COUNTIFS($A$8:$A$17,$A4,$E$8:$E$17,\"A\")+COUNTIFS($D$8:$D$17,$A4,$E$8:$E$17,\"H\")"
        );
    }

    #[test]
    fn sums_golden() {
        let (p, s) = four_team();
        assert_eq!(points(2, &p, &s).unwrap(), "=SUMIFS($H$8:$H$17,$A$8:$A$17,$A3)+SUMIFS($I$8:$I$17,$D$8:$D$17,$A3)");
        assert_eq!(goals_against(2, &p, &s).unwrap(), "=SUMIFS($C$8:$C$17,$A$8:$A$17,$A3)+SUMIFS($B$8:$B$17,$D$8:$D$17,$A3)");
        assert_eq!(goal_diff(5, &s).unwrap(), "=$L6-$M6");
    }

    #[test]
    fn manual_and_deferred_columns_skip() {
        let (p, s) = four_team();
        assert!(aggregate(Column::YellowCards, 2, &p, &s).is_none());
        assert!(aggregate(Column::Rank, 2, &p, &s).is_none());
        assert!(aggregate(Column::Draws, 2, &p, &s).is_some());
    }
}
