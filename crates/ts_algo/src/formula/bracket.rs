//! Bracket shapes and advancement formulas.
//!
//! A shape is data: an ordered list of slots, each naming its stage and
//! where its home and away teams come from. One emitter in the pipeline
//! walks the list; nothing here knows about rows until formulas are asked
//! for.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use ts_core::{GridRange, RowRange};

use crate::formula::refs::{index_match, rel_cell, FormulaError};
use crate::schema::{Column, ColumnSchema};
use crate::topology::{Shape, TournamentTopology};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Stage {
    Consolation,
    Semifinal,
    ThirdPlace,
    Final,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Consolation => "Consolation",
            Stage::Semifinal => "Semifinals",
            Stage::ThirdPlace => "Third Place",
            Stage::Final => "Championship",
        }
    }
}

/// Which helper table of the 3-pool topology a slot reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HelperTable {
    PoolWinners,
    RunnersUp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SlotSource {
    /// Rank `rank` of pool number `pool` (layout order).
    PoolRank { pool: u32, rank: u32 },
    /// Rank `rank` of a pool-winners/runners-up table.
    HelperRank { table: HelperTable, rank: u32 },
    WinnerOf { slot: usize },
    LoserOf { slot: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BracketSlot {
    pub stage: Stage,
    pub home: SlotSource,
    pub away: SlotSource,
}

const fn slot(stage: Stage, home: SlotSource, away: SlotSource) -> BracketSlot {
    BracketSlot { stage, home, away }
}

const fn pr(pool: u32, rank: u32) -> SlotSource {
    SlotSource::PoolRank { pool, rank }
}

/// Bracket of a topology; empty when the winner is decided on points.
pub fn bracket_shape(topology: &TournamentTopology) -> Vec<BracketSlot> {
    use SlotSource::*;
    match topology.shape {
        Shape::Four => vec![
            slot(Stage::Consolation, pr(0, 3), pr(0, 4)),
            slot(Stage::Final, pr(0, 1), pr(0, 2)),
        ],
        Shape::Six => vec![
            slot(Stage::Consolation, pr(0, 3), pr(1, 3)),
            slot(Stage::Semifinal, pr(0, 1), pr(1, 2)),
            slot(Stage::Semifinal, pr(1, 1), pr(0, 2)),
            slot(Stage::ThirdPlace, LoserOf { slot: 1 }, LoserOf { slot: 2 }),
            slot(Stage::Final, WinnerOf { slot: 1 }, WinnerOf { slot: 2 }),
        ],
        Shape::Eight => vec![
            slot(Stage::Consolation, pr(0, 2), pr(1, 2)),
            slot(Stage::Final, pr(0, 1), pr(1, 1)),
        ],
        Shape::Twelve => vec![
            // weakest pool winner against the strongest runner-up
            slot(
                Stage::ThirdPlace,
                HelperRank { table: HelperTable::PoolWinners, rank: 3 },
                HelperRank { table: HelperTable::RunnersUp, rank: 1 },
            ),
            slot(
                Stage::Final,
                HelperRank { table: HelperTable::PoolWinners, rank: 1 },
                HelperRank { table: HelperTable::PoolWinners, rank: 2 },
            ),
        ],
        Shape::Five | Shape::Ten => Vec::new(),
    }
}

/* -------------------------------------------------------------------------- */
/*                                  Formulas                                  */
/* -------------------------------------------------------------------------- */

/// Condition that every team in scope has played its quota:
/// `COUNTIF($B$3:$B$6,3)+COUNTIF($B$21:$B$24,3)=8`.
pub fn quota_guard(games_played: &[GridRange], quota: u32, teams_in_scope: u32) -> String {
    let counts: Vec<String> = games_played
        .iter()
        .map(|r| format!("COUNTIF({},{quota})", r.abs()))
        .collect();
    format!("{}={teams_in_scope}", counts.join("+"))
}

/// Team (or value) at `rank` in a ranked table, blank until `guard` holds.
pub fn advancement_lookup(guard: &str, values: GridRange, ranks: GridRange, rank: u32) -> String {
    format!("=IF({guard},{},\"\")", index_match(&values.abs(), &ranks.abs(), rank))
}

fn pick(row: u32, score: &ColumnSchema, winning: bool) -> Result<String, FormulaError> {
    let w = rel_cell(score, Column::Winner, row)?;
    let home = rel_cell(score, Column::HomeTeam, row)?;
    let away = rel_cell(score, Column::AwayTeam, row)?;
    let (on_h, on_a) = if winning { (&home, &away) } else { (&away, &home) };
    Ok(format!("=IF({w}=\"H\",{on_h},IF({w}=\"A\",{on_a},\"\"))"))
}

/// Winner of the bracket game on `row`; blank until decided. Draws stay
/// blank: a knockout draw needs a manual decision.
pub fn winner_of(row: u32, score: &ColumnSchema) -> Result<String, FormulaError> {
    pick(row, score, true)
}

pub fn loser_of(row: u32, score: &ColumnSchema) -> Result<String, FormulaError> {
    pick(row, score, false)
}

/// A pool-winners/runners-up table cell: the `column_range` value of the
/// team ranked `place` in one pool.
pub fn pool_place_value(values: GridRange, ranks: GridRange, place: u32) -> String {
    format!("={}", index_match(&values.abs(), &ranks.abs(), place))
}

/// Games-played column of each pool's standings.
pub fn games_played_ranges(standings: &[RowRange], schema: &ColumnSchema) -> Result<Vec<GridRange>, FormulaError> {
    let gp = schema.require(Column::GamesPlayed)?;
    Ok(standings.iter().map(|r| r.column(gp)).collect())
}

/* ---------------------------------- Tests --------------------------------- */
