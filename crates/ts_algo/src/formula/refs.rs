//! Coordinates handed to formula synthesis.
//!
//! `ScoreBlock` is the only description of where a pool's games live. The
//! layout generator builds it from the same `LayoutParams` it reserves rows
//! with, so game rows located here are the rows that were laid out.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use ts_core::{CellRef, CoreError, LayoutParams, RowRange};

use crate::schema::{Column, ColumnSchema, SchemaError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    #[inline]
    pub fn other(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }

    /// Winner token meaning "this side won".
    #[inline]
    pub fn token(self) -> &'static str {
        match self {
            Side::Home => "H",
            Side::Away => "A",
        }
    }

    pub fn team_column(self) -> Column {
        match self {
            Side::Home => Column::HomeTeam,
            Side::Away => Column::AwayTeam,
        }
    }

    pub fn goals_column(self) -> Column {
        match self {
            Side::Home => Column::HomeGoals,
            Side::Away => Column::AwayGoals,
        }
    }

    pub fn points_column(self) -> Column {
        match self {
            Side::Home => Column::HomePoints,
            Side::Away => Column::AwayPoints,
        }
    }
}

/// Round geometry of one pool's score entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScoreBlock {
    /// Label row of the first round.
    pub first_row: u32,
    pub rounds: u32,
    pub games_per_round: u32,
    pub params: LayoutParams,
}

impl ScoreBlock {
    pub fn new(first_row: u32, rounds: u32, games_per_round: u32, params: LayoutParams) -> Self {
        Self { first_row, rounds, games_per_round, params }
    }

    #[inline]
    pub fn round_label_row(&self, round: u32) -> u32 {
        self.params.round_label_row(self.first_row, self.games_per_round, round)
    }

    #[inline]
    pub fn game_row(&self, round: u32, game: u32) -> u32 {
        self.params.game_row(self.first_row, self.games_per_round, round, game)
    }

    /// Every row the block reserves, spacers included.
    pub fn rows(&self) -> Result<RowRange, CoreError> {
        RowRange::with_len(self.first_row, self.params.block_height(self.games_per_round, self.rounds))
    }

    /// From the first game row to the last game row. Aggregates range over
    /// this span; label and spacer rows inside it never match a team.
    pub fn span(&self) -> Result<RowRange, CoreError> {
        if self.rounds == 0 || self.games_per_round == 0 {
            return Err(CoreError::EmptyRange);
        }
        RowRange::new(self.game_row(0, 0), self.game_row(self.rounds - 1, self.games_per_round - 1))
    }

    /// Game rows of one round.
    pub fn round_games(&self, round: u32) -> Result<RowRange, CoreError> {
        RowRange::with_len(self.game_row(round, 0), self.games_per_round)
    }

    /// `(round, game, row)` in layout order.
    pub fn game_rows(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        (0..self.rounds).flat_map(move |r| (0..self.games_per_round).map(move |g| (r, g, self.game_row(r, g))))
    }
}

/// Standings rows and score block of one pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolRefs {
    pub standings: RowRange,
    pub score: ScoreBlock,
}

/* -------------------------------------------------------------------------- */
/*                                  Helpers                                   */
/* -------------------------------------------------------------------------- */

/// Errors while synthesizing a formula.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormulaError {
    Schema(SchemaError),
    Grid(CoreError),
}

impl core::fmt::Display for FormulaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FormulaError::Schema(e) => write!(f, "schema: {e}"),
            FormulaError::Grid(e) => write!(f, "grid: {e}"),
        }
    }
}

impl std::error::Error for FormulaError {}

impl From<SchemaError> for FormulaError {
    fn from(e: SchemaError) -> Self {
        FormulaError::Schema(e)
    }
}

impl From<CoreError> for FormulaError {
    fn from(e: CoreError) -> Self {
        FormulaError::Grid(e)
    }
}

/// Absolute range of `column` over `rows`: `$H$3:$H$6`.
pub fn col_range(schema: &ColumnSchema, column: Column, rows: RowRange) -> Result<String, FormulaError> {
    Ok(rows.column(schema.require(column)?).abs())
}

/// Relative cell of `column` on `row`: `E8`.
pub fn rel_cell(schema: &ColumnSchema, column: Column, row: u32) -> Result<String, FormulaError> {
    Ok(CellRef::new(row, schema.require(column)?).a1())
}

/// Column-absolute cell of `column` on `row`: `$H3`.
pub fn row_cell(schema: &ColumnSchema, column: Column, row: u32) -> Result<String, FormulaError> {
    Ok(CellRef::new(row, schema.require(column)?).col_abs())
}

/// `IFERROR(INDEX(values,MATCH(place,ranks,0)),"")` without the leading '='.
pub fn index_match(values: &str, ranks: &str, place: u32) -> String {
    format!("IFERROR(INDEX({values},MATCH({place},{ranks},0)),\"\")")
}
