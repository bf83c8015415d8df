//! Column schemas: logical column → zero-based grid column.
//!
//! A schema is composed from blocks. Base blocks are always present; the
//! pool-winner, shootout, overall-rank and cascade-helper blocks depend on
//! the topology. Lookups for columns a topology omits return `None`.

use core::fmt;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::topology::TournamentTopology;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Column {
    // ----- standings -----
    Team,
    GamesPlayed,
    Wins,
    Losses,
    Draws,
    YellowCards,
    RedCards,
    Points,
    Rank,
    CalculatedRank,
    Tiebreaker,
    GoalsFor,
    GoalsAgainst,
    GoalDiff,
    OverallRank,
    // ----- tiebreak cascade helpers -----
    HeadToHead,
    CardCount,
    CappedGoalsAgainst,
    CappedGoalDiff,
    KicksFromMark,
    SortedStandings,
    // ----- score entry -----
    HomeTeam,
    HomeGoals,
    AwayGoals,
    AwayTeam,
    Winner,
    HomeForfeit,
    AwayForfeit,
    HomePoints,
    AwayPoints,
    // ----- pool winners (3 pools) -----
    PoolWinnerRank,
    PoolWinners,
    PoolWinnerPoints,
    PoolWinnerGamesPlayed,
    PoolWinnerTiebreaker,
    // ----- shootout -----
    HomeKicks,
    AwayKicks,
}

impl Column {
    /// Header text written above the column.
    pub fn label(self) -> &'static str {
        match self {
            Column::Team => "Team",
            Column::GamesPlayed => "GP",
            Column::Wins => "W",
            Column::Losses => "L",
            Column::Draws => "D",
            Column::YellowCards => "Yellow",
            Column::RedCards => "Red",
            Column::Points => "Points",
            Column::Rank => "Rank",
            Column::CalculatedRank => "Calc Rank",
            Column::Tiebreaker => "Tiebreaker",
            Column::GoalsFor => "GF",
            Column::GoalsAgainst => "GA",
            Column::GoalDiff => "GD",
            Column::OverallRank => "Overall",
            Column::HeadToHead => "H2H",
            Column::CardCount => "Cards",
            Column::CappedGoalsAgainst => "GA (capped)",
            Column::CappedGoalDiff => "GD (capped)",
            Column::KicksFromMark => "KFTM",
            Column::SortedStandings => "Sorted",
            Column::HomeTeam => "Home",
            Column::HomeGoals => "Goals",
            Column::AwayGoals => "Goals",
            Column::AwayTeam => "Away",
            Column::Winner => "Winner",
            Column::HomeForfeit => "Home Forfeit",
            Column::AwayForfeit => "Away Forfeit",
            Column::HomePoints => "Home Pts",
            Column::AwayPoints => "Away Pts",
            Column::PoolWinnerRank => "Rank",
            Column::PoolWinners => "Pool Winners",
            Column::PoolWinnerPoints => "Points",
            Column::PoolWinnerGamesPlayed => "GP",
            Column::PoolWinnerTiebreaker => "Tiebreaker",
            Column::HomeKicks => "Home Kicks",
            Column::AwayKicks => "Away Kicks",
        }
    }

    /// Entered by hand; no formula is ever synthesized for it.
    pub fn is_manual(self) -> bool {
        matches!(
            self,
            Column::YellowCards
                | Column::RedCards
                | Column::Tiebreaker
                | Column::KicksFromMark
                | Column::HomeGoals
                | Column::AwayGoals
                | Column::HomeForfeit
                | Column::AwayForfeit
                | Column::PoolWinnerTiebreaker
                | Column::HomeKicks
                | Column::AwayKicks
        )
    }

    /// Manual columns holding a checkbox rather than a number.
    pub fn is_checkbox(self) -> bool {
        matches!(
            self,
            Column::Tiebreaker
                | Column::KicksFromMark
                | Column::HomeForfeit
                | Column::AwayForfeit
                | Column::PoolWinnerTiebreaker
        )
    }
}

/* -------------------------------------------------------------------------- */
/*                                   Blocks                                   */
/* -------------------------------------------------------------------------- */

pub const STANDINGS_BASE: [Column; 14] = [
    Column::Team,
    Column::GamesPlayed,
    Column::Wins,
    Column::Losses,
    Column::Draws,
    Column::YellowCards,
    Column::RedCards,
    Column::Points,
    Column::Rank,
    Column::CalculatedRank,
    Column::Tiebreaker,
    Column::GoalsFor,
    Column::GoalsAgainst,
    Column::GoalDiff,
];

/// Cascade order of the sort keys lives in `formula::tiebreak`; this is only
/// the column placement.
pub const CASCADE_HELPERS: [Column; 6] = [
    Column::HeadToHead,
    Column::CardCount,
    Column::CappedGoalsAgainst,
    Column::CappedGoalDiff,
    Column::KicksFromMark,
    Column::SortedStandings,
];

pub const SCORE_BASE: [Column; 9] = [
    Column::HomeTeam,
    Column::HomeGoals,
    Column::AwayGoals,
    Column::AwayTeam,
    Column::Winner,
    Column::HomeForfeit,
    Column::AwayForfeit,
    Column::HomePoints,
    Column::AwayPoints,
];

pub const POOL_WINNER_BLOCK: [Column; 5] = [
    Column::PoolWinnerRank,
    Column::PoolWinners,
    Column::PoolWinnerPoints,
    Column::PoolWinnerGamesPlayed,
    Column::PoolWinnerTiebreaker,
];

pub const SHOOTOUT_BLOCK: [Column; 2] = [Column::HomeKicks, Column::AwayKicks];

/* -------------------------------------------------------------------------- */
/*                                   Errors                                   */
/* -------------------------------------------------------------------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaError {
    Duplicate(Column),
    Missing(Column),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::Duplicate(c) => write!(f, "column {c:?} appears twice in schema"),
            SchemaError::Missing(c) => write!(f, "column {c:?} is not part of this schema"),
        }
    }
}

impl std::error::Error for SchemaError {}

/* -------------------------------------------------------------------------- */
/*                                   Schema                                   */
/* -------------------------------------------------------------------------- */

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnSchema {
    columns: Vec<Column>,
    index: BTreeMap<Column, u32>,
}

impl ColumnSchema {
    /// Concatenate blocks left to right.
    pub fn from_blocks(blocks: &[&[Column]]) -> Result<Self, SchemaError> {
        let mut columns = Vec::new();
        let mut index = BTreeMap::new();
        for &c in blocks.iter().flat_map(|b| b.iter()) {
            if index.insert(c, columns.len() as u32).is_some() {
                return Err(SchemaError::Duplicate(c));
            }
            columns.push(c);
        }
        Ok(Self { columns, index })
    }

    /// Column index, or `None` when this schema omits the column.
    #[inline]
    pub fn index(&self, column: Column) -> Option<u32> {
        self.index.get(&column).copied()
    }

    /// Column index for columns a formula cannot do without.
    pub fn require(&self, column: Column) -> Result<u32, SchemaError> {
        self.index(column).ok_or(SchemaError::Missing(column))
    }

    #[inline]
    pub fn has(&self, column: Column) -> bool {
        self.index.contains_key(&column)
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.columns.len() as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// `(index, column)` left to right.
    pub fn iter(&self) -> impl Iterator<Item = (u32, Column)> + '_ {
        self.columns.iter().enumerate().map(|(i, c)| (i as u32, *c))
    }
}

/// Standings and score-entry schemas of one division.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaSet {
    pub standings: ColumnSchema,
    pub score: ColumnSchema,
}

impl SchemaSet {
    pub fn for_topology(topology: &TournamentTopology, shootout: bool) -> Result<Self, SchemaError> {
        let standings = if topology.uses_cross_pool_rank() {
            let base: Vec<Column> = STANDINGS_BASE
                .iter()
                .copied()
                .filter(|c| *c != Column::CalculatedRank)
                .collect();
            ColumnSchema::from_blocks(&[&base, &[Column::OverallRank]])?
        } else {
            ColumnSchema::from_blocks(&[&STANDINGS_BASE, &CASCADE_HELPERS])?
        };

        let mut blocks: Vec<&[Column]> = vec![&SCORE_BASE];
        if topology.has_pool_winner_table() {
            blocks.push(&POOL_WINNER_BLOCK);
        }
        if shootout && topology.shootout_rounds > 0 {
            blocks.push(&SHOOTOUT_BLOCK);
        }
        let score = ColumnSchema::from_blocks(&blocks)?;
        Ok(Self { standings, score })
    }

    /// Cascade helper columns to group and hide, as contiguous `(first, last)`
    /// runs. Columns the score-entry block also uses stay visible.
    pub fn hidden_helper_columns(&self) -> Vec<(u32, u32)> {
        let mut cols: Vec<u32> = CASCADE_HELPERS
            .iter()
            .filter_map(|c| self.standings.index(*c))
            .filter(|i| *i >= self.score.len())
            .collect();
        cols.sort_unstable();
        let mut runs: Vec<(u32, u32)> = Vec::new();
        for c in cols {
            match runs.last_mut() {
                Some((_, last)) if *last + 1 == c => *last = c,
                _ => runs.push((c, c)),
            }
        }
        runs
    }
}

/* ---------------------------------- Tests --------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::resolve;

    #[test]
    fn four_team_layout_columns() {
        let s = SchemaSet::for_topology(&resolve(4), true).unwrap();
        assert_eq!(s.standings.index(Column::Points), Some(7));
        assert_eq!(s.standings.index(Column::Rank), Some(8));
        assert_eq!(s.standings.index(Column::CalculatedRank), Some(9));
        assert_eq!(s.standings.index(Column::Tiebreaker), Some(10));
        assert_eq!(s.standings.index(Column::HeadToHead), Some(14));
        assert_eq!(s.standings.index(Column::SortedStandings), Some(19));
        assert_eq!(s.standings.index(Column::OverallRank), None);
        assert_eq!(s.score.index(Column::Winner), Some(4));
        assert_eq!(s.score.index(Column::HomeKicks), Some(9));
        assert_eq!(s.score.index(Column::PoolWinners), None);
    }

    #[test]
    fn cross_pool_drops_calculated_rank() {
        let s = SchemaSet::for_topology(&resolve(10), true).unwrap();
        assert_eq!(s.standings.index(Column::CalculatedRank), None);
        assert_eq!(s.standings.index(Column::Tiebreaker), Some(9));
        assert_eq!(s.standings.index(Column::OverallRank), Some(13));
        assert!(!s.standings.has(Column::SortedStandings));
        assert!(s.hidden_helper_columns().is_empty());
    }

    #[test]
    fn three_pools_insert_winner_block_after_points() {
        let s = SchemaSet::for_topology(&resolve(12), true).unwrap();
        assert_eq!(s.score.index(Column::AwayPoints), Some(8));
        assert_eq!(s.score.index(Column::PoolWinnerRank), Some(9));
        assert_eq!(s.score.index(Column::PoolWinnerTiebreaker), Some(13));
        assert_eq!(s.score.index(Column::HomeKicks), Some(14));
        assert_eq!(s.score.index(Column::AwayKicks), Some(15));
        // O and P carry kicks in game rows, so only Q..T hide
        assert_eq!(s.hidden_helper_columns(), vec![(16, 19)]);
    }

    #[test]
    fn shootout_block_optional() {
        let s = SchemaSet::for_topology(&resolve(8), false).unwrap();
        assert_eq!(s.score.index(Column::HomeKicks), None);
        assert_eq!(s.score.len(), 9);
        assert_eq!(s.hidden_helper_columns(), vec![(14, 19)]);
    }

    #[test]
    fn duplicates_and_missing_are_errors() {
        assert_eq!(
            ColumnSchema::from_blocks(&[&[Column::Team], &[Column::Team]]),
            Err(SchemaError::Duplicate(Column::Team))
        );
        let s = ColumnSchema::from_blocks(&[&SCORE_BASE]).unwrap();
        assert_eq!(s.require(Column::HomeKicks), Err(SchemaError::Missing(Column::HomeKicks)));
    }

    #[test]
    fn manual_columns_have_no_formula_role() {
        assert!(Column::YellowCards.is_manual());
        assert!(Column::HomeForfeit.is_checkbox());
        assert!(!Column::Points.is_manual());
    }
}
