//! Topology resolver: team count → pool/round shape.
//!
//! A fixed strategy table, not inference. Counts outside the table resolve
//! to the 12-team shape; `resolve_checked` tells the caller that happened so
//! validation can warn about it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Named tournament shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Shape {
    Four,
    Five,
    Six,
    Eight,
    Ten,
    Twelve,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TournamentTopology {
    pub shape: Shape,
    pub pool_count: u32,
    pub teams_per_pool: u32,
    pub game_rounds: u32,
    pub games_per_round: u32,
    pub shootout_rounds: u32,
}

/// Whether the requested count was in the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fallback {
    Exact,
    /// Unsupported count normalized to the 12-team shape.
    DefaultedToTwelve { requested: u32 },
}

const fn row(shape: Shape, pool_count: u32, teams_per_pool: u32, shootout_rounds: u32) -> TournamentTopology {
    // round robin: odd pools sit one team out per round
    let game_rounds = if teams_per_pool % 2 == 1 { teams_per_pool } else { teams_per_pool - 1 };
    TournamentTopology {
        shape,
        pool_count,
        teams_per_pool,
        game_rounds,
        games_per_round: teams_per_pool / 2,
        shootout_rounds,
    }
}

/// Strategy table keyed by team count.
const TABLE: [(u32, TournamentTopology); 6] = [
    (4, row(Shape::Four, 1, 4, 3)),
    (5, row(Shape::Five, 1, 5, 4)),
    (6, row(Shape::Six, 2, 3, 3)),
    (8, row(Shape::Eight, 2, 4, 3)),
    (10, row(Shape::Ten, 2, 5, 4)),
    (12, row(Shape::Twelve, 3, 4, 3)),
];

/// Team counts with a dedicated shape, ascending.
pub const SUPPORTED_TEAM_COUNTS: [u32; 6] = [4, 5, 6, 8, 10, 12];

pub const DEFAULT_TOPOLOGY: TournamentTopology = TABLE[5].1;

/// Resolve a team count; unknown counts use the 12-team shape.
pub fn resolve(team_count: u32) -> TournamentTopology {
    resolve_checked(team_count).0
}

pub fn resolve_checked(team_count: u32) -> (TournamentTopology, Fallback) {
    match TABLE.iter().find(|(n, _)| *n == team_count) {
        Some((_, t)) => (*t, Fallback::Exact),
        None => (DEFAULT_TOPOLOGY, Fallback::DefaultedToTwelve { requested: team_count }),
    }
}

impl TournamentTopology {
    #[inline]
    pub fn team_count(&self) -> u32 {
        self.pool_count * self.teams_per_pool
    }

    /// Pools with an odd team count have a bye every round.
    #[inline]
    pub fn has_byes(&self) -> bool {
        self.teams_per_pool % 2 == 1
    }

    /// Games each team plays in pool play.
    #[inline]
    pub fn game_quota(&self) -> u32 {
        self.teams_per_pool - 1
    }

    /// Winner decided by points across pools; no bracket.
    #[inline]
    pub fn uses_cross_pool_rank(&self) -> bool {
        matches!(self.shape, Shape::Five | Shape::Ten)
    }

    /// Three pools need a pool-winners/runners-up table to seed the bracket.
    #[inline]
    pub fn has_pool_winner_table(&self) -> bool {
        self.pool_count == 3
    }

    #[inline]
    pub fn has_bracket(&self) -> bool {
        !self.uses_cross_pool_rank()
    }
}

/* ---------------------------------- Tests --------------------------------- */
