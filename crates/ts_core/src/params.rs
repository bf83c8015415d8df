//! crates/ts_core/src/params.rs
//! Layout parameters shared by the layout generators and formula synthesis.
//!
//! The per-round row offset is computed here and nowhere else. Pool-play
//! layout reserves rounds with `round_stride`, and every formula that walks
//! rounds locates game rows with `game_row`; both receive the same value.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Label row + one spacer row.
pub const DEFAULT_ROUND_SPACING: u32 = 2;

/// Rows between a round's label row and its first game row.
pub const ROUND_LABEL_ROWS: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutParams {
    /// Non-game rows per round: the label row plus trailing spacer rows.
    pub round_spacing: u32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self { round_spacing: DEFAULT_ROUND_SPACING }
    }
}

impl LayoutParams {
    pub fn new(round_spacing: u32) -> Result<Self, CoreError> {
        let p = Self { round_spacing };
        p.validate()?;
        Ok(p)
    }

    /// `round_spacing` must leave room for the label row.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.round_spacing < ROUND_LABEL_ROWS {
            return Err(CoreError::InvalidParam("round_spacing"));
        }
        Ok(())
    }

    /// Row offset from one round's label row to the next.
    #[inline]
    pub fn round_stride(&self, games_per_round: u32) -> u32 {
        games_per_round + self.round_spacing
    }

    /// Label row of `round` (zero-based) for a block starting at `first_row`.
    #[inline]
    pub fn round_label_row(&self, first_row: u32, games_per_round: u32, round: u32) -> u32 {
        first_row + round * self.round_stride(games_per_round)
    }

    /// Row of `game` (zero-based) within `round`.
    #[inline]
    pub fn game_row(&self, first_row: u32, games_per_round: u32, round: u32, game: u32) -> u32 {
        self.round_label_row(first_row, games_per_round, round) + ROUND_LABEL_ROWS + game
    }

    /// Total rows a block of `rounds` rounds occupies.
    #[inline]
    pub fn block_height(&self, games_per_round: u32, rounds: u32) -> u32 {
        rounds * self.round_stride(games_per_round)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stride_is_games_plus_two() {
        let p = LayoutParams::default();
        assert_eq!(p.round_stride(2), 4);
        assert_eq!(p.round_stride(1), 3);
        assert_eq!(p.block_height(2, 3), 12);
    }

    #[test]
    fn game_rows_follow_stride() {
        let p = LayoutParams::default();
        // block at row 6: labels 6, 10, 14; games 7-8, 11-12, 15-16
        assert_eq!(p.round_label_row(6, 2, 0), 6);
        assert_eq!(p.game_row(6, 2, 0, 0), 7);
        assert_eq!(p.game_row(6, 2, 1, 1), 12);
        assert_eq!(p.game_row(6, 2, 2, 0), 15);
    }

    #[test]
    fn wider_spacing_shifts_later_rounds_only() {
        let p = LayoutParams::new(3).unwrap();
        assert_eq!(p.game_row(0, 2, 0, 0), 1);
        assert_eq!(p.game_row(0, 2, 1, 0), 6);
    }

    #[test]
    fn zero_spacing_is_rejected() {
        assert_eq!(LayoutParams::new(0), Err(CoreError::InvalidParam("round_spacing")));
    }
}
