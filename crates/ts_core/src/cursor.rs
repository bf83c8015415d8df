//! crates/ts_core/src/cursor.rs
//! Row cursor threaded by value through layout steps.
//!
//! Every layout step takes a cursor and returns `(what it reserved, next
//! cursor)`. Nothing mutates a shared position.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::grid::RowRange;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LayoutCursor {
    row: u32,
}

impl LayoutCursor {
    #[inline]
    pub const fn at(row: u32) -> Self {
        Self { row }
    }

    #[inline]
    pub const fn row(self) -> u32 {
        self.row
    }

    /// Take one row.
    #[inline]
    pub fn line(self) -> (u32, LayoutCursor) {
        (self.row, LayoutCursor { row: self.row + 1 })
    }

    /// Take `len` consecutive rows.
    pub fn reserve(self, len: u32) -> Result<(RowRange, LayoutCursor), CoreError> {
        let range = RowRange::with_len(self.row, len)?;
        Ok((range, LayoutCursor { row: range.last + 1 }))
    }

    /// Leave `len` rows blank.
    #[inline]
    pub fn skip(self, len: u32) -> LayoutCursor {
        LayoutCursor { row: self.row + len }
    }

    /// Move forward to `row` if it lies below the cursor.
    #[inline]
    pub fn at_least(self, row: u32) -> LayoutCursor {
        LayoutCursor { row: self.row.max(row) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_advances_past_range() {
        let c = LayoutCursor::at(3);
        let (r, c) = c.reserve(4).unwrap();
        assert_eq!((r.first, r.last), (3, 6));
        assert_eq!(c.row(), 7);
        let (row, c) = c.line();
        assert_eq!(row, 7);
        assert_eq!(c.skip(2).row(), 10);
    }

    #[test]
    fn zero_reservation_is_an_error() {
        assert_eq!(LayoutCursor::at(0).reserve(0), Err(CoreError::EmptyRange));
    }

    #[test]
    fn at_least_never_moves_back() {
        assert_eq!(LayoutCursor::at(10).at_least(4).row(), 10);
        assert_eq!(LayoutCursor::at(10).at_least(14).row(), 14);
    }
}
