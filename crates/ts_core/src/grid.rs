//! crates/ts_core/src/grid.rs
//! Zero-based grid coordinates and their A1 renderings.
//!
//! Rows and columns are zero-based everywhere in the engine; only the text
//! produced here is one-based. Three reference styles are used by formulas:
//! relative (`B8`), column-absolute (`$B8`) and absolute (`$B$8`).

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::ids::SheetName;

/// Column letters for a zero-based index: 0 → "A", 25 → "Z", 26 → "AA".
pub fn col_letters(col: u32) -> String {
    let mut n = col as u64 + 1;
    let mut out = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        out.push(b'A' + rem);
        n = (n - 1) / 26;
    }
    out.reverse();
    // only ASCII letters were pushed
    String::from_utf8_lossy(&out).into_owned()
}

/// Prefix a reference with a quoted sheet title: `'U10 Boys'!$A$3`.
pub fn qualify(sheet: &SheetName, reference: &str) -> String {
    format!("'{}'!{}", sheet.as_str().replace('\'', "''"), reference)
}

/* -------------------------------------------------------------------------- */
/*                                   Cells                                    */
/* -------------------------------------------------------------------------- */

/// A single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    #[inline]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// `B8`
    pub fn a1(self) -> String {
        format!("{}{}", col_letters(self.col), self.row + 1)
    }

    /// `$B$8`
    pub fn abs(self) -> String {
        format!("${}${}", col_letters(self.col), self.row + 1)
    }

    /// `$B8`
    pub fn col_abs(self) -> String {
        format!("${}{}", col_letters(self.col), self.row + 1)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.a1())
    }
}

/* -------------------------------------------------------------------------- */
/*                                 Row ranges                                 */
/* -------------------------------------------------------------------------- */

/// Inclusive, non-empty span of rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RowRange {
    pub first: u32,
    pub last: u32,
}

impl RowRange {
    pub fn new(first: u32, last: u32) -> Result<Self, CoreError> {
        if last < first {
            return Err(CoreError::EmptyRange);
        }
        Ok(Self { first, last })
    }

    /// `len` rows starting at `first`.
    pub fn with_len(first: u32, len: u32) -> Result<Self, CoreError> {
        if len == 0 {
            return Err(CoreError::EmptyRange);
        }
        Ok(Self { first, last: first + (len - 1) })
    }

    #[inline]
    pub fn single(row: u32) -> Self {
        Self { first: row, last: row }
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.last - self.first + 1
    }

    /// Always false; kept for the `len`/`is_empty` pair.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[inline]
    pub fn contains(&self, row: u32) -> bool {
        self.first <= row && row <= self.last
    }

    #[inline]
    pub fn overlaps(&self, other: &RowRange) -> bool {
        self.first <= other.last && other.first <= self.last
    }

    pub fn rows(&self) -> impl Iterator<Item = u32> {
        self.first..=self.last
    }

    /// This span restricted to one column.
    #[inline]
    pub fn column(&self, col: u32) -> GridRange {
        GridRange { rows: *self, first_col: col, last_col: col }
    }

    /// This span across `first_col..=last_col`.
    #[inline]
    pub fn columns(&self, first_col: u32, last_col: u32) -> GridRange {
        GridRange { rows: *self, first_col: first_col.min(last_col), last_col: first_col.max(last_col) }
    }
}

/* -------------------------------------------------------------------------- */
/*                                Grid ranges                                 */
/* -------------------------------------------------------------------------- */

/// Rectangle of cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridRange {
    pub rows: RowRange,
    pub first_col: u32,
    pub last_col: u32,
}

impl GridRange {
    #[inline]
    pub fn top_left(&self) -> CellRef {
        CellRef::new(self.rows.first, self.first_col)
    }

    #[inline]
    pub fn bottom_right(&self) -> CellRef {
        CellRef::new(self.rows.last, self.last_col)
    }

    /// `B8:E9`
    pub fn a1(&self) -> String {
        format!("{}:{}", self.top_left().a1(), self.bottom_right().a1())
    }

    /// `$B$8:$E$9`
    pub fn abs(&self) -> String {
        format!("{}:{}", self.top_left().abs(), self.bottom_right().abs())
    }

    pub fn cells(&self) -> impl Iterator<Item = CellRef> + '_ {
        self.rows
            .rows()
            .flat_map(move |r| (self.first_col..=self.last_col).map(move |c| CellRef::new(r, c)))
    }
}

impl fmt::Display for GridRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.a1())
    }
}

/* ---------------------------------- Tests --------------------------------- */
