//! ts_core: core types for the tournament sheet engine.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! engine (`ts_io`, `ts_algo`, `ts_pipeline`, `ts_report`, `ts_cli`).
//!
//! - Names: `DivisionName`, `TeamName`, `PoolLabel`, `SheetName`
//! - Grid coordinates and A1 rendering (`CellRef`, `RowRange`, `GridRange`)
//! - Roster entities (`Team`, `Division`, `Roster`)
//! - Shared layout parameters (`LayoutParams`) and the row cursor
//! - Deterministic ordering helpers
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain validation and grid arithmetic.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum CoreError {
        EmptyName(&'static str),
        NameTooLong(&'static str),
        ControlChar(&'static str),
        ForbiddenChar(&'static str, char),
        EmptyRange,
        InvalidParam(&'static str),
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::EmptyName(k) => write!(f, "empty {k}"),
                CoreError::NameTooLong(k) => write!(f, "{k} is too long"),
                CoreError::ControlChar(k) => write!(f, "{k} contains a control character"),
                CoreError::ForbiddenChar(k, c) => write!(f, "{k} contains forbidden character {c:?}"),
                CoreError::EmptyRange => write!(f, "empty row range"),
                CoreError::InvalidParam(k) => write!(f, "invalid layout parameter: {k}"),
            }
        }
    }

    impl std::error::Error for CoreError {}
}

pub mod cursor;
pub mod determinism;
pub mod entities;
pub mod grid;
pub mod ids;
pub mod params;

pub use cursor::LayoutCursor;
pub use entities::{Division, Roster, Team};
pub use errors::CoreError;
pub use grid::{col_letters, qualify, CellRef, GridRange, RowRange};
pub use ids::{DivisionName, PoolLabel, SheetName, TeamName};
pub use params::LayoutParams;
