// crates/ts_algo/src/lib.rs
#![forbid(unsafe_code)]

//! Algorithm layer of the tournament sheet engine. Pure functions only:
//! no I/O, no logging, no shared state.
//!
//! - `topology`: team count → pool/round shape (strategy table)
//! - `schema`: logical columns → grid columns, composed per topology
//! - `schedule`: round-robin pairings
//! - `formula`: formula text for every derived cell

pub mod schedule;
pub mod schema;
pub mod topology;

// ----------------------------- Formula synthesis (public surface) --------------------

pub mod formula {
    // File modules (actual implementations)
    pub mod bracket;
    pub mod refs;
    pub mod score;
    pub mod shootout;
    pub mod standings;
    pub mod tiebreak;

    pub use refs::{FormulaError, PoolRefs, ScoreBlock, Side};
}

// Convenience re-exports (pipeline imports these from crate root)
pub use formula::{FormulaError, PoolRefs, ScoreBlock, Side};
pub use schedule::{round_robin, Pairing};
pub use schema::{Column, ColumnSchema, SchemaError, SchemaSet};
pub use topology::{resolve, resolve_checked, Fallback, Shape, TournamentTopology};
