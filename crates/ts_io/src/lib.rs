//! crates/ts_io/src/lib.rs
//! I/O crate of the tournament sheet engine.
//!
//! - Shared error type (`IoError`) with `From` conversions used across modules.
//! - Roster CSV ingestion, tournament config (JSON + JSON Schema), canonical
//!   JSON writing and SHA-256 digests.
//! - Public surface kept stable; details live in submodules.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for ts_io (used by roster/config/canonical_json/hasher).
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors (missing roster, create_dir_all, rename, ...)
    #[error("io/path error: {0}")]
    Path(String),

    /// Malformed roster rows; `line` is 1-based including the header.
    #[error("roster error at line {line}: {msg}")]
    Roster { line: u64, msg: String },

    /// CSV decoding errors not tied to a single row.
    #[error("csv error: {0}")]
    Csv(String),

    /// JSON serialization/deserialization errors with an optional JSON Pointer.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// JSON Schema validation failures.
    #[error("schema error: {0}")]
    Schema(String),

    /// Config values that pass the schema but not the engine's checks.
    #[error("config error: {0}")]
    Config(String),

    #[error("hash error: {0}")]
    Hash(String),
}

pub type IoResult<T> = Result<T, IoError>;

/* ---------------- From conversions (used by file modules) ---------------- */

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json keeps no pointer; callers may enrich at higher layers.
        IoError::Json { pointer: "/".to_string(), msg: e.to_string() }
    }
}

impl From<csv::Error> for IoError {
    fn from(e: csv::Error) -> Self {
        match e.position() {
            Some(pos) => IoError::Roster { line: pos.line(), msg: e.to_string() },
            None => IoError::Csv(e.to_string()),
        }
    }
}

pub mod canonical_json;
pub mod config;
pub mod hasher;
pub mod roster;
pub mod schema;

pub mod prelude {
    pub use crate::{IoError, IoResult};

    pub use crate::canonical_json::{to_canonical_bytes, write_canonical_file};
    pub use crate::config::{load_config, TournamentConfig};
    pub use crate::hasher::{sha256_canonical, sha256_file, sha256_hex};
    pub use crate::roster::{load_roster, read_roster};
}
