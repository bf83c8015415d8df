//! crates/ts_report/src/lib.rs
//! Run report: a presentation model over `run_record.json`, rendered as JSON
//! or HTML.
//!
//! No I/O here. Callers hand in the run record already parsed as a JSON
//! value, so this crate does not depend on the pipeline's concrete types.
//! Section order and field names are fixed.

#![deny(unsafe_code)]

use core::fmt;

use serde_json::Value;

#[cfg(feature = "render_html")]
mod render_html;
#[cfg(feature = "render_json")]
mod render_json;

#[cfg(feature = "render_html")]
pub use render_html::render_html;
#[cfg(feature = "render_json")]
pub use render_json::render_json;

/// Parsed `run_record.json`.
pub type RunRecordArtifact = Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    Template(&'static str),
    MissingField(&'static str),
    Inconsistent(&'static str),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Template(s) => write!(f, "report template error: {s}"),
            ReportError::MissingField(s) => write!(f, "run record is missing {s}"),
            ReportError::Inconsistent(s) => write!(f, "run record is inconsistent: {s}"),
        }
    }
}

impl std::error::Error for ReportError {}

/* ---------------------------------- Model --------------------------------- */

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportModel {
    pub cover: SectionCover,
    pub divisions: SectionDivisions,
    pub shootout: Option<SectionShootout>,
    pub warnings: SectionWarnings,
    pub integrity: SectionIntegrity,
}

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionCover {
    pub title: String,
    pub generated_at: String,
    pub division_count: u32,
    pub team_count: u32,
}

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DivisionRow {
    pub division: String,
    pub sheet: String,
    pub teams: u32,
    pub shape: String,
    /// "dedicated" or "fallback (12-team)".
    pub layout_note: String,
    pub values: u64,
    pub structural_ops: u64,
}

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionDivisions {
    pub rows: Vec<DivisionRow>,
}

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionShootout {
    pub sheet: String,
}

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionWarnings {
    pub items: Vec<String>,
}

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionIntegrity {
    pub engine_vendor: String,
    pub engine_name: String,
    pub engine_version: String,
    pub engine_build: String,
    pub roster_sha256: String,
    pub config_sha256: String,
    pub operations_sha256: String,
}

/* ----------------------------------- API ---------------------------------- */

/// Build the report model from a run record.
///
/// Every field the run record always carries is required; only the shootout
/// sheet is optional.
pub fn build_model(run: &RunRecordArtifact) -> Result<ReportModel, ReportError> {
    let title = json_get_str(run, "/tournament")?;
    let generated_at = json_get_str(run, "/generated_at")?;

    let divisions = run
        .pointer("/divisions")
        .and_then(Value::as_array)
        .ok_or(ReportError::MissingField("/divisions"))?;
    let rows = divisions.iter().map(division_row).collect::<Result<Vec<_>, _>>()?;
    let team_count = rows.iter().map(|r| r.teams).sum();

    let cover = SectionCover { title, generated_at, division_count: rows.len() as u32, team_count };

    let shootout = run
        .pointer("/shootout_sheet")
        .and_then(Value::as_str)
        .map(|s| SectionShootout { sheet: s.to_string() });

    let items = run
        .pointer("/warnings")
        .and_then(Value::as_array)
        .ok_or(ReportError::MissingField("/warnings"))?
        .iter()
        .map(|w| w.as_str().map(str::to_string).ok_or(ReportError::Inconsistent("/warnings")))
        .collect::<Result<Vec<_>, _>>()?;

    let integrity = SectionIntegrity {
        engine_vendor: json_get_str(run, "/engine/vendor")?,
        engine_name: json_get_str(run, "/engine/name")?,
        engine_version: json_get_str(run, "/engine/version")?,
        engine_build: json_get_str(run, "/engine/build")?,
        roster_sha256: json_get_digest(run, "/inputs/roster_sha256")?,
        config_sha256: json_get_digest(run, "/inputs/config_sha256")?,
        operations_sha256: json_get_digest(run, "/operations_sha256")?,
    };

    Ok(ReportModel {
        cover,
        divisions: SectionDivisions { rows },
        shootout,
        warnings: SectionWarnings { items },
        integrity,
    })
}

fn division_row(v: &Value) -> Result<DivisionRow, ReportError> {
    let fallback = json_get_bool(v, "/fallback")?;
    Ok(DivisionRow {
        division: json_get_str(v, "/division")?,
        sheet: json_get_str(v, "/sheet")?,
        teams: json_get_u64(v, "/teams")? as u32,
        shape: json_get_str(v, "/shape")?,
        layout_note: if fallback { "fallback (12-team)".into() } else { "dedicated".into() },
        values: json_get_u64(v, "/values")?,
        structural_ops: json_get_u64(v, "/structural_ops")?,
    })
}

/* --------------------------------- Helpers -------------------------------- */

fn json_get_str(root: &Value, ptr: &'static str) -> Result<String, ReportError> {
    root.pointer(ptr).and_then(Value::as_str).map(str::to_string).ok_or(ReportError::MissingField(ptr))
}

fn json_get_bool(root: &Value, ptr: &'static str) -> Result<bool, ReportError> {
    root.pointer(ptr).and_then(Value::as_bool).ok_or(ReportError::MissingField(ptr))
}

fn json_get_u64(root: &Value, ptr: &'static str) -> Result<u64, ReportError> {
    root.pointer(ptr).and_then(Value::as_u64).ok_or(ReportError::MissingField(ptr))
}

/// Lowercase 64-hex SHA-256.
fn json_get_digest(root: &Value, ptr: &'static str) -> Result<String, ReportError> {
    let s = json_get_str(root, ptr)?;
    if s.len() != 64 || !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return Err(ReportError::Inconsistent(ptr));
    }
    Ok(s)
}
