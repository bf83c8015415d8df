//! crates/ts_pipeline/src/build_run_record.rs
//! Run record: what was generated, from which inputs, by which engine.
//!
//! Input digests are computed by the caller (the CLI hashes the roster file
//! as read from disk). The operation-log digest comes from `Document::digest`,
//! so two runs over the same inputs carry the same `operations_sha256`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use ts_algo::{Fallback, Shape};
use ts_core::{DivisionName, SheetName};

use crate::{Document, EngineMeta, PipelineError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunInputs {
    pub roster_sha256: String,
    pub config_sha256: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DivisionSummary {
    pub division: DivisionName,
    pub sheet: SheetName,
    pub teams: u32,
    pub shape: Shape,
    /// Team count had no dedicated layout.
    pub fallback: bool,
    pub values: usize,
    pub structural_ops: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunRecordDoc {
    pub engine: EngineMeta,
    /// RFC 3339, UTC, whole seconds.
    pub generated_at: String,
    pub tournament: String,
    pub inputs: RunInputs,
    pub operations_sha256: String,
    pub divisions: Vec<DivisionSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shootout_sheet: Option<SheetName>,
    pub warnings: Vec<String>,
}

pub fn build_run_record(
    doc: &Document,
    engine: EngineMeta,
    inputs: RunInputs,
    now: DateTime<Utc>,
) -> Result<RunRecordDoc, PipelineError> {
    let divisions = doc
        .divisions
        .iter()
        .map(|b| DivisionSummary {
            division: b.plan.division.clone(),
            sheet: b.plan.sheet.clone(),
            teams: b.pools.iter().map(|p| p.teams.len() as u32).sum(),
            shape: b.plan.topology.shape,
            fallback: matches!(b.plan.fallback, Fallback::DefaultedToTwelve { .. }),
            values: b.requests.values.len(),
            structural_ops: b.requests.structure.len(),
        })
        .collect();

    Ok(RunRecordDoc {
        engine,
        generated_at: now.to_rfc3339_opts(SecondsFormat::Secs, true),
        tournament: doc.tournament.clone(),
        inputs,
        operations_sha256: doc.digest()?,
        divisions,
        shootout_sheet: doc.shootout.as_ref().map(|s| s.requests.sheet.clone()),
        warnings: doc.validation.warnings().map(|w| format!("{}: {}", w.code, w.message)).collect(),
    })
}
