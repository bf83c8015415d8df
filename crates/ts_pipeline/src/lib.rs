//! crates/ts_pipeline/src/lib.rs
//! Orchestration of the tournament sheet engine.
//!
//! Fixed order: VALIDATE → per division (POOL PLAY → BRACKET) → barrier →
//! FINISH (cross-pool ranks) → SHOOTOUT → DELIVER. Generation is pure and
//! deterministic; only `deliver` and `retrofit_widths` touch a document
//! service.

#![forbid(unsafe_code)]

use core::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use ts_algo::{Column, FormulaError, SchemaError};
use ts_core::{CoreError, Division, Roster, SheetName};
use ts_io::config::TournamentConfig;
use ts_io::hasher::sha256_canonical;
use ts_io::IoError;

pub mod bracket;
pub mod build_run_record;
pub mod finish;
pub mod layout;
pub mod pool_play;
pub mod requests;
pub mod service;
pub mod shootout;
pub mod validate;

pub use build_run_record::{build_run_record, RunInputs, RunRecordDoc};
pub use layout::{DivisionPlan, LayoutResult, PoolLayout};
pub use requests::{CellValue, Highlight, SheetRequests, StructuralOp, ValidationRule, ValueWrite};
pub use service::{DocumentService, MemoryWorkbook, ServiceError, SheetId};
pub use shootout::{ShootoutSection, ShootoutSheet};
pub use validate::{Severity, ValidationIssue, ValidationReport};

/// Identity of the engine recorded in run records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineMeta {
    pub vendor: String,
    pub name: String,
    pub version: String,
    pub build: String,
}

impl EngineMeta {
    /// Compile-time metadata; `TS_ENGINE_*` variables override the defaults.
    pub fn current() -> Self {
        Self {
            vendor: option_env!("TS_ENGINE_VENDOR").unwrap_or("tsheet").to_string(),
            name: option_env!("TS_ENGINE_NAME").unwrap_or("tournament-sheets").to_string(),
            version: option_env!("TS_ENGINE_VERSION").unwrap_or(env!("CARGO_PKG_VERSION")).to_string(),
            build: option_env!("TS_ENGINE_BUILD").unwrap_or("dev").to_string(),
        }
    }
}

/// Single error surface for the pipeline orchestration.
#[derive(Debug)]
pub enum PipelineError {
    Io(String),
    Config(String),
    /// Validation found at least one Error.
    Validate(ValidationReport),
    Schema(String),
    Layout(String),
    Formula(String),
    Service(ServiceError),
    Build(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PipelineError::*;
        match self {
            Io(m) => write!(f, "io: {m}"),
            Config(m) => write!(f, "config: {m}"),
            Validate(rep) => {
                let errors: Vec<String> = rep.errors().map(|i| format!("{} ({})", i.message, i.code)).collect();
                write!(f, "validation failed with {} error(s): {}", errors.len(), errors.join("; "))
            }
            Schema(m) => write!(f, "schema: {m}"),
            Layout(m) => write!(f, "layout: {m}"),
            Formula(m) => write!(f, "formula: {m}"),
            Service(e) => write!(f, "{e}"),
            Build(m) => write!(f, "build: {m}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<IoError> for PipelineError {
    fn from(e: IoError) -> Self {
        match e {
            IoError::Config(m) => PipelineError::Config(m),
            IoError::Schema(m) => PipelineError::Config(format!("schema: {m}")),
            IoError::Hash(m) => PipelineError::Build(format!("hash: {m}")),
            IoError::Json { pointer, msg } => PipelineError::Build(format!("json {pointer}: {msg}")),
            other => PipelineError::Io(other.to_string()),
        }
    }
}

impl From<CoreError> for PipelineError {
    fn from(e: CoreError) -> Self {
        PipelineError::Layout(e.to_string())
    }
}

impl From<SchemaError> for PipelineError {
    fn from(e: SchemaError) -> Self {
        PipelineError::Schema(e.to_string())
    }
}

impl From<FormulaError> for PipelineError {
    fn from(e: FormulaError) -> Self {
        PipelineError::Formula(e.to_string())
    }
}

impl From<ServiceError> for PipelineError {
    fn from(e: ServiceError) -> Self {
        PipelineError::Service(e)
    }
}

// ---------------------------- Document ----------------------------

/// One division sheet, fully generated.
#[derive(Clone, Debug)]
pub struct DivisionBuild {
    pub plan: DivisionPlan,
    pub pools: Vec<PoolLayout>,
    pub layout: LayoutResult,
    pub requests: SheetRequests,
}

/// Every operation of a run, ready for delivery.
#[derive(Clone, Debug)]
pub struct Document {
    pub tournament: String,
    pub divisions: Vec<DivisionBuild>,
    pub shootout: Option<ShootoutSheet>,
    pub validation: ValidationReport,
}

/// Serialized form of a document's operations (`operations.json`).
#[derive(Serialize)]
pub struct OperationLog<'a> {
    pub tournament: &'a str,
    pub sheets: Vec<&'a SheetRequests>,
}

impl Document {
    /// Sheet logs in delivery order: divisions, then the shootout sheet.
    pub fn sheets(&self) -> Vec<&SheetRequests> {
        let mut out: Vec<&SheetRequests> = self.divisions.iter().map(|b| &b.requests).collect();
        if let Some(s) = &self.shootout {
            out.push(&s.requests);
        }
        out
    }

    pub fn operations(&self) -> OperationLog<'_> {
        OperationLog { tournament: &self.tournament, sheets: self.sheets() }
    }

    /// SHA-256 of the canonical operation log.
    pub fn digest(&self) -> Result<String, PipelineError> {
        Ok(sha256_canonical(&self.operations())?)
    }

    pub fn sheet_names(&self) -> Vec<&SheetName> {
        self.sheets().into_iter().map(|s| &s.sheet).collect()
    }
}

// ---------------------------- Generation ----------------------------

/// Validate the roster and generate every sheet's operations.
pub fn generate(roster: &Roster, cfg: &TournamentConfig) -> Result<Document, PipelineError> {
    let validation = validate::validate(roster, cfg);
    for w in validation.warnings() {
        warn!(code = w.code, "{}", w.message);
    }
    if !validation.pass {
        return Err(PipelineError::Validate(validation));
    }

    let mut divisions = roster
        .divisions
        .iter()
        .map(|d| build_division(d, cfg))
        .collect::<Result<Vec<_>, _>>()?;

    // barrier: every division's pool play and bracket exist from here on
    for b in &mut divisions {
        let written = finish::finish_division(&b.plan, &b.pools, &b.layout, &mut b.requests)?;
        if written > 0 {
            debug!(division = %b.plan.division, cells = written, "cross-pool ranks written");
        }
    }

    let shootout = if cfg.shootout.enabled {
        shootout::lay_out_shootout(&divisions, cfg.shootout_sheet()?, cfg.shootout.short_name_len)?
    } else {
        None
    };

    info!(
        tournament = %cfg.tournament,
        divisions = divisions.len(),
        shootout = shootout.is_some(),
        "document generated"
    );
    Ok(Document { tournament: cfg.tournament.clone(), divisions, shootout, validation })
}

fn build_division(division: &Division, cfg: &TournamentConfig) -> Result<DivisionBuild, PipelineError> {
    let plan = DivisionPlan::new(division, cfg)?;
    info!(
        division = %plan.division,
        sheet = %plan.sheet,
        teams = division.team_count(),
        shape = ?plan.topology.shape,
        "laying out division"
    );
    let pool_play::PoolPlay { pools, layout, mut requests } = pool_play::lay_out_pool_play(&plan, &division.teams)?;
    let layout = bracket::lay_out_bracket(&plan, &pools, layout, &mut requests)?;
    Ok(DivisionBuild { plan, pools, layout, requests })
}

// ---------------------------- Delivery ----------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeliveredSheet {
    pub sheet: SheetName,
    pub id: SheetId,
    pub values: usize,
    pub structural_ops: usize,
}

/// Hand each sheet's log to the service: one value flush and one structural
/// flush per sheet, divisions first, shootout last. Stops at the first
/// service failure.
pub fn deliver<S: DocumentService + ?Sized>(doc: &Document, svc: &mut S) -> Result<Vec<DeliveredSheet>, PipelineError> {
    let mut out = Vec::new();
    for req in doc.sheets() {
        let id = svc.ensure_sheet(&req.sheet)?;
        svc.write_values(id, &req.values)?;
        svc.apply_structure(id, &req.structure)?;
        info!(sheet = %req.sheet, values = req.values.len(), ops = req.structure.len(), "sheet flushed");
        out.push(DeliveredSheet {
            sheet: req.sheet.clone(),
            id,
            values: req.values.len(),
            structural_ops: req.structure.len(),
        });
    }
    Ok(out)
}

/// Auto-fit each division's team column and return `cfg` with the measured
/// widths recorded as per-division overrides.
pub fn retrofit_widths<S: DocumentService + ?Sized>(
    doc: &Document,
    svc: &mut S,
    cfg: &TournamentConfig,
) -> Result<TournamentConfig, PipelineError> {
    let mut out = cfg.clone();
    for b in &doc.divisions {
        let id = svc.ensure_sheet(&b.plan.sheet)?;
        let col = b.plan.schemas.standings.require(Column::Team)?;
        let px = svc.auto_fit_column(id, col)?;
        debug!(division = %b.plan.division, width_px = px, "team column fitted");
        out = out.with_team_column_width(&b.plan.division, px);
    }
    Ok(out)
}
