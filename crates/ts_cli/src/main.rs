//! crates/ts_cli/src/main.rs
//! `tsheet`: roster in, workbook and run artifacts out.
//!
//! Exit codes:
//!   0 ok
//!   2 usage or validation failure
//!   3 roster/config could not be read
//!   4 generation failed
//!   5 document service or artifact write failed

#![forbid(unsafe_code)]

mod args;
mod workbook;

mod exitcodes {
    pub const OK: i32 = 0;
    pub const VALIDATION: i32 = 2;
    pub const INPUT: i32 = 3;
    pub const GENERATION: i32 = 4;
    pub const OUTPUT: i32 = 5;
}

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};

use args::{check_paths, Args};
use ts_io::canonical_json::write_canonical_file;
use ts_io::config::{load_config, TournamentConfig};
use ts_io::hasher::{sha256_canonical, sha256_file};
use ts_io::roster::load_roster;
use ts_io::IoError;
use ts_pipeline::validate::validate;
use ts_pipeline::{
    build_run_record, deliver, generate, retrofit_widths, Document, EngineMeta, PipelineError, RunInputs,
    RunRecordDoc,
};
use workbook::FileWorkbook;

/// Every failure of a run, bucketed by exit code.
#[derive(Debug)]
enum MainError {
    /// Bad flags or a roster that fails validation.
    Validation(String),
    /// Roster or config unreadable or malformed.
    Input(String),
    Generation(String),
    /// Document service or artifact writing.
    Output(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) => write!(f, "validation: {m}"),
            MainError::Input(m) => write!(f, "input: {m}"),
            MainError::Generation(m) => write!(f, "generation: {m}"),
            MainError::Output(m) => write!(f, "output: {m}"),
        }
    }
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(a) => a,
        Err(e) => {
            // --help and --version also land here
            let _ = e.print();
            let rc = if e.use_stderr() { exitcodes::VALIDATION } else { exitcodes::OK };
            return ExitCode::from(rc as u8);
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(args.level())
        .with_target(false)
        .with_ansi(false)
        .init();

    let rc = match run(&args) {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            error!("{e}");
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::Input(_) => INPUT,
        MainError::Generation(_) => GENERATION,
        MainError::Output(_) => OUTPUT,
    }
}

fn map_input_err(e: IoError) -> MainError {
    MainError::Input(e.to_string())
}

fn map_output_err(e: IoError) -> MainError {
    MainError::Output(e.to_string())
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    use PipelineError::*;
    match e {
        Validate(_) => MainError::Validation(e.to_string()),
        Io(_) | Config(_) => MainError::Input(e.to_string()),
        Service(_) => MainError::Output(e.to_string()),
        Schema(_) | Layout(_) | Formula(_) | Build(_) => MainError::Generation(e.to_string()),
    }
}

fn run(args: &Args) -> Result<(), MainError> {
    check_paths(args).map_err(|e| MainError::Validation(e.to_string()))?;

    let roster = load_roster(&args.roster).map_err(map_input_err)?;
    let cfg = load_config(args.config.as_deref()).map_err(map_input_err)?;
    info!(
        roster = %args.roster.display(),
        divisions = roster.divisions.len(),
        teams = roster.team_count(),
        "roster loaded"
    );

    if args.validate_only {
        return validate_only(&roster, &cfg);
    }

    let doc = generate(&roster, &cfg).map_err(map_pipeline_err)?;

    fs::create_dir_all(&args.out)
        .map_err(|e| MainError::Output(format!("mkdir {}: {e}", args.out.display())))?;

    let mut wb = FileWorkbook::new(args.out.join("workbook.json"));
    deliver(&doc, &mut wb).map_err(map_pipeline_err)?;
    if wb.overwrites() > 0 {
        warn!(cells = wb.overwrites(), "cells written more than once");
    }

    let effective_cfg = if args.retrofit_widths {
        let fitted = retrofit_widths(&doc, &mut wb, &cfg).map_err(map_pipeline_err)?;
        let path = args.out.join("tournament.fitted.json");
        write_canonical_file(&path, &fitted).map_err(map_output_err)?;
        info!(path = %path.display(), "fitted config written");
        fitted
    } else {
        cfg
    };
    wb.save().map_err(map_output_err)?;

    let record = write_artifacts(args, &doc, &effective_cfg)?;
    maybe_render_reports(args, &record)?;

    info!(out = %args.out.display(), workbook = %wb.path().display(), "run complete");
    Ok(())
}

/// Print the validation report as JSON on stdout.
fn validate_only(roster: &ts_core::Roster, cfg: &TournamentConfig) -> Result<(), MainError> {
    let report = validate(roster, cfg);
    let json = serde_json::to_string_pretty(&report).map_err(|e| MainError::Output(e.to_string()))?;
    println!("{json}");
    if report.pass {
        info!(warnings = report.warnings().count(), "validation passed");
        Ok(())
    } else {
        Err(MainError::Validation(format!("{} error(s)", report.errors().count())))
    }
}

fn write_artifacts(args: &Args, doc: &Document, cfg: &TournamentConfig) -> Result<RunRecordDoc, MainError> {
    let ops_path = args.out.join("operations.json");
    write_canonical_file(&ops_path, &doc.operations()).map_err(map_output_err)?;

    let inputs = RunInputs {
        roster_sha256: sha256_file(&args.roster).map_err(map_input_err)?,
        config_sha256: sha256_canonical(cfg).map_err(map_output_err)?,
    };
    let record =
        build_run_record(doc, EngineMeta::current(), inputs, chrono::Utc::now()).map_err(map_pipeline_err)?;
    let run_path = args.out.join("run_record.json");
    write_canonical_file(&run_path, &record).map_err(map_output_err)?;

    info!(operations = %ops_path.display(), run_record = %run_path.display(), "artifacts written");
    Ok(record)
}

fn maybe_render_reports(args: &Args, record: &RunRecordDoc) -> Result<(), MainError> {
    if args.render.is_empty() {
        return Ok(());
    }
    let run_val = serde_json::to_value(record).map_err(|e| MainError::Output(format!("run_record to JSON: {e}")))?;
    let model = ts_report::build_model(&run_val).map_err(|e| MainError::Output(e.to_string()))?;
    for fmt in &args.render {
        match fmt.as_str() {
            "json" => render_json_report(&model, &args.out)?,
            "html" => render_html_report(&model, &args.out)?,
            other => return Err(MainError::Validation(format!("unknown renderer: {other}"))),
        }
    }
    Ok(())
}

fn render_json_report(model: &ts_report::ReportModel, out_dir: &Path) -> Result<(), MainError> {
    #[cfg(feature = "report-json")]
    {
        let body = ts_report::render_json(model).map_err(|e| MainError::Output(e.to_string()))?;
        write_report(&out_dir.join("report.json"), &body)
    }
    #[cfg(not(feature = "report-json"))]
    {
        let _ = (model, out_dir);
        Err(MainError::Validation("json renderer not enabled (build with feature `report-json`)".into()))
    }
}

fn render_html_report(model: &ts_report::ReportModel, out_dir: &Path) -> Result<(), MainError> {
    #[cfg(feature = "report-html")]
    {
        let body = ts_report::render_html(model).map_err(|e| MainError::Output(e.to_string()))?;
        write_report(&out_dir.join("report.html"), &body)
    }
    #[cfg(not(feature = "report-html"))]
    {
        let _ = (model, out_dir);
        Err(MainError::Validation("html renderer not enabled (build with feature `report-html`)".into()))
    }
}

#[allow(dead_code)]
fn write_report(path: &Path, body: &str) -> Result<(), MainError> {
    ts_io::canonical_json::write_atomic(path, body.as_bytes()).map_err(map_output_err)?;
    info!(path = %path.display(), "report written");
    Ok(())
}
