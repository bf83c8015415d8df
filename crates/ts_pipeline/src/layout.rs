//! crates/ts_pipeline/src/layout.rs
//! Per-division plan and the layout result handed between generators.
//!
//! The plan fixes everything a division's generators need before any row is
//! reserved: topology, schemas, layout params and config-derived limits.
//! `LayoutResult` is produced by pool play, extended by the bracket step and
//! read by finishing and the shootout sheet.

use std::collections::BTreeMap;

use serde::Serialize;

use ts_algo::{resolve_checked, Fallback, PoolRefs, SchemaSet, ScoreBlock, TournamentTopology};
use ts_core::{Division, DivisionName, LayoutParams, PoolLabel, RowRange, SheetName, Team};
use ts_io::config::TournamentConfig;

use crate::PipelineError;

/// Everything fixed for one division before layout.
#[derive(Clone, Debug)]
pub struct DivisionPlan {
    pub division: DivisionName,
    pub sheet: SheetName,
    pub topology: TournamentTopology,
    pub fallback: Fallback,
    pub schemas: SchemaSet,
    pub params: LayoutParams,
    pub max_goals: u32,
    pub max_kicks: u32,
    pub hide_helper_columns: bool,
    pub team_column_width: u32,
}

impl DivisionPlan {
    pub fn new(division: &Division, cfg: &TournamentConfig) -> Result<Self, PipelineError> {
        let (topology, fallback) = resolve_checked(division.team_count() as u32);
        let schemas = SchemaSet::for_topology(&topology, cfg.shootout.enabled)?;
        Ok(Self {
            division: division.name.clone(),
            sheet: cfg.division_sheet(&division.name)?,
            topology,
            fallback,
            schemas,
            params: cfg.layout,
            max_goals: cfg.max_goals,
            max_kicks: cfg.max_kicks,
            hide_helper_columns: cfg.hide_helper_columns,
            team_column_width: cfg.team_column_width(&division.name),
        })
    }

    /// Kick columns exist on this division's score sheet.
    #[inline]
    pub fn has_shootout(&self) -> bool {
        self.schemas.score.has(ts_algo::Column::HomeKicks)
    }
}

/// One laid-out pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PoolLayout {
    pub label: PoolLabel,
    /// Label row through the last spacer row of the score block.
    pub block: RowRange,
    pub header_row: u32,
    pub standings: RowRange,
    pub score: ScoreBlock,
    /// Teams in standings order, placed.
    pub teams: Vec<Team>,
}

impl PoolLayout {
    #[inline]
    pub fn refs(&self) -> PoolRefs {
        PoolRefs { standings: self.standings, score: self.score }
    }

    /// Standings rows holding a team.
    pub fn occupied_rows(&self) -> Vec<u32> {
        self.teams.iter().filter_map(|t| t.sheet_cell.map(|c| c.row)).collect()
    }
}

/// Rows of the pool-winners and runners-up tables (3-pool topology).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct HelperTableRows {
    /// First header row through the last runners-up row.
    pub block: RowRange,
    pub winners: RowRange,
    pub runners_up: RowRange,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LayoutResult {
    pub ordered_pools: Vec<PoolLabel>,
    pub standings_row_ranges: Vec<RowRange>,
    pub score_entry_blocks_by_pool: BTreeMap<PoolLabel, ScoreBlock>,
    pub pool_winner_tables: Option<HelperTableRows>,
    /// First row the bracket may use.
    pub championship_start_row: u32,
    pub bracket_rows: Option<RowRange>,
    /// Third-place game row, or the consolation row when there is none.
    pub third_place_game_row: Option<u32>,
    pub championship_game_row: Option<u32>,
}

impl LayoutResult {
    /// Row spans reserved on the sheet, labelled, in layout order. Helper
    /// tables sit beside the last score block in other columns and are
    /// reported separately.
    pub fn reserved_spans(&self, pools: &[PoolLayout]) -> Vec<(String, RowRange)> {
        let mut out = Vec::new();
        for p in pools {
            if let Ok(rows) = RowRange::new(p.block.first, p.standings.last) {
                out.push((format!("{} standings", p.label.heading()), rows));
            }
            if let Ok(rows) = p.score.rows() {
                out.push((format!("{} games", p.label.heading()), rows));
            }
        }
        if let Some(b) = self.bracket_rows {
            out.push(("bracket".to_string(), b));
        }
        out
    }
}
