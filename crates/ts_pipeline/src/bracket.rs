//! crates/ts_pipeline/src/bracket.rs
//! Bracket emitter: walks a topology's bracket shape below pool play.
//!
//! One emitter serves every shape. A stage subheader is written whenever the
//! stage changes; each slot is one game row whose team cells come from a
//! guarded advancement lookup or from an earlier slot's result.

use tracing::{debug, warn};

use ts_algo::formula::bracket::{
    advancement_lookup, bracket_shape, games_played_ranges, loser_of, quota_guard, winner_of, BracketSlot,
    HelperTable, SlotSource, Stage,
};
use ts_algo::formula::score;
use ts_algo::{Column, Side};
use ts_core::{CellRef, LayoutCursor, RowRange};

use crate::layout::{DivisionPlan, LayoutResult, PoolLayout};
use crate::requests::{Highlight, SheetRequests};
use crate::PipelineError;

/// Score columns labelled on each stage subheader, after the stage name.
const STAGE_HEADER: [Column; 6] = [
    Column::HomeGoals,
    Column::AwayGoals,
    Column::AwayTeam,
    Column::Winner,
    Column::HomeForfeit,
    Column::AwayForfeit,
];

/// Lay out the bracket and return `layout` with the bracket rows recorded.
/// Topologies decided on points come back unchanged.
pub fn lay_out_bracket(
    plan: &DivisionPlan,
    pools: &[PoolLayout],
    mut layout: LayoutResult,
    req: &mut SheetRequests,
) -> Result<LayoutResult, PipelineError> {
    if !plan.topology.has_bracket() {
        return Ok(layout);
    }
    let shape = bracket_shape(&plan.topology);
    let sc = &plan.schemas.score;
    let home_col = sc.require(Column::HomeTeam)?;

    let teams_in_scope: u32 = pools.iter().map(|p| p.teams.len() as u32).sum();
    let guard = quota_guard(
        &games_played_ranges(&layout.standings_row_ranges, &plan.schemas.standings)?,
        plan.topology.game_quota(),
        teams_in_scope,
    );

    let mut header: Vec<(u32, &str)> = Vec::with_capacity(STAGE_HEADER.len() + 1);
    for c in STAGE_HEADER {
        header.push((sc.require(c)?, c.label()));
    }

    let (label_row, mut cursor) = LayoutCursor::at(layout.championship_start_row).line();
    req.header_row(label_row, &[(home_col, "Finals")]);

    let mut rows: Vec<u32> = Vec::with_capacity(shape.len());
    let mut stage: Option<Stage> = None;
    for (i, slot) in shape.iter().enumerate() {
        if stage != Some(slot.stage) {
            let (sub, next) = cursor.line();
            cursor = next;
            let mut labels = vec![(home_col, slot.stage.label())];
            labels.extend(header.iter().copied());
            req.header_row(sub, &labels);
            stage = Some(slot.stage);
        }
        let (row, next) = cursor.line();
        cursor = next;
        emit_game(plan, pools, &layout, &guard, &rows, i, slot, row, req)?;
        rows.push(row);
    }

    let last = rows.last().copied().unwrap_or(label_row);
    layout.bracket_rows = Some(RowRange::new(label_row, last)?);
    layout.championship_game_row = slot_row(&shape, &rows, |s| s == Stage::Final);
    layout.third_place_game_row =
        slot_row(&shape, &rows, |s| s == Stage::ThirdPlace).or_else(|| slot_row(&shape, &rows, |s| s == Stage::Consolation));

    for (slot, &row) in shape.iter().zip(&rows) {
        let hl = if slot.stage == Stage::Final {
            Highlight::Champion
        } else if Some(row) == layout.third_place_game_row {
            Highlight::ThirdPlace
        } else {
            Highlight::GameWinner
        };
        highlight_winner(plan, row, hl, req)?;
    }

    debug!(
        division = %plan.division,
        first_row = label_row,
        last_row = last,
        games = rows.len(),
        "bracket laid out"
    );
    Ok(layout)
}

/// Row of the last slot whose stage matches.
fn slot_row(shape: &[BracketSlot], rows: &[u32], pred: impl Fn(Stage) -> bool) -> Option<u32> {
    shape.iter().zip(rows).filter(|(s, _)| pred(s.stage)).map(|(_, r)| *r).last()
}

#[allow(clippy::too_many_arguments)]
fn emit_game(
    plan: &DivisionPlan,
    pools: &[PoolLayout],
    layout: &LayoutResult,
    guard: &str,
    earlier: &[u32],
    index: usize,
    slot: &BracketSlot,
    row: u32,
    req: &mut SheetRequests,
) -> Result<(), PipelineError> {
    let sc = &plan.schemas.score;
    for (side, source) in [(Side::Home, slot.home), (Side::Away, slot.away)] {
        let col = sc.require(side.team_column())?;
        match source_formula(plan, pools, layout, guard, earlier, source)? {
            Some(f) => req.formula(CellRef::new(row, col), f),
            None => warn!(
                division = %plan.division,
                slot = index,
                ?source,
                "bracket source not laid out; team cell left blank"
            ),
        }
    }
    req.formula(CellRef::new(row, sc.require(Column::Winner)?), score::winner(row, sc)?);
    let (hf, af) = (sc.require(Column::HomeForfeit)?, sc.require(Column::AwayForfeit)?);
    req.checkbox_cells(RowRange::single(row).columns(hf, af));
    let (hg, ag) = (sc.require(Column::HomeGoals)?, sc.require(Column::AwayGoals)?);
    req.number_list(RowRange::single(row).columns(hg, ag), 0, plan.max_goals);
    Ok(())
}

fn source_formula(
    plan: &DivisionPlan,
    pools: &[PoolLayout],
    layout: &LayoutResult,
    guard: &str,
    earlier: &[u32],
    source: SlotSource,
) -> Result<Option<String>, PipelineError> {
    let st = &plan.schemas.standings;
    let sc = &plan.schemas.score;
    let f = match source {
        SlotSource::PoolRank { pool, rank } => match pools.get(pool as usize) {
            Some(p) => Some(advancement_lookup(
                guard,
                p.standings.column(st.require(Column::Team)?),
                p.standings.column(st.require(Column::Rank)?),
                rank,
            )),
            None => None,
        },
        SlotSource::HelperRank { table, rank } => match layout.pool_winner_tables {
            Some(h) => {
                let rows = match table {
                    HelperTable::PoolWinners => h.winners,
                    HelperTable::RunnersUp => h.runners_up,
                };
                Some(advancement_lookup(
                    guard,
                    rows.column(sc.require(Column::PoolWinners)?),
                    rows.column(sc.require(Column::PoolWinnerRank)?),
                    rank,
                ))
            }
            None => None,
        },
        SlotSource::WinnerOf { slot } => earlier.get(slot).map(|r| winner_of(*r, sc)).transpose()?,
        SlotSource::LoserOf { slot } => earlier.get(slot).map(|r| loser_of(*r, sc)).transpose()?,
    };
    Ok(f)
}

/// Highlight the home cell when home won, the away cell when away won.
fn highlight_winner(plan: &DivisionPlan, row: u32, hl: Highlight, req: &mut SheetRequests) -> Result<(), PipelineError> {
    let sc = &plan.schemas.score;
    let w = CellRef::new(row, sc.require(Column::Winner)?).abs();
    for side in [Side::Home, Side::Away] {
        let col = sc.require(side.team_column())?;
        req.highlight(RowRange::single(row).column(col), format!("={w}=\"{}\"", side.token()), hl);
    }
    Ok(())
}

/* ---------------------------------- Tests --------------------------------- */
