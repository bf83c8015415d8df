//! crates/ts_pipeline/src/finish.rs
//! Finishing step for topologies decided on points (5 and 10 teams).
//!
//! Runs after every division has been laid out. Writes the within-pool rank
//! and the overall rank across all pools of the division, and highlights the
//! overall leader once every game has been played.

use ts_algo::formula::bracket::{games_played_ranges, quota_guard};
use ts_algo::formula::tiebreak::{cross_pool_rank, pool_rank};
use ts_algo::Column;
use ts_core::CellRef;

use crate::layout::{DivisionPlan, LayoutResult, PoolLayout};
use crate::requests::{Highlight, SheetRequests};
use crate::PipelineError;

/// Returns the number of rank cells written; zero for bracket topologies.
pub fn finish_division(
    plan: &DivisionPlan,
    pools: &[PoolLayout],
    layout: &LayoutResult,
    req: &mut SheetRequests,
) -> Result<usize, PipelineError> {
    if !plan.topology.uses_cross_pool_rank() {
        return Ok(0);
    }
    let st = &plan.schemas.standings;
    let rank_col = st.require(Column::Rank)?;
    let overall_col = st.require(Column::OverallRank)?;
    let first_col = st.require(Column::Team)?;

    let mut written = 0;
    for pool in pools {
        for row in pool.occupied_rows() {
            req.formula(CellRef::new(row, rank_col), pool_rank(row, pool.standings, st)?);
            req.formula(
                CellRef::new(row, overall_col),
                cross_pool_rank(row, &layout.standings_row_ranges, st)?,
            );
            written += 2;
        }
    }

    let teams: u32 = pools.iter().map(|p| p.teams.len() as u32).sum();
    let guard = quota_guard(
        &games_played_ranges(&layout.standings_row_ranges, st)?,
        plan.topology.game_quota(),
        teams,
    );
    for pool in pools {
        let top = CellRef::new(pool.standings.first, overall_col).col_abs();
        req.highlight(
            pool.standings.columns(first_col, overall_col),
            format!("=AND({top}=1,{guard})"),
            Highlight::Champion,
        );
    }
    Ok(written)
}
