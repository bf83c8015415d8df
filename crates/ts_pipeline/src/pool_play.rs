//! crates/ts_pipeline/src/pool_play.rs
//! Pool-play layout of one division sheet.
//!
//! Pools are laid out in label order. Each pool is: label row, standings
//! header row, `teams_per_pool` standings rows, then one block per round
//! (label row doubling as the score header, game rows, spacer rows). The
//! cursor is folded through the pools; nothing else tracks the position.

use tracing::debug;

use ts_algo::formula::bracket::pool_place_value;
use ts_algo::formula::tiebreak::{pool_rank, rank_with_tiebreaker_expr, sorted_standings};
use ts_algo::formula::{score, standings, tiebreak};
use ts_algo::schema::POOL_WINNER_BLOCK;
use ts_algo::{round_robin, Column, ScoreBlock, Side};
use ts_core::determinism::group_by_pool;
use ts_core::{CellRef, LayoutCursor, PoolLabel, RowRange, Team};

use crate::layout::{DivisionPlan, HelperTableRows, LayoutResult, PoolLayout};
use crate::requests::{SheetRequests, StructuralOp};
use crate::PipelineError;

/// Output of pool play: the laid-out pools, the layout result the bracket
/// step extends, and the division's operation log so far.
#[derive(Clone, Debug)]
pub struct PoolPlay {
    pub pools: Vec<PoolLayout>,
    pub layout: LayoutResult,
    pub requests: SheetRequests,
}

pub fn lay_out_pool_play(plan: &DivisionPlan, teams: &[Team]) -> Result<PoolPlay, PipelineError> {
    let mut requests = SheetRequests::new(plan.sheet.clone());
    let groups = group_by_pool(teams);

    let (pools, cursor) = groups.iter().try_fold(
        (Vec::with_capacity(groups.len()), LayoutCursor::default()),
        |(mut acc, cursor), (label, members)| {
            let (pool, next) = emit_pool(plan, label, members, cursor, &mut requests)?;
            acc.push(pool);
            Ok::<_, PipelineError>((acc, next))
        },
    )?;

    let helper = if plan.topology.has_pool_winner_table() && !pools.is_empty() {
        Some(emit_helper_tables(plan, &pools, &mut requests)?)
    } else {
        None
    };
    let start = match helper {
        Some(h) => cursor.at_least(h.block.last + 1),
        None => cursor,
    };

    let team_col = plan.schemas.standings.require(Column::Team)?;
    requests.push(StructuralOp::ResizeColumn { col: team_col, width_px: plan.team_column_width });
    if plan.hide_helper_columns {
        for (first_col, last_col) in plan.schemas.hidden_helper_columns() {
            requests.push(StructuralOp::GroupColumns { first_col, last_col, hidden: true });
        }
    }

    let layout = LayoutResult {
        ordered_pools: pools.iter().map(|p| p.label.clone()).collect(),
        standings_row_ranges: pools.iter().map(|p| p.standings).collect(),
        score_entry_blocks_by_pool: pools.iter().map(|p| (p.label.clone(), p.score)).collect(),
        pool_winner_tables: helper,
        championship_start_row: start.row(),
        bracket_rows: None,
        third_place_game_row: None,
        championship_game_row: None,
    };
    Ok(PoolPlay { pools, layout, requests })
}

/* -------------------------------------------------------------------------- */
/*                                    Pools                                   */
/* -------------------------------------------------------------------------- */

fn emit_pool(
    plan: &DivisionPlan,
    label: &PoolLabel,
    members: &[Team],
    cursor: LayoutCursor,
    req: &mut SheetRequests,
) -> Result<(PoolLayout, LayoutCursor), PipelineError> {
    let topo = &plan.topology;
    let team_col = plan.schemas.standings.require(Column::Team)?;
    if members.len() as u32 > topo.teams_per_pool {
        return Err(PipelineError::Layout(format!(
            "{} of {} has {} teams, room for {}",
            label.heading(),
            plan.division,
            members.len(),
            topo.teams_per_pool
        )));
    }

    let (label_row, c) = cursor.line();
    let (header_row, c) = c.line();
    let (standings, c) = c.reserve(topo.teams_per_pool)?;
    let (score_rows, c) = c.reserve(plan.params.block_height(topo.games_per_round, topo.game_rounds))?;
    let score = ScoreBlock::new(score_rows.first, topo.game_rounds, topo.games_per_round, plan.params);

    let teams: Vec<Team> = members
        .iter()
        .zip(standings.rows())
        .map(|(t, row)| t.placed_at(CellRef::new(row, team_col)))
        .collect();
    let pool = PoolLayout {
        label: label.clone(),
        block: RowRange::new(label_row, score_rows.last)?,
        header_row,
        standings,
        score,
        teams,
    };

    req.header_row(label_row, &[(team_col, label.heading().as_str())]);
    let headers: Vec<(u32, &str)> = plan.schemas.standings.iter().map(|(i, c)| (i, c.label())).collect();
    req.header_row(header_row, &headers);
    emit_standings(plan, &pool, req)?;
    emit_score_block(plan, &pool, req)?;

    debug!(
        division = %plan.division,
        pool = %label,
        first_row = label_row,
        last_row = score_rows.last,
        teams = pool.teams.len(),
        "pool laid out"
    );
    Ok((pool, c))
}

fn emit_standings(plan: &DivisionPlan, pool: &PoolLayout, req: &mut SheetRequests) -> Result<(), PipelineError> {
    let schemas = &plan.schemas;
    let refs = pool.refs();
    let occupied = pool.occupied_rows();
    let deferred_rank = plan.topology.uses_cross_pool_rank();

    for team in &pool.teams {
        let Some(cell) = team.sheet_cell else { continue };
        let row = cell.row;
        for (col, column) in schemas.standings.iter() {
            let at = CellRef::new(row, col);
            if column == Column::Team {
                req.text(at, team.name.as_str());
                continue;
            }
            if column.is_checkbox() {
                req.boolean(at, false);
                continue;
            }
            if column.is_manual() {
                continue;
            }
            let formula = match column {
                // written by the finishing step once every division exists
                Column::Rank if deferred_rank => None,
                Column::OverallRank => None,
                Column::Rank => Some(pool_rank(row, refs.standings, &schemas.standings)),
                // spills down the column from the first row
                Column::SortedStandings => {
                    (row == refs.standings.first).then(|| sorted_standings(refs.standings, &schemas.standings))
                }
                c => standings::aggregate(c, row, &refs, schemas)
                    .or_else(|| tiebreak::helper(c, row, &occupied, &refs, schemas)),
            };
            if let Some(f) = formula {
                req.formula(at, f?);
            }
        }
    }

    if !pool.teams.is_empty() {
        let filled = RowRange::with_len(pool.standings.first, pool.teams.len() as u32)?;
        for column in [Column::Tiebreaker, Column::KicksFromMark] {
            if let Some(col) = schemas.standings.index(column) {
                req.checkbox(filled.column(col));
            }
        }
    }
    Ok(())
}

fn emit_score_block(plan: &DivisionPlan, pool: &PoolLayout, req: &mut SheetRequests) -> Result<(), PipelineError> {
    let sc = &plan.schemas.score;
    let topo = &plan.topology;
    let home_col = sc.require(Column::HomeTeam)?;
    let winner_col = sc.require(Column::Winner)?;
    let (hg, ag) = (sc.require(Column::HomeGoals)?, sc.require(Column::AwayGoals)?);
    let (hf, af) = (sc.require(Column::HomeForfeit)?, sc.require(Column::AwayForfeit)?);
    let kicks = match (sc.index(Column::HomeKicks), sc.index(Column::AwayKicks)) {
        (Some(h), Some(a)) => Some((h, a)),
        _ => None,
    };

    for (r, games) in round_robin(topo.teams_per_pool).iter().enumerate() {
        let r = r as u32;
        if r >= pool.score.rounds {
            break;
        }
        let kick_round = kicks.is_some() && r < topo.shootout_rounds;

        let round_label = format!("Round {}", r + 1);
        let mut headers: Vec<(u32, &str)> = vec![(home_col, round_label.as_str())];
        headers.extend(
            sc.iter()
                .filter(|(_, c)| *c != Column::HomeTeam && !POOL_WINNER_BLOCK.contains(c))
                .filter(|(_, c)| kick_round || !matches!(c, Column::HomeKicks | Column::AwayKicks))
                .map(|(i, c)| (i, c.label())),
        );
        req.header_row(pool.score.round_label_row(r), &headers);

        for (g, pairing) in games.iter().enumerate() {
            let row = pool.score.game_row(r, g as u32);
            let home = pool.teams.get(pairing.home as usize).and_then(|t| t.sheet_cell);
            let away = pool.teams.get(pairing.away as usize).and_then(|t| t.sheet_cell);
            // an unfilled slot makes the game a bye
            let (Some(home), Some(away)) = (home, away) else { continue };

            req.formula(CellRef::new(row, home_col), score::team_ref(home));
            req.formula(CellRef::new(row, sc.require(Column::AwayTeam)?), score::team_ref(away));
            req.formula(CellRef::new(row, winner_col), score::winner(row, sc)?);
            req.boolean(CellRef::new(row, hf), false);
            req.boolean(CellRef::new(row, af), false);
            for side in [Side::Home, Side::Away] {
                let col = sc.require(side.points_column())?;
                req.formula(CellRef::new(row, col), score::game_points(row, side, sc)?);
            }
        }

        let rows = pool.score.round_games(r)?;
        req.number_list(rows.columns(hg, ag), 0, plan.max_goals);
        req.checkbox(rows.columns(hf, af));
        if let (true, Some((hk, ak))) = (kick_round, kicks) {
            req.number_list(rows.columns(hk, ak), 0, plan.max_kicks);
        }
    }
    Ok(())
}

/* -------------------------------------------------------------------------- */
/*                          Pool winners / runners-up                          */
/* -------------------------------------------------------------------------- */

/// Two ranked tables below the last pool's standings, in the pool-winner
/// columns: each pool's first place, then each pool's second place.
fn emit_helper_tables(
    plan: &DivisionPlan,
    pools: &[PoolLayout],
    req: &mut SheetRequests,
) -> Result<HelperTableRows, PipelineError> {
    let st = &plan.schemas.standings;
    let sc = &plan.schemas.score;
    let last = pools
        .last()
        .ok_or_else(|| PipelineError::Layout(format!("{}: helper tables need a pool", plan.division)))?;
    let n = pools.len() as u32;

    let c = LayoutCursor::at(last.standings.last + 1);
    let (winners_header, c) = c.line();
    let (winners, c) = c.reserve(n)?;
    let (runners_header, c) = c.line();
    let (runners_up, _) = c.reserve(n)?;

    let rank_col = sc.require(Column::PoolWinnerRank)?;
    let team_col = sc.require(Column::PoolWinners)?;
    let pts_col = sc.require(Column::PoolWinnerPoints)?;
    let gp_col = sc.require(Column::PoolWinnerGamesPlayed)?;
    let tb_col = sc.require(Column::PoolWinnerTiebreaker)?;

    let sources = [
        (Column::PoolWinners, st.require(Column::Team)?),
        (Column::PoolWinnerPoints, st.require(Column::Points)?),
        (Column::PoolWinnerGamesPlayed, st.require(Column::GamesPlayed)?),
    ];
    let standings_rank = st.require(Column::Rank)?;

    for (header, rows, place, title) in
        [(winners_header, winners, 1, "Pool Winners"), (runners_header, runners_up, 2, "Runners-Up")]
    {
        req.header_row(
            header,
            &[
                (rank_col, Column::PoolWinnerRank.label()),
                (team_col, title),
                (pts_col, Column::PoolWinnerPoints.label()),
                (gp_col, Column::PoolWinnerGamesPlayed.label()),
                (tb_col, Column::PoolWinnerTiebreaker.label()),
            ],
        );
        for (row, pool) in rows.rows().zip(pools) {
            let ranks = pool.standings.column(standings_rank);
            for (target, source) in sources {
                let col = sc.require(target)?;
                req.formula(CellRef::new(row, col), pool_place_value(pool.standings.column(source), ranks, place));
            }
            req.boolean(CellRef::new(row, tb_col), false);
            let rank = rank_with_tiebreaker_expr(
                &CellRef::new(row, pts_col).col_abs(),
                &rows.column(pts_col).abs(),
                &CellRef::new(row, tb_col).col_abs(),
            );
            req.formula(
                CellRef::new(row, rank_col),
                format!("=IF({}=\"\",\"\",{rank})", CellRef::new(row, team_col).col_abs()),
            );
        }
        req.checkbox(rows.column(tb_col));
    }

    let block = RowRange::new(winners_header, runners_up.last)?;
    debug!(division = %plan.division, first_row = block.first, last_row = block.last, "helper tables laid out");
    Ok(HelperTableRows { block, winners, runners_up })
}

/* ---------------------------------- Tests --------------------------------- */
