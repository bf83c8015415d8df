//! crates/ts_pipeline/src/shootout.rs
//! Shootout sheet: one section per division, then an overall-leaders table.
//!
//! Runs after every division exists, because each section mirrors cells of
//! its division sheet. A section is: division label row, header row, one row
//! per (pool, game) with a four-column block per shootout round, a blank
//! row, a display header and one row per team.

use serde::Serialize;
use tracing::{debug, info};

use ts_algo::formula::refs::index_match;
use ts_algo::formula::shootout::{
    kicks_against, leader_rule, mirror, rank, round_total, short_name, sorted, total, winner_rule, RoundBlock,
};
use ts_algo::Column;
use ts_core::{CellRef, DivisionName, LayoutCursor, RowRange, SheetName, Team};

use crate::requests::{Highlight, SheetRequests, StructuralOp};
use crate::{DivisionBuild, PipelineError};

/// Score columns mirrored into a round block, left to right.
const MIRRORED: [Column; 4] = [Column::HomeTeam, Column::HomeKicks, Column::AwayKicks, Column::AwayTeam];

const LEADERS_TITLE: &str = "Overall Leaders";
const NAME_COLUMN_WIDTH: u32 = 180;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShootoutSection {
    pub division: DivisionName,
    pub block: RowRange,
    pub game_rows: RowRange,
    pub team_rows: RowRange,
    pub rounds: u32,
    pub total_col: u32,
    pub short_col: u32,
    pub rank_col: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShootoutSheet {
    pub requests: SheetRequests,
    pub sections: Vec<ShootoutSection>,
    pub leaders: RowRange,
}

/// `None` when no division has shootout rounds.
pub fn lay_out_shootout(
    divisions: &[DivisionBuild],
    sheet: SheetName,
    short_name_len: u32,
) -> Result<Option<ShootoutSheet>, PipelineError> {
    let mut req = SheetRequests::new(sheet);
    let mut sections = Vec::new();
    let mut cursor = LayoutCursor::default();
    for build in divisions {
        if let Some((section, next)) = emit_section(build, cursor, short_name_len, &mut req)? {
            sections.push(section);
            cursor = next;
        }
    }
    if sections.is_empty() {
        return Ok(None);
    }

    let leaders = emit_leaders(&sections, cursor, &mut req)?;
    req.push(StructuralOp::ResizeColumn { col: 0, width_px: NAME_COLUMN_WIDTH });
    info!(sheet = %req.sheet, sections = sections.len(), "shootout sheet laid out");
    Ok(Some(ShootoutSheet { requests: req, sections, leaders }))
}

fn emit_section(
    build: &DivisionBuild,
    cursor: LayoutCursor,
    short_name_len: u32,
    req: &mut SheetRequests,
) -> Result<Option<(ShootoutSection, LayoutCursor)>, PipelineError> {
    let plan = &build.plan;
    let rounds = plan.topology.shootout_rounds;
    if !plan.has_shootout() || rounds == 0 || build.pools.is_empty() {
        return Ok(None);
    }
    let sc = &plan.schemas.score;
    let gpr = plan.topology.games_per_round;

    let (title_row, c) = cursor.line();
    req.header_row(title_row, &[(0, plan.division.as_str())]);

    let (header_row, c) = c.line();
    let mut labels: Vec<(u32, String)> = vec![(0, "Game".to_string())];
    for r in 0..rounds {
        let first = 1 + r * RoundBlock::WIDTH;
        labels.push((first, format!("R{} Home", r + 1)));
        labels.push((first + 1, "Kicks".to_string()));
        labels.push((first + 2, "Kicks".to_string()));
        labels.push((first + 3, format!("R{} Away", r + 1)));
    }
    let refs: Vec<(u32, &str)> = labels.iter().map(|(c, s)| (*c, s.as_str())).collect();
    req.header_row(header_row, &refs);

    let (game_rows, c) = c.reserve(build.pools.len() as u32 * gpr)?;
    let blocks: Vec<RoundBlock> =
        (0..rounds).map(|r| RoundBlock { games: game_rows, first_col: 1 + r * RoundBlock::WIDTH }).collect();
    let mut mirrored_cols = Vec::with_capacity(MIRRORED.len());
    for column in MIRRORED {
        mirrored_cols.push(sc.require(column)?);
    }
    for (p, pool) in build.pools.iter().enumerate() {
        for g in 0..gpr {
            let row = game_rows.first + p as u32 * gpr + g;
            req.text(CellRef::new(row, 0), format!("{} G{}", pool.label.heading(), g + 1));
            for (r, block) in blocks.iter().enumerate() {
                let src_row = pool.score.game_row(r as u32, g);
                for (k, src_col) in mirrored_cols.iter().enumerate() {
                    req.formula(
                        CellRef::new(row, block.first_col + k as u32),
                        mirror(&plan.sheet, CellRef::new(src_row, *src_col)),
                    );
                }
            }
        }
    }

    let c = c.skip(1);
    let total_col = 1 + rounds;
    let short_col = total_col + 1;
    let against_col = total_col + 2;
    let kftm_col = total_col + 3;
    let sorted_col = total_col + 4;
    let rank_col = total_col + 5;

    let (display_header, c) = c.line();
    let mut labels: Vec<(u32, String)> = vec![(0, "Team".to_string())];
    labels.extend((0..rounds).map(|r| (1 + r, format!("R{}", r + 1))));
    for (col, s) in [
        (total_col, "Total"),
        (short_col, "Short"),
        (against_col, "Against"),
        (kftm_col, "KFTM"),
        (sorted_col, "Sorted"),
        (rank_col, "Rank"),
    ] {
        labels.push((col, s.to_string()));
    }
    let refs: Vec<(u32, &str)> = labels.iter().map(|(c, s)| (*c, s.as_str())).collect();
    req.header_row(display_header, &refs);

    let teams: Vec<&Team> = build.pools.iter().flat_map(|p| p.teams.iter()).collect();
    let (team_rows, c) = c.reserve(teams.len() as u32)?;
    let byes = plan.topology.has_byes();
    for (row, team) in team_rows.rows().zip(&teams) {
        let Some(src) = team.sheet_cell else { continue };
        let name = CellRef::new(row, 0);
        req.formula(name, mirror(&plan.sheet, src));
        for (r, block) in blocks.iter().enumerate() {
            req.formula(CellRef::new(row, 1 + r as u32), round_total(name, block, byes));
        }
        req.formula(CellRef::new(row, total_col), total(CellRef::new(row, 1), CellRef::new(row, rounds)));
        req.formula(CellRef::new(row, short_col), short_name(name, short_name_len));
        req.formula(CellRef::new(row, against_col), kicks_against(name, &blocks));
        req.boolean(CellRef::new(row, kftm_col), false);
        if row == team_rows.first {
            req.formula(
                CellRef::new(row, sorted_col),
                sorted(
                    team_rows.column(0),
                    team_rows.column(total_col),
                    team_rows.column(against_col),
                    team_rows.column(kftm_col),
                ),
            );
        }
        req.formula(CellRef::new(row, rank_col), rank(name, team_rows.column(sorted_col)));
    }
    req.checkbox(team_rows.column(kftm_col));

    let top = CellRef::new(team_rows.first, rank_col);
    let display = team_rows.columns(0, rank_col);
    req.highlight(display, leader_rule(top, &blocks), Highlight::Leader);
    req.highlight(display, winner_rule(top, &blocks), Highlight::Winner);

    let section = ShootoutSection {
        division: plan.division.clone(),
        block: RowRange::new(title_row, team_rows.last)?,
        game_rows,
        team_rows,
        rounds,
        total_col,
        short_col,
        rank_col,
    };
    debug!(division = %plan.division, first_row = title_row, last_row = team_rows.last, "shootout section laid out");
    Ok(Some((section, c.skip(1))))
}

/// Division, leader short name and leader total per section.
fn emit_leaders(
    sections: &[ShootoutSection],
    cursor: LayoutCursor,
    req: &mut SheetRequests,
) -> Result<RowRange, PipelineError> {
    let (title_row, c) = cursor.line();
    req.header_row(title_row, &[(0, LEADERS_TITLE)]);
    let (header_row, c) = c.line();
    req.header_row(header_row, &[(0, "Division"), (1, "Leader"), (2, "Total")]);
    let (rows, _) = c.reserve(sections.len() as u32)?;
    for (row, s) in rows.rows().zip(sections) {
        let ranks = s.team_rows.column(s.rank_col).abs();
        req.text(CellRef::new(row, 0), s.division.as_str());
        req.formula(
            CellRef::new(row, 1),
            format!("={}", index_match(&s.team_rows.column(s.short_col).abs(), &ranks, 1)),
        );
        req.formula(
            CellRef::new(row, 2),
            format!("={}", index_match(&s.team_rows.column(s.total_col).abs(), &ranks, 1)),
        );
    }
    Ok(RowRange::new(title_row, rows.last)?)
}
