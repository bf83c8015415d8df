//! crates/ts_core/src/entities.rs
//! Roster entities: teams grouped into divisions and pools.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::grid::CellRef;
use crate::ids::{DivisionName, PoolLabel, TeamName};

/// One team as supplied by the roster.
///
/// `sheet_cell` stays `None` until pool-play layout places the team's
/// standings row; layout returns the team with the cell filled in.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Team {
    pub division: DivisionName,
    pub name: TeamName,
    pub pool: PoolLabel,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub sheet_cell: Option<CellRef>,
}

impl Team {
    pub fn new(division: DivisionName, name: TeamName, pool: PoolLabel) -> Self {
        Self { division, name, pool, sheet_cell: None }
    }

    /// Team with the pool defaulted from its name.
    pub fn with_default_pool(division: DivisionName, name: TeamName) -> Self {
        let pool = PoolLabel::from_team_name(&name);
        Self::new(division, name, pool)
    }

    /// Copy of this team placed at `cell`.
    pub fn placed_at(&self, cell: CellRef) -> Team {
        Team { sheet_cell: Some(cell), ..self.clone() }
    }

    #[inline]
    pub fn is_placed(&self) -> bool {
        self.sheet_cell.is_some()
    }
}

/// Teams of one division in roster order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Division {
    pub name: DivisionName,
    pub teams: Vec<Team>,
}

impl Division {
    pub fn new(name: DivisionName) -> Self {
        Self { name, teams: Vec::new() }
    }

    #[inline]
    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn team(&self, name: &TeamName) -> Option<&Team> {
        self.teams.iter().find(|t| &t.name == name)
    }
}

/// Divisions in first-appearance order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Roster {
    pub divisions: Vec<Division>,
}

impl Roster {
    pub fn division(&self, name: &DivisionName) -> Option<&Division> {
        self.divisions.iter().find(|d| &d.name == name)
    }

    /// Append a team, opening its division on first sight.
    pub fn push_team(&mut self, team: Team) {
        match self.divisions.iter_mut().find(|d| d.name == team.division) {
            Some(d) => d.teams.push(team),
            None => {
                let mut d = Division::new(team.division.clone());
                d.teams.push(team);
                self.divisions.push(d);
            }
        }
    }

    pub fn team_count(&self) -> usize {
        self.divisions.iter().map(Division::team_count).sum()
    }
}
