//! crates/ts_pipeline/src/validate.rs
//! Roster and config checks before any row is reserved.
//! Deterministic output: issues are sorted by code, location, message.

use core::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use ts_algo::{resolve_checked, Fallback};
use ts_core::determinism::group_by_pool;
use ts_core::{Division, DivisionName, PoolLabel, Roster, SheetName, TeamName};
use ts_io::config::TournamentConfig;

/// Issue severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// Where the issue occurred.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityRef {
    Root,
    Division { division: DivisionName },
    Pool { division: DivisionName, pool: PoolLabel },
    Team { division: DivisionName, team: TeamName },
    Sheet { sheet: SheetName },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    #[serde(rename = "where")]
    pub where_: EntityRef,
}

/// pass = no Error.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub pass: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }
}

/// Labels written into the team columns of the score-entry area. A team of
/// the same name would be counted by the standings aggregates.
fn is_reserved_name(name: &str) -> bool {
    if matches!(name, "Home" | "Away") {
        return true;
    }
    match name.strip_prefix("Round ") {
        Some(n) => !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

/// Top-level entry point.
pub fn validate(roster: &Roster, cfg: &TournamentConfig) -> ValidationReport {
    let mut issues: Vec<ValidationIssue> = Vec::new();

    if roster.divisions.is_empty() {
        issues.push(ValidationIssue {
            severity: Severity::Error,
            code: "roster.empty",
            message: "roster has no divisions".to_string(),
            where_: EntityRef::Root,
        });
    }
    for d in &roster.divisions {
        issues.extend(check_division(d));
    }
    issues.extend(check_sheets(roster, cfg));
    issues.extend(check_config_divisions(roster, cfg));

    sort_issues_stably(&mut issues);
    ValidationReport {
        pass: !issues.iter().any(|i| i.severity == Severity::Error),
        issues,
    }
}

/* -------------------------------------------------------------------------- */
/*                                  Divisions                                 */
/* -------------------------------------------------------------------------- */

fn check_division(d: &Division) -> Vec<ValidationIssue> {
    let mut out = Vec::new();
    let div = || EntityRef::Division { division: d.name.clone() };

    if d.teams.is_empty() {
        out.push(ValidationIssue {
            severity: Severity::Error,
            code: "division.empty",
            message: format!("division {} has no teams", d.name),
            where_: div(),
        });
        return out;
    }

    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for t in &d.teams {
        let team = || EntityRef::Team { division: d.name.clone(), team: t.name.clone() };
        if !seen.insert(t.name.as_str()) {
            out.push(ValidationIssue {
                severity: Severity::Error,
                code: "team.duplicate",
                message: format!("team {} appears more than once", t.name),
                where_: team(),
            });
        }
        if is_reserved_name(t.name.as_str()) {
            out.push(ValidationIssue {
                severity: Severity::Error,
                code: "team.reserved_name",
                message: format!("team name {} collides with a sheet label", t.name),
                where_: team(),
            });
        }
    }

    let (topology, fallback) = resolve_checked(d.team_count() as u32);
    if let Fallback::DefaultedToTwelve { requested } = fallback {
        out.push(ValidationIssue {
            severity: Severity::Warning,
            code: "topology.fallback",
            message: format!("{requested} teams has no dedicated layout; using the 12-team layout"),
            where_: div(),
        });
    }

    let pools = group_by_pool(&d.teams);
    let pool_count = pools.len() as u32;
    if pool_count > topology.pool_count {
        out.push(ValidationIssue {
            severity: Severity::Error,
            code: "pool.too_many",
            message: format!("{pool_count} pools given, layout has {}", topology.pool_count),
            where_: div(),
        });
    } else if pool_count < topology.pool_count {
        out.push(ValidationIssue {
            severity: Severity::Warning,
            code: "pool.too_few",
            message: format!("{pool_count} pools given, layout has {}", topology.pool_count),
            where_: div(),
        });
    }
    for (label, teams) in &pools {
        let n = teams.len() as u32;
        let at = || EntityRef::Pool { division: d.name.clone(), pool: label.clone() };
        match n.cmp(&topology.teams_per_pool) {
            Ordering::Greater => out.push(ValidationIssue {
                severity: Severity::Error,
                code: "pool.oversize",
                message: format!("{} has {n} teams, at most {}", label.heading(), topology.teams_per_pool),
                where_: at(),
            }),
            Ordering::Less => out.push(ValidationIssue {
                severity: Severity::Warning,
                code: "pool.undersize",
                message: format!("{} has {n} teams, layout expects {}", label.heading(), topology.teams_per_pool),
                where_: at(),
            }),
            Ordering::Equal => {}
        }
    }
    out
}

/* -------------------------------------------------------------------------- */
/*                                   Sheets                                   */
/* -------------------------------------------------------------------------- */

fn check_sheets(roster: &Roster, cfg: &TournamentConfig) -> Vec<ValidationIssue> {
    let mut out = Vec::new();
    let mut owners: BTreeMap<String, &DivisionName> = BTreeMap::new();
    for d in &roster.divisions {
        let sheet = match cfg.division_sheet(&d.name) {
            Ok(s) => s,
            Err(e) => {
                out.push(ValidationIssue {
                    severity: Severity::Error,
                    code: "sheet.invalid",
                    message: e.to_string(),
                    where_: EntityRef::Division { division: d.name.clone() },
                });
                continue;
            }
        };
        if let Some(prev) = owners.insert(sheet.as_str().to_string(), &d.name) {
            out.push(ValidationIssue {
                severity: Severity::Error,
                code: "sheet.duplicate",
                message: format!("divisions {prev} and {} both map to sheet {sheet}", d.name),
                where_: EntityRef::Sheet { sheet },
            });
        }
    }
    if cfg.shootout.enabled {
        if let Ok(sheet) = cfg.shootout_sheet() {
            if let Some(div) = owners.get(sheet.as_str()) {
                out.push(ValidationIssue {
                    severity: Severity::Error,
                    code: "sheet.duplicate",
                    message: format!("shootout sheet {sheet} is also the sheet of division {div}"),
                    where_: EntityRef::Sheet { sheet },
                });
            }
        }
    }
    out
}

fn check_config_divisions(roster: &Roster, cfg: &TournamentConfig) -> Vec<ValidationIssue> {
    cfg.divisions
        .keys()
        .filter(|k| !roster.divisions.iter().any(|d| d.name.as_str() == k.as_str()))
        .map(|k| ValidationIssue {
            severity: Severity::Warning,
            code: "config.unknown_division",
            message: format!("config overrides division {k}, which is not in the roster"),
            where_: EntityRef::Root,
        })
        .collect()
}

/* -------------------------------------------------------------------------- */
/*                                  Ordering                                  */
/* -------------------------------------------------------------------------- */

fn sort_issues_stably(issues: &mut [ValidationIssue]) {
    issues.sort_by(|a, b| {
        a.code
            .cmp(b.code)
            .then_with(|| cmp_where(&a.where_, &b.where_))
            .then_with(|| a.message.cmp(&b.message))
    });
}

fn where_key(w: &EntityRef) -> (u8, &str, &str) {
    match w {
        EntityRef::Root => (0, "", ""),
        EntityRef::Division { division } => (1, division.as_str(), ""),
        EntityRef::Pool { division, pool } => (2, division.as_str(), pool.as_str()),
        EntityRef::Team { division, team } => (3, division.as_str(), team.as_str()),
        EntityRef::Sheet { sheet } => (4, sheet.as_str(), ""),
    }
}

fn cmp_where(a: &EntityRef, b: &EntityRef) -> Ordering {
    where_key(a).cmp(&where_key(b))
}

/* ---------------------------------- Tests --------------------------------- */
