//! crates/ts_io/src/roster.rs
//! Roster CSV ingestion.
//!
//! Header: `division,team[,pool]`. Divisions keep the order they first
//! appear in; teams keep file order. A blank or missing pool defaults to the
//! first character of the team name.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use ts_core::{DivisionName, PoolLabel, Roster, Team, TeamName};

use crate::{IoError, IoResult};

#[derive(Debug, Deserialize)]
struct RosterRow {
    division: String,
    team: String,
    #[serde(default)]
    pool: Option<String>,
}

/// Parse a roster from any reader.
pub fn read_roster<R: Read>(reader: R) -> IoResult<Roster> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut record = csv::StringRecord::new();
    let mut roster = Roster::default();
    while rdr.read_record(&mut record)? {
        // header is line 1
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row: RosterRow = record
            .deserialize(Some(&headers))
            .map_err(|e| IoError::Roster { line, msg: e.to_string() })?;
        let division: DivisionName = row
            .division
            .parse()
            .map_err(|e| IoError::Roster { line, msg: format!("{e}") })?;
        let name: TeamName = row
            .team
            .parse()
            .map_err(|e| IoError::Roster { line, msg: format!("{e}") })?;
        let team = match row.pool.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            Some(p) => {
                let pool: PoolLabel = p.parse().map_err(|e| IoError::Roster { line, msg: format!("{e}") })?;
                Team::new(division, name, pool)
            }
            None => Team::with_default_pool(division, name),
        };
        roster.push_team(team);
    }

    debug!(divisions = roster.divisions.len(), teams = roster.team_count(), "roster parsed");
    Ok(roster)
}

/// Load a roster file. A missing file is a hard stop.
pub fn load_roster(path: &Path) -> IoResult<Roster> {
    let f = File::open(path).map_err(|e| IoError::Path(format!("roster {}: {e}", path.display())))?;
    let roster = read_roster(f)?;
    info!(path = %path.display(), divisions = roster.divisions.len(), "roster loaded");
    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divisions_in_first_appearance_order() {
        let csv = "division,team,pool\nU12,Hawks,A\nU10,Owls,B\nU12,Kites,B\n";
        let r = read_roster(csv.as_bytes()).unwrap();
        let names: Vec<&str> = r.divisions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["U12", "U10"]);
        assert_eq!(r.divisions[0].teams[1].pool.as_str(), "B");
    }

    #[test]
    fn pool_defaults_from_team_name() {
        let csv = "division,team\nU8, Rockets \nU8,Comets\n";
        let r = read_roster(csv.as_bytes()).unwrap();
        let d = &r.divisions[0];
        assert_eq!(d.teams[0].name.as_str(), "Rockets");
        assert_eq!(d.teams[0].pool.as_str(), "R");
        assert_eq!(d.teams[1].pool.as_str(), "C");
    }

    #[test]
    fn blank_pool_cell_defaults_too() {
        let csv = "division,team,pool\nU8,Rockets,\n";
        let r = read_roster(csv.as_bytes()).unwrap();
        assert_eq!(r.divisions[0].teams[0].pool.as_str(), "R");
    }

    #[test]
    fn empty_team_is_reported_with_line() {
        let csv = "division,team\nU8,Rockets\nU8,  \n";
        match read_roster(csv.as_bytes()) {
            Err(IoError::Roster { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected roster error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_path_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_roster(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, IoError::Path(_)));
    }
}
