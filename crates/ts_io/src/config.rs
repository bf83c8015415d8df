//! crates/ts_io/src/config.rs
//! Tournament configuration (`tournament.json`).
//!
//! Loading is: read → parse → JSON Schema → typed struct → engine checks.
//! Every field has a default, so an absent file and `{}` behave the same.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use ts_core::{DivisionName, LayoutParams, SheetName};

use crate::schema::validate_config_value;
use crate::{IoError, IoResult};

pub const DEFAULT_SHOOTOUT_SHEET: &str = "Shootout";
pub const DEFAULT_TEAM_COLUMN_WIDTH: u32 = 160;
pub const DEFAULT_MAX_GOALS: u32 = 15;
pub const DEFAULT_MAX_KICKS: u32 = 5;
pub const DEFAULT_SHORT_NAME_LEN: u32 = 12;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShootoutConfig {
    pub enabled: bool,
    pub sheet_name: String,
    pub short_name_len: u32,
}

impl Default for ShootoutConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sheet_name: DEFAULT_SHOOTOUT_SHEET.to_string(),
            short_name_len: DEFAULT_SHORT_NAME_LEN,
        }
    }
}

/// Per-division overrides, keyed by division name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DivisionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_column_width: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    pub tournament: String,
    pub layout: LayoutParams,
    pub shootout: ShootoutConfig,
    pub max_goals: u32,
    pub max_kicks: u32,
    pub hide_helper_columns: bool,
    pub default_team_column_width: u32,
    pub divisions: BTreeMap<String, DivisionConfig>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            tournament: "Tournament".to_string(),
            layout: LayoutParams::default(),
            shootout: ShootoutConfig::default(),
            max_goals: DEFAULT_MAX_GOALS,
            max_kicks: DEFAULT_MAX_KICKS,
            hide_helper_columns: true,
            default_team_column_width: DEFAULT_TEAM_COLUMN_WIDTH,
            divisions: BTreeMap::new(),
        }
    }
}

impl TournamentConfig {
    /// Sheet title of a division: override, else the sanitized division name.
    pub fn division_sheet(&self, division: &DivisionName) -> IoResult<SheetName> {
        match self.divisions.get(division.as_str()).and_then(|d| d.sheet_name.as_deref()) {
            Some(s) => s
                .parse()
                .map_err(|e| IoError::Config(format!("divisions.{division}.sheet_name: {e}"))),
            None => Ok(SheetName::for_division(division)),
        }
    }

    pub fn shootout_sheet(&self) -> IoResult<SheetName> {
        self.shootout
            .sheet_name
            .parse()
            .map_err(|e| IoError::Config(format!("shootout.sheet_name: {e}")))
    }

    pub fn team_column_width(&self, division: &DivisionName) -> u32 {
        self.divisions
            .get(division.as_str())
            .and_then(|d| d.team_column_width)
            .unwrap_or(self.default_team_column_width)
    }

    /// Copy of this config with a measured team-column width recorded.
    pub fn with_team_column_width(&self, division: &DivisionName, px: u32) -> TournamentConfig {
        let mut out = self.clone();
        out.divisions.entry(division.as_str().to_string()).or_default().team_column_width = Some(px);
        out
    }

    /// Engine checks beyond the schema: layout params and sheet titles.
    pub fn validate(&self) -> IoResult<()> {
        self.layout
            .validate()
            .map_err(|e| IoError::Config(format!("layout: {e}")))?;
        self.shootout_sheet()?;
        let mut seen: BTreeMap<String, &str> = BTreeMap::new();
        for (div, d) in &self.divisions {
            if let Some(s) = &d.sheet_name {
                let sheet: SheetName = s
                    .parse()
                    .map_err(|e| IoError::Config(format!("divisions.{div}.sheet_name: {e}")))?;
                if let Some(prev) = seen.insert(sheet.as_str().to_string(), div) {
                    return Err(IoError::Config(format!(
                        "divisions {prev} and {div} share sheet name {sheet}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Parse and validate a config document held in memory.
pub fn parse_config_value(v: Value) -> IoResult<TournamentConfig> {
    validate_config_value(&v)?;
    let cfg: TournamentConfig = serde_json::from_value(v)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn parse_config_str(s: &str) -> IoResult<TournamentConfig> {
    let v: Value = serde_json::from_str(s)?;
    parse_config_value(v)
}

/// Load `path`, or defaults when `path` is `None`.
pub fn load_config(path: Option<&Path>) -> IoResult<TournamentConfig> {
    let Some(path) = path else {
        return Ok(TournamentConfig::default());
    };
    let text = fs::read_to_string(path).map_err(|e| IoError::Path(format!("config {}: {e}", path.display())))?;
    let cfg = parse_config_str(&text)?;
    info!(path = %path.display(), divisions = cfg.divisions.len(), "config loaded");
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    fn div(s: &str) -> DivisionName {
        s.parse().unwrap()
    }

    #[test]
    fn defaults_fill_absent_fields() {
        let cfg = parse_config_str(r#"{"max_goals": 9}"#).unwrap();
        assert_eq!(cfg.max_goals, 9);
        assert_eq!(cfg.layout.round_spacing, 2);
        assert!(cfg.shootout.enabled);
        assert_eq!(cfg.team_column_width(&div("U8")), DEFAULT_TEAM_COLUMN_WIDTH);
        assert_eq!(load_config(None).unwrap(), TournamentConfig::default());
    }

    #[test]
    fn division_overrides() {
        let cfg = parse_config_str(
            r#"{"divisions": {"U10 Boys": {"sheet_name": "U10B", "team_column_width": 200}}}"#,
        )
        .unwrap();
        assert_eq!(cfg.division_sheet(&div("U10 Boys")).unwrap().as_str(), "U10B");
        assert_eq!(cfg.division_sheet(&div("U12")).unwrap().as_str(), "U12");
        assert_eq!(cfg.team_column_width(&div("U10 Boys")), 200);
    }

    #[test]
    fn schema_rejects_before_serde() {
        let err = parse_config_str(r#"{"layout": {"round_spacing": 0}}"#).unwrap_err();
        assert!(matches!(err, IoError::Schema(_)));
    }

    #[test]
    fn engine_checks_sheet_titles() {
        let err = parse_config_str(r#"{"shootout": {"sheet_name": "Kicks?"}}"#).unwrap_err();
        assert!(matches!(err, IoError::Config(_)));
        let dup = parse_config_str(
            r#"{"divisions": {"A": {"sheet_name": "S"}, "B": {"sheet_name": "S"}}}"#,
        )
        .unwrap_err();
        assert!(dup.to_string().contains("share sheet name"));
    }

    #[test]
    fn width_retrofit_serializes_override() {
        let cfg = TournamentConfig::default().with_team_column_width(&div("U8"), 143);
        let v = serde_json::to_value(&cfg).unwrap();
        assert_json_eq!(v["divisions"], json!({"U8": {"team_column_width": 143}}));
        // round trip through the schema
        let back = parse_config_value(v).unwrap();
        assert_eq!(back.team_column_width(&div("U8")), 143);
    }
}
