//! crates/ts_io/src/schema.rs
//! Embedded JSON Schema for the tournament config, and validation against it.

use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

use crate::{IoError, IoResult};

/// Schema of `tournament.json`. Every field is optional; absent fields take
/// engine defaults.
pub const CONFIG_SCHEMA: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "title": "Tournament sheet config",
  "type": "object",
  "additionalProperties": false,
  "properties": {
    "tournament": { "type": "string", "minLength": 1, "maxLength": 200 },
    "layout": {
      "type": "object",
      "additionalProperties": false,
      "properties": {
        "round_spacing": { "type": "integer", "minimum": 1, "maximum": 10 }
      }
    },
    "shootout": {
      "type": "object",
      "additionalProperties": false,
      "properties": {
        "enabled": { "type": "boolean" },
        "sheet_name": { "type": "string", "minLength": 1, "maxLength": 100 },
        "short_name_len": { "type": "integer", "minimum": 1, "maximum": 100 }
      }
    },
    "max_goals": { "type": "integer", "minimum": 1, "maximum": 99 },
    "max_kicks": { "type": "integer", "minimum": 1, "maximum": 99 },
    "hide_helper_columns": { "type": "boolean" },
    "default_team_column_width": { "type": "integer", "minimum": 20, "maximum": 1000 },
    "divisions": {
      "type": "object",
      "additionalProperties": {
        "type": "object",
        "additionalProperties": false,
        "properties": {
          "sheet_name": { "type": "string", "minLength": 1, "maxLength": 100 },
          "team_column_width": { "type": "integer", "minimum": 20, "maximum": 1000 }
        }
      }
    }
  }
}"#;

/// Validate a parsed config document; all violations are reported together.
pub fn validate_config_value(instance: &Value) -> IoResult<()> {
    let schema: Value = serde_json::from_str(CONFIG_SCHEMA)?;
    let compiled = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&schema)
        .map_err(|e| IoError::Schema(format!("config schema does not compile: {e}")))?;

    let result = compiled.validate(instance);
    if let Err(errors) = result {
        let mut msgs: Vec<String> = errors
            .map(|e| {
                let at = e.instance_path.to_string();
                let at = if at.is_empty() { "/".to_string() } else { at };
                format!("{at}: {e}")
            })
            .collect();
        msgs.sort();
        return Err(IoError::Schema(msgs.join("; ")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_config_is_valid() {
        validate_config_value(&json!({})).unwrap();
    }

    #[test]
    fn full_config_is_valid() {
        validate_config_value(&json!({
            "tournament": "Spring Cup",
            "layout": { "round_spacing": 2 },
            "shootout": { "enabled": true, "sheet_name": "Shootout", "short_name_len": 12 },
            "max_goals": 15,
            "max_kicks": 5,
            "hide_helper_columns": true,
            "default_team_column_width": 160,
            "divisions": { "U10 Boys": { "sheet_name": "U10B", "team_column_width": 180 } }
        }))
        .unwrap();
    }

    #[test]
    fn violations_point_at_the_field() {
        let err = validate_config_value(&json!({
            "layout": { "round_spacing": 0 },
            "colour": "red"
        }))
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("/layout/round_spacing"), "{msg}");
        assert!(msg.contains("colour"), "{msg}");
    }
}
