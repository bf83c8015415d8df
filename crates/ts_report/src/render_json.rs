//! crates/ts_report/src/render_json.rs
//! JSON rendering; field order follows the model's struct layout.

use crate::{ReportError, ReportModel};

pub fn render_json(model: &ReportModel) -> Result<String, ReportError> {
    serde_json::to_string_pretty(model).map_err(|_| ReportError::Template("json_serialize"))
}
