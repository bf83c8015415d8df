//! crates/ts_pipeline/src/requests.rs
//! Operation log of one sheet: value writes and structural operations.
//!
//! The log only grows during a run. Writes carry explicit coordinates, so
//! the order of entries never changes what lands in a cell.

use serde::Serialize;

use ts_core::{CellRef, GridRange, RowRange, SheetName};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Text(String),
    Number(i64),
    Bool(bool),
    Formula(String),
}

impl CellValue {
    /// Text as a spreadsheet would receive it.
    pub fn render(&self) -> String {
        match self {
            CellValue::Text(s) | CellValue::Formula(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Bool(true) => "TRUE".to_string(),
            CellValue::Bool(false) => "FALSE".to_string(),
        }
    }

    pub fn as_formula(&self) -> Option<&str> {
        match self {
            CellValue::Formula(f) => Some(f),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValueWrite {
    pub cell: CellRef,
    pub value: CellValue,
}

/// Visual treatments for conditional formatting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    /// Current leader, results still missing.
    Leader,
    /// Final winner.
    Winner,
    Champion,
    ThirdPlace,
    /// Winning side of any other bracket game.
    GameWinner,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationRule {
    Checkbox,
    /// Dropdown of whole numbers `min..=max`.
    NumberList { min: u32, max: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StructuralOp {
    ResizeColumn { col: u32, width_px: u32 },
    ConditionalFormat { range: GridRange, formula: String, highlight: Highlight },
    DataValidation { range: GridRange, rule: ValidationRule },
    GroupColumns { first_col: u32, last_col: u32, hidden: bool },
    Bold { range: GridRange },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SheetRequests {
    pub sheet: SheetName,
    pub values: Vec<ValueWrite>,
    pub structure: Vec<StructuralOp>,
}

impl SheetRequests {
    pub fn new(sheet: SheetName) -> Self {
        Self { sheet, values: Vec::new(), structure: Vec::new() }
    }

    #[inline]
    pub fn write(&mut self, cell: CellRef, value: CellValue) {
        self.values.push(ValueWrite { cell, value });
    }

    pub fn text(&mut self, cell: CellRef, s: impl Into<String>) {
        self.write(cell, CellValue::Text(s.into()));
    }

    pub fn formula(&mut self, cell: CellRef, f: String) {
        self.write(cell, CellValue::Formula(f));
    }

    pub fn boolean(&mut self, cell: CellRef, b: bool) {
        self.write(cell, CellValue::Bool(b));
    }

    #[inline]
    pub fn push(&mut self, op: StructuralOp) {
        self.structure.push(op);
    }

    /// Labels written left to right from `first_col`, made bold.
    pub fn header_row(&mut self, row: u32, labels: &[(u32, &str)]) {
        if labels.is_empty() {
            return;
        }
        let mut lo = u32::MAX;
        let mut hi = 0;
        for (col, label) in labels {
            self.text(CellRef::new(row, *col), *label);
            lo = lo.min(*col);
            hi = hi.max(*col);
        }
        self.bold(RowRange::single(row).columns(lo, hi));
    }

    pub fn bold(&mut self, range: GridRange) {
        self.push(StructuralOp::Bold { range });
    }

    pub fn checkbox(&mut self, range: GridRange) {
        self.push(StructuralOp::DataValidation { range, rule: ValidationRule::Checkbox });
    }

    /// Checkbox cells start unchecked.
    pub fn checkbox_cells(&mut self, range: GridRange) {
        for cell in range.cells().collect::<Vec<_>>() {
            self.boolean(cell, false);
        }
        self.checkbox(range);
    }

    pub fn number_list(&mut self, range: GridRange, min: u32, max: u32) {
        self.push(StructuralOp::DataValidation { range, rule: ValidationRule::NumberList { min, max } });
    }

    pub fn highlight(&mut self, range: GridRange, formula: String, highlight: Highlight) {
        self.push(StructuralOp::ConditionalFormat { range, formula, highlight });
    }

    /// Last value written to `cell`.
    pub fn value_at(&self, cell: CellRef) -> Option<&CellValue> {
        self.values.iter().rev().find(|w| w.cell == cell).map(|w| &w.value)
    }

    pub fn formula_at(&self, cell: CellRef) -> Option<&str> {
        self.value_at(cell).and_then(CellValue::as_formula)
    }

    pub fn formulas(&self) -> impl Iterator<Item = (CellRef, &str)> {
        self.values.iter().filter_map(|w| w.value.as_formula().map(|f| (w.cell, f)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> SheetRequests {
        SheetRequests::new("U8".parse().unwrap())
    }

    #[test]
    fn header_row_writes_and_bolds_span() {
        let mut s = sheet();
        s.header_row(4, &[(0, "Team"), (1, "GP"), (7, "Points")]);
        assert_eq!(s.values.len(), 3);
        assert_eq!(
            s.structure,
            vec![StructuralOp::Bold { range: RowRange::single(4).columns(0, 7) }]
        );
    }

    #[test]
    fn checkbox_cells_start_false() {
        let mut s = sheet();
        s.checkbox_cells(RowRange::new(2, 3).unwrap().columns(5, 6));
        assert_eq!(s.values.len(), 4);
        assert!(s.values.iter().all(|w| w.value == CellValue::Bool(false)));
        assert_eq!(s.structure.len(), 1);
    }

    #[test]
    fn lookups_see_latest_write() {
        let mut s = sheet();
        let c = CellRef::new(0, 0);
        s.text(c, "a");
        s.formula(c, "=1".into());
        assert_eq!(s.formula_at(c), Some("=1"));
        assert_eq!(s.formulas().count(), 1);
    }

    #[test]
    fn values_serialize_tagged() {
        let v = serde_json::to_value(CellValue::Formula("=A1".into())).unwrap();
        assert_eq!(v, serde_json::json!({"kind": "formula", "value": "=A1"}));
        assert_eq!(CellValue::Bool(true).render(), "TRUE");
    }
}
