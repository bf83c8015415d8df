//! crates/ts_pipeline/src/service.rs
//! Document service seam and the in-memory workbook.
//!
//! The engine never talks to a spreadsheet directly. Each sheet's log is
//! handed over in one `write_values` and one `apply_structure` call.

use core::fmt;
use std::collections::BTreeMap;

use serde::Serialize;

use ts_core::{CellRef, SheetName};

use crate::requests::{CellValue, StructuralOp, ValueWrite};

pub type SheetId = u64;

/// Pixels per character and padding used when estimating column widths.
const CHAR_PX: u32 = 7;
const PAD_PX: u32 = 16;
pub const MIN_COLUMN_PX: u32 = 40;
pub const MAX_COLUMN_PX: u32 = 1000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServiceError {
    /// The backing store cannot be reached.
    Unavailable(String),
    UnknownSheet(SheetId),
    Rejected { sheet: String, msg: String },
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Unavailable(m) => write!(f, "document service unavailable: {m}"),
            ServiceError::UnknownSheet(id) => write!(f, "no sheet with id {id}"),
            ServiceError::Rejected { sheet, msg } => write!(f, "sheet {sheet} rejected request: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {}

pub trait DocumentService {
    /// Id of the sheet titled `name`, creating it when absent.
    fn ensure_sheet(&mut self, name: &SheetName) -> Result<SheetId, ServiceError>;
    fn write_values(&mut self, sheet: SheetId, writes: &[ValueWrite]) -> Result<(), ServiceError>;
    fn apply_structure(&mut self, sheet: SheetId, ops: &[StructuralOp]) -> Result<(), ServiceError>;
    /// Fit `col` to its content and return the resulting width in pixels.
    fn auto_fit_column(&mut self, sheet: SheetId, col: u32) -> Result<u32, ServiceError>;
}

/* -------------------------------------------------------------------------- */
/*                              In-memory workbook                             */
/* -------------------------------------------------------------------------- */

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemorySheet {
    pub name: Option<SheetName>,
    pub cells: BTreeMap<CellRef, CellValue>,
    pub structure: Vec<StructuralOp>,
    pub column_widths: BTreeMap<u32, u32>,
}

impl MemorySheet {
    pub fn value(&self, cell: CellRef) -> Option<&CellValue> {
        self.cells.get(&cell)
    }

    /// Rough rendered width of a value in characters.
    fn display_chars(v: &CellValue) -> usize {
        match v {
            CellValue::Text(s) => s.chars().count(),
            CellValue::Number(n) => n.to_string().len(),
            CellValue::Bool(_) => 5,
            // result unknown until the spreadsheet evaluates it
            CellValue::Formula(_) => 0,
        }
    }

    pub fn estimate_width(&self, col: u32) -> u32 {
        let chars = self
            .cells
            .iter()
            .filter(|(c, _)| c.col == col)
            .map(|(_, v)| Self::display_chars(v))
            .max()
            .unwrap_or(0) as u32;
        (chars * CHAR_PX + PAD_PX).clamp(MIN_COLUMN_PX, MAX_COLUMN_PX)
    }
}

/// Records every request. Rejects nothing; a cell written twice is counted
/// in `overwrites`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryWorkbook {
    sheets: Vec<MemorySheet>,
    pub overwrites: Vec<(SheetId, CellRef)>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(&self, name: &SheetName) -> Option<&MemorySheet> {
        self.sheets.iter().find(|s| s.name.as_ref() == Some(name))
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &SheetName> {
        self.sheets.iter().filter_map(|s| s.name.as_ref())
    }

    fn sheet_mut(&mut self, id: SheetId) -> Result<&mut MemorySheet, ServiceError> {
        self.sheets.get_mut(id as usize).ok_or(ServiceError::UnknownSheet(id))
    }

    /// Serializable view: sheets in creation order, cells in row-major order.
    pub fn snapshot(&self) -> WorkbookSnapshot {
        WorkbookSnapshot {
            sheets: self
                .sheets
                .iter()
                .filter_map(|s| {
                    s.name.as_ref().map(|name| SheetSnapshot {
                        name: name.clone(),
                        cells: s.cells.iter().map(|(c, v)| SnapshotCell { a1: c.a1(), value: v.clone() }).collect(),
                        structure: s.structure.clone(),
                        column_widths: s.column_widths.clone(),
                    })
                })
                .collect(),
        }
    }
}

impl DocumentService for MemoryWorkbook {
    fn ensure_sheet(&mut self, name: &SheetName) -> Result<SheetId, ServiceError> {
        if let Some(i) = self.sheets.iter().position(|s| s.name.as_ref() == Some(name)) {
            return Ok(i as SheetId);
        }
        self.sheets.push(MemorySheet { name: Some(name.clone()), ..MemorySheet::default() });
        Ok((self.sheets.len() - 1) as SheetId)
    }

    fn write_values(&mut self, sheet: SheetId, writes: &[ValueWrite]) -> Result<(), ServiceError> {
        let mut twice = Vec::new();
        let s = self.sheet_mut(sheet)?;
        for w in writes {
            if s.cells.insert(w.cell, w.value.clone()).is_some() {
                twice.push((sheet, w.cell));
            }
        }
        self.overwrites.extend(twice);
        Ok(())
    }

    fn apply_structure(&mut self, sheet: SheetId, ops: &[StructuralOp]) -> Result<(), ServiceError> {
        let s = self.sheet_mut(sheet)?;
        for op in ops {
            if let StructuralOp::ResizeColumn { col, width_px } = op {
                s.column_widths.insert(*col, *width_px);
            }
            s.structure.push(op.clone());
        }
        Ok(())
    }

    fn auto_fit_column(&mut self, sheet: SheetId, col: u32) -> Result<u32, ServiceError> {
        let s = self.sheet_mut(sheet)?;
        let px = s.estimate_width(col);
        s.column_widths.insert(col, px);
        Ok(px)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SnapshotCell {
    pub a1: String,
    pub value: CellValue,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SheetSnapshot {
    pub name: SheetName,
    pub cells: Vec<SnapshotCell>,
    pub structure: Vec<StructuralOp>,
    pub column_widths: BTreeMap<u32, u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WorkbookSnapshot {
    pub sheets: Vec<SheetSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> SheetName {
        s.parse().unwrap()
    }

    #[test]
    fn ensure_sheet_is_stable() {
        let mut wb = MemoryWorkbook::new();
        let a = wb.ensure_sheet(&name("U8")).unwrap();
        let b = wb.ensure_sheet(&name("U10")).unwrap();
        assert_ne!(a, b);
        assert_eq!(wb.ensure_sheet(&name("U8")).unwrap(), a);
        assert_eq!(wb.sheet_names().count(), 2);
    }

    #[test]
    fn overwrites_are_counted() {
        let mut wb = MemoryWorkbook::new();
        let id = wb.ensure_sheet(&name("U8")).unwrap();
        let w = |v: &str| ValueWrite { cell: CellRef::new(0, 0), value: CellValue::Text(v.into()) };
        wb.write_values(id, &[w("a")]).unwrap();
        assert!(wb.overwrites.is_empty());
        wb.write_values(id, &[w("b")]).unwrap();
        assert_eq!(wb.overwrites, vec![(id, CellRef::new(0, 0))]);
        assert_eq!(wb.sheet(&name("U8")).unwrap().value(CellRef::new(0, 0)), Some(&CellValue::Text("b".into())));
    }

    #[test]
    fn unknown_sheet_is_an_error() {
        let mut wb = MemoryWorkbook::new();
        assert_eq!(wb.write_values(3, &[]), Err(ServiceError::UnknownSheet(3)));
    }

    #[test]
    fn auto_fit_uses_longest_text() {
        let mut wb = MemoryWorkbook::new();
        let id = wb.ensure_sheet(&name("U8")).unwrap();
        let writes = vec![
            ValueWrite { cell: CellRef::new(0, 0), value: CellValue::Text("Pool A".into()) },
            ValueWrite { cell: CellRef::new(1, 0), value: CellValue::Text("Riverside Rovers".into()) },
            ValueWrite { cell: CellRef::new(1, 1), value: CellValue::Text("x".repeat(80)) },
        ];
        wb.write_values(id, &writes).unwrap();
        assert_eq!(wb.auto_fit_column(id, 0).unwrap(), 16 * 7 + 16);
        assert_eq!(wb.auto_fit_column(id, 5).unwrap(), MIN_COLUMN_PX);
        let snap = wb.snapshot();
        assert_eq!(snap.sheets[0].cells[0].a1, "A1");
        assert_eq!(snap.sheets[0].column_widths.get(&0), Some(&128));
    }
}
