//! crates/ts_cli/src/workbook.rs
//! File-backed document service: records requests in memory and saves the
//! resulting workbook as `workbook.json`.

use std::path::{Path, PathBuf};

use tracing::info;

use ts_core::SheetName;
use ts_io::canonical_json::write_canonical_file;
use ts_io::IoError;
use ts_pipeline::requests::{StructuralOp, ValueWrite};
use ts_pipeline::{DocumentService, MemoryWorkbook, ServiceError, SheetId};

pub struct FileWorkbook {
    path: PathBuf,
    inner: MemoryWorkbook,
}

impl FileWorkbook {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), inner: MemoryWorkbook::new() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cells written more than once during delivery.
    pub fn overwrites(&self) -> usize {
        self.inner.overwrites.len()
    }

    pub fn save(&self) -> Result<(), IoError> {
        write_canonical_file(&self.path, &self.inner.snapshot())?;
        info!(path = %self.path.display(), sheets = self.inner.sheet_names().count(), "workbook saved");
        Ok(())
    }
}

impl DocumentService for FileWorkbook {
    fn ensure_sheet(&mut self, name: &SheetName) -> Result<SheetId, ServiceError> {
        self.inner.ensure_sheet(name)
    }

    fn write_values(&mut self, sheet: SheetId, writes: &[ValueWrite]) -> Result<(), ServiceError> {
        self.inner.write_values(sheet, writes)
    }

    fn apply_structure(&mut self, sheet: SheetId, ops: &[StructuralOp]) -> Result<(), ServiceError> {
        self.inner.apply_structure(sheet, ops)
    }

    fn auto_fit_column(&mut self, sheet: SheetId, col: u32) -> Result<u32, ServiceError> {
        self.inner.auto_fit_column(sheet, col)
    }
}
