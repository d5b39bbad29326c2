//! Workbook reading via calamine.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use tracing::info;

use crate::rows::records_from_rows;
use crate::{IdentityRecord, Result, RosterError};

/// Number of leading columns that carry record data (A, B, C).
const RECORD_COLUMNS: u32 = 3;

/// Read identity records from the first sheet of a workbook.
///
/// Supports every format calamine detects from the extension
/// (xlsx, xlsm, xlsb, xls, ods). Rows are addressed from A1 so that the
/// header is always sheet row 1, even when the used range starts later.
pub fn read_workbook(path: &Path) -> Result<Vec<IdentityRecord>> {
    let mut workbook = open_workbook_auto(path).map_err(|e| RosterError::Open {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(RosterError::NoSheets)?;

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| RosterError::Sheet {
            sheet: sheet.clone(),
            reason: e.to_string(),
        })?;

    let last_row = range.end().map(|(row, _)| row).unwrap_or(0);
    let rows = (0..=last_row).map(|r| {
        (0..RECORD_COLUMNS)
            .map(|c| range.get_value((r, c)).map(cell_text).unwrap_or_default())
            .collect::<Vec<String>>()
    });

    let records = records_from_rows(rows);
    info!(sheet = %sheet, records = records.len(), "Loaded roster");
    Ok(records)
}

/// Text form of a cell; numbers print without a trailing `.0`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}
