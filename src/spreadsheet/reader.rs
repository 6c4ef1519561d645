/*!
 * xlsx reading.
 *
 * Cell values come from calamine; layout metadata comes from the sheet part
 * itself (see `layout`). Only the first sheet in workbook order is read.
 */

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, Xlsx};
use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use zip::ZipArchive;

use crate::errors::SpreadsheetError;
use crate::spreadsheet::layout::read_sheet_layout;
use crate::spreadsheet::model::{CellValue, Grid, Sheet, Workbook};

/// Read the first sheet of an xlsx document held in memory
pub fn read_workbook(bytes: &[u8]) -> Result<Workbook, SpreadsheetError> {
    let mut excel: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

    let sheet_name = excel
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SpreadsheetError::NoSheets)?;
    let range = excel.worksheet_range(&sheet_name)?;

    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let layout = read_sheet_layout(&mut archive, &sheet_name)?;

    let range_start = range.start();
    let range_end = range.end();

    // Anchor at the declared dimension so leading empty rows/columns survive
    let origin = match (layout.range.map(|r| r.start()), range_start) {
        (Some(dim), Some(used)) => (dim.0.min(used.0), dim.1.min(used.1)),
        (Some(dim), None) => dim,
        (None, Some(used)) => used,
        (None, None) => (0, 0),
    };
    let end = match (layout.range.map(|r| r.end()), range_end) {
        (Some(dim), Some(used)) => Some((dim.0.max(used.0), dim.1.max(used.1))),
        (Some(dim), None) => Some(dim),
        (None, used) => used,
    };

    let mut grid: Grid = Vec::new();
    if let Some(end) = end {
        let rows = (end.0 - origin.0 + 1) as usize;
        let cols = (end.1 - origin.1 + 1) as usize;
        grid = vec![vec![CellValue::Empty; cols]; rows];

        let (start_row, start_col) = range_start.unwrap_or(origin);
        for (row, col, value) in range.used_cells() {
            let r = (start_row as usize + row) - origin.0 as usize;
            let c = (start_col as usize + col) - origin.1 as usize;
            grid[r][c] = convert_value(value);
        }
    }

    debug!(
        "Read sheet '{}' ({} rows) anchored at {:?}",
        sheet_name,
        grid.len(),
        origin
    );

    Ok(Workbook::new(vec![Sheet {
        name: sheet_name,
        origin,
        grid,
        layout,
    }]))
}

/// Read the first sheet of an xlsx file
pub fn read_workbook_file(path: impl AsRef<Path>) -> Result<Workbook, SpreadsheetError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| SpreadsheetError::Read(format!("{}: {}", path.display(), e)))?;
    read_workbook(&bytes)
}

fn convert_value(value: &Data) -> CellValue {
    match value {
        Data::Empty => CellValue::Empty,
        Data::Bool(v) => CellValue::Boolean(*v),
        Data::Int(v) => CellValue::Number(*v as f64),
        Data::Float(v) => CellValue::Number(*v),
        Data::String(v) => CellValue::Text(v.clone()),
        Data::DateTime(v) => CellValue::Temporal(v.as_f64()),
        Data::DateTimeIso(v) => iso_to_serial(v)
            .map(CellValue::Temporal)
            .unwrap_or_else(|| CellValue::Text(v.clone())),
        Data::DurationIso(v) => CellValue::Text(v.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

/// Convert an ISO 8601 date or date-time to an Excel serial number
fn iso_to_serial(value: &str) -> Option<f64> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let datetime = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    let seconds = (datetime - epoch).num_milliseconds() as f64 / 1000.0;
    Some(seconds / 86_400.0)
}
