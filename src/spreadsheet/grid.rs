/*!
 * Grid-level operations: text extraction, reinsertion and output assembly.
 */

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::spreadsheet::model::{CellValue, Grid, Sheet, SheetLayout, Workbook};

/// Suffix appended to the base name of translated files
pub const OUTPUT_SUFFIX: &str = " на русском.xlsx";

static XLSX_EXTENSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.xlsx$").unwrap());

/// Collect the distinct text cells that have non-whitespace content.
///
/// Keys are the exact cell text (untrimmed) so they match on reinsertion.
pub fn extract_unique_texts(grid: &Grid) -> HashSet<String> {
    grid.iter()
        .flatten()
        .filter_map(CellValue::as_text)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Replace every text cell that has a translation, leaving all other cells as they are
pub fn apply_translations(grid: &Grid, translations: &HashMap<String, String>) -> Grid {
    grid.iter()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    CellValue::Text(text) => match translations.get(text) {
                        Some(translated) => CellValue::Text(translated.clone()),
                        None => cell.clone(),
                    },
                    other => other.clone(),
                })
                .collect()
        })
        .collect()
}

/// Assemble a single-sheet workbook from a translated grid.
///
/// The sheet keeps the original sheet's origin and layout metadata. Other
/// sheets, styles and formulas of the original are not carried over.
pub fn build_output(original: &Workbook, sheet_name: &str, grid: Grid) -> Workbook {
    let (origin, layout) = original
        .sheet(sheet_name)
        .map(|s| (s.origin, s.layout.clone()))
        .unwrap_or_else(|| ((0, 0), SheetLayout::default()));

    Workbook::new(vec![Sheet {
        name: sheet_name.to_string(),
        origin,
        grid,
        layout,
    }])
}

/// File name for the translated copy: `report.xlsx` -> `report на русском.xlsx`
pub fn derive_output_name(name: &str) -> String {
    format!("{}{}", XLSX_EXTENSION.replace(name, ""), OUTPUT_SUFFIX)
}
