/*!
 * In-memory workbook model.
 *
 * A deliberately small model: cell values, a row-major grid anchored at an
 * origin cell, and the layout metadata that survives translation (used
 * range, column widths and row heights). Styles, formulas and merged
 * regions are not represented.
 */

use std::fmt;

use crate::errors::SpreadsheetError;

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Text content, the only kind that is ever translated
    Text(String),
    /// Numeric content
    Number(f64),
    /// Boolean content
    Boolean(bool),
    /// Date or time as an Excel serial number
    Temporal(f64),
    /// No value
    Empty,
}

impl CellValue {
    /// Text content of a text cell
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Whether the cell holds no value
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<&str> for CellValue {
    fn from(text: &str) -> Self {
        CellValue::Text(text.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

/// Row-major cell grid; rows may have different lengths
pub type Grid = Vec<Vec<CellValue>>;

/// Rectangular cell range with zero-based inclusive bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl CellRange {
    /// Create a range, normalising the corner order
    pub fn new(start: (u32, u32), end: (u32, u32)) -> Self {
        Self {
            start_row: start.0.min(end.0),
            start_col: start.1.min(end.1),
            end_row: start.0.max(end.0),
            end_col: start.1.max(end.1),
        }
    }

    /// Parse an A1-style reference such as `A1:D10` or `B2`
    pub fn parse(reference: &str) -> Option<Self> {
        let mut parts = reference.split(':');
        let start = parse_cell_ref(parts.next()?)?;
        let end = match parts.next() {
            Some(part) => parse_cell_ref(part)?,
            None => start,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(start, end))
    }

    /// Top-left corner as (row, col)
    pub fn start(&self) -> (u32, u32) {
        (self.start_row, self.start_col)
    }

    /// Bottom-right corner as (row, col)
    pub fn end(&self) -> (u32, u32) {
        (self.end_row, self.end_col)
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = cell_ref(self.start_row, self.start_col);
        if self.start() == self.end() {
            write!(f, "{}", start)
        } else {
            write!(f, "{}:{}", start, cell_ref(self.end_row, self.end_col))
        }
    }
}

/// Width settings for a span of columns (1-based, inclusive, as stored in the file)
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub min: u32,
    pub max: u32,
    pub width: Option<f64>,
    pub custom_width: bool,
    pub hidden: bool,
}

/// Height settings for a single row (1-based, as stored in the file)
#[derive(Debug, Clone, PartialEq)]
pub struct RowInfo {
    pub index: u32,
    pub height: Option<f64>,
    pub custom_height: bool,
    pub hidden: bool,
}

/// Layout metadata carried from the input sheet to the output sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetLayout {
    /// Declared used range (`<dimension ref>`)
    pub range: Option<CellRange>,
    /// Column widths (`<cols>`)
    pub columns: Option<Vec<ColumnInfo>>,
    /// Row heights (`<row ht>`)
    pub rows: Option<Vec<RowInfo>>,
}

/// A single worksheet
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    /// Sheet name as shown on the tab
    pub name: String,
    /// Zero-based (row, col) of the grid's top-left cell
    pub origin: (u32, u32),
    /// Cell values
    pub grid: Grid,
    /// Layout metadata
    pub layout: SheetLayout,
}

impl Sheet {
    /// Create a sheet anchored at A1 with no layout metadata
    pub fn new(name: impl Into<String>, grid: Grid) -> Self {
        Self {
            name: name.into(),
            origin: (0, 0),
            grid,
            layout: SheetLayout::default(),
        }
    }

    /// Range actually covered by the grid, if it has any cells
    pub fn grid_range(&self) -> Option<CellRange> {
        let rows = self.grid.len() as u32;
        let cols = self.grid.iter().map(Vec::len).max().unwrap_or(0) as u32;
        if rows == 0 || cols == 0 {
            return None;
        }
        let (row, col) = self.origin;
        Some(CellRange::new((row, col), (row + rows - 1, col + cols - 1)))
    }
}

/// A workbook: an ordered list of sheets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Create a workbook from sheets
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// First sheet in workbook order
    pub fn first_sheet(&self) -> Result<&Sheet, SpreadsheetError> {
        self.sheets.first().ok_or(SpreadsheetError::NoSheets)
    }

    /// Find a sheet by name
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// Convert a zero-based column index to letters (0 -> A, 26 -> AA)
pub(crate) fn col_to_letters(mut col: u32) -> String {
    let mut result = Vec::new();
    loop {
        result.push(b'A' + (col % 26) as u8);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    result.reverse();
    String::from_utf8_lossy(&result).into_owned()
}

/// Zero-based (row, col) to an A1 reference
pub(crate) fn cell_ref(row: u32, col: u32) -> String {
    format!("{}{}", col_to_letters(col), row + 1)
}

/// Parse an A1 reference (absolute markers allowed) into zero-based (row, col)
pub(crate) fn parse_cell_ref(reference: &str) -> Option<(u32, u32)> {
    let cleaned: String = reference.trim().chars().filter(|c| *c != '$').collect();
    let split = cleaned.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = cleaned.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    let col = letters
        .bytes()
        .try_fold(0u32, |acc, b| {
            acc.checked_mul(26)?
                .checked_add((b.to_ascii_uppercase() - b'A') as u32 + 1)
        })?
        .checked_sub(1)?;
    let row = digits.parse::<u32>().ok()?.checked_sub(1)?;
    Some((row, col))
}
