/*!
 * Spreadsheet handling.
 *
 * - `model`: workbook, sheet, grid and layout types
 * - `reader`: first-sheet xlsx reading with layout metadata
 * - `writer`: minimal xlsx writing
 * - `grid`: extraction, reinsertion and output assembly
 */

pub mod grid;
pub mod layout;
pub mod model;
pub mod reader;
pub mod writer;

pub use grid::{apply_translations, build_output, derive_output_name, extract_unique_texts};
pub use model::{CellRange, CellValue, ColumnInfo, Grid, RowInfo, Sheet, SheetLayout, Workbook};
pub use reader::{read_workbook, read_workbook_file};
pub use writer::{write_workbook, write_workbook_file};
