/*!
 * # xlsx-translator - Hybrid spreadsheet translator
 *
 * A Rust library that translates the text cells of Excel workbooks from
 * Armenian or English into Russian.
 *
 * ## Features
 *
 * - Read the first sheet of an .xlsx workbook with its column widths,
 *   row heights and used range
 * - Resolve known banking terms with a built-in dictionary
 * - Send everything else to Yandex Translate in batches:
 *   - through a relay service
 *   - or directly against the Yandex Cloud API
 * - Error budget: abort after too many failed remote batches
 * - Progress reporting and a status state machine for front ends
 * - Write a single-sheet workbook named "<name> на русском.xlsx"
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `spreadsheet`: Workbook model, xlsx reading/writing and grid operations
 * - `translation`: Hybrid translation pipeline:
 *   - `translation::core`: Run orchestration, status and progress
 *   - `translation::batch`: Dictionary-then-remote resolution of one batch
 *   - `translation::cache`: Per-run translation cache
 *   - `translation::dictionary`: Built-in banking dictionary
 * - `providers`: Remote translation clients:
 *   - `providers::relay`: Relay service client
 *   - `providers::yandex`: Yandex Cloud Translate client
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: Script detection and language names
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod spreadsheet;
pub mod translation;
pub mod app_controller;
pub mod language_utils;
pub mod providers;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use spreadsheet::{CellValue, Sheet, Workbook};
pub use translation::TranslationService;
pub use language_utils::{detect_language, get_language_name, needs_translation};
pub use errors::{AppError, ProviderError, SpreadsheetError, TranslationError};
