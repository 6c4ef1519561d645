/*!
 * End-to-end tests: xlsx file in, translated xlsx file out
 */

use anyhow::Result;
use std::fs;
use xlsx_translator::app_controller::{FileOutcome, FOLDER_LOG_FILE};
use xlsx_translator::providers::mock::MockProvider;
use xlsx_translator::spreadsheet::{CellValue, read_workbook_file};
use xlsx_translator::translation::StatusType;
use crate::common;

/// A statement is translated through dictionary and provider and keeps its layout
#[tokio::test]
async fn test_run_withStatementWorkbook_shouldWriteTranslatedCopy() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_workbook(
        temp_dir.path(),
        "statement.xlsx",
        vec![common::statement_sheet("Выписка"), common::russian_only_sheet("Notes")],
    )?;

    let provider = MockProvider::working();
    let controller = common::mock_controller(provider.clone());

    let outcome = controller.run(input, temp_dir.path().to_path_buf(), false).await?;

    let expected_path = temp_dir.path().join("statement на русском.xlsx");
    assert_eq!(outcome, FileOutcome::Translated(expected_path.clone()));

    let output = read_workbook_file(&expected_path)?;
    assert_eq!(output.sheets.len(), 1, "only the first sheet is written");

    let sheet = output.first_sheet()?;
    let original = common::statement_sheet("Выписка");
    assert_eq!(sheet.name, "Выписка");
    assert_eq!(sheet.layout.columns, original.layout.columns);
    assert_eq!(sheet.layout.rows, original.layout.rows);

    assert_eq!(sheet.grid[0][0], common::text(&MockProvider::translated("Ամսաթիվ")));
    assert_eq!(sheet.grid[0][1], common::text("Description"));
    assert_eq!(sheet.grid[0][2], common::text("Сумма"));
    assert_eq!(sheet.grid[1][0], common::text("2024-01-15"));
    assert_eq!(sheet.grid[1][1], common::text("Комиссия"));
    assert_eq!(sheet.grid[1][2], CellValue::Number(1500.0));
    assert_eq!(sheet.grid[2][0], common::text(&MockProvider::translated("Payment order 17")));
    assert_eq!(sheet.grid[2][1], common::text("Перевод на карту"));
    assert_eq!(sheet.grid[3][0], CellValue::Empty);
    assert_eq!(sheet.grid[3][2], CellValue::Boolean(true));

    // Key probe plus one batch holding only what the dictionary left over
    let calls = provider.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1], vec!["Payment order 17".to_string(), "Ամսաթիվ".to_string()]);

    Ok(())
}

/// Existing output is left alone unless overwrite is forced
#[tokio::test]
async fn test_run_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_workbook(
        temp_dir.path(),
        "statement.xlsx",
        vec![common::statement_sheet("Sheet1")],
    )?;
    let existing = temp_dir.path().join("statement на русском.xlsx");
    fs::write(&existing, b"previous run")?;

    let provider = MockProvider::working();
    let controller = common::mock_controller(provider.clone());

    let skipped = controller.run(input.clone(), temp_dir.path().to_path_buf(), false).await?;
    assert_eq!(skipped, FileOutcome::Skipped(existing.clone()));
    assert_eq!(provider.request_count(), 0);
    assert_eq!(fs::read(&existing)?, b"previous run");

    let forced = controller.run(input, temp_dir.path().to_path_buf(), true).await?;
    assert_eq!(forced, FileOutcome::Translated(existing.clone()));
    assert!(read_workbook_file(&existing).is_ok());

    Ok(())
}

/// A sheet with nothing to translate produces no output file
#[tokio::test]
async fn test_run_withRussianOnlyWorkbook_shouldNotWriteOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_workbook(
        temp_dir.path(),
        "ready.xlsx",
        vec![common::russian_only_sheet("Лист1")],
    )?;

    let controller = common::mock_controller(MockProvider::working());
    let outcome = controller.run(input, temp_dir.path().to_path_buf(), false).await?;

    assert_eq!(outcome, FileOutcome::NothingToTranslate);
    assert!(!temp_dir.path().join("ready на русском.xlsx").exists());

    Ok(())
}

/// A rejected key fails the run and leaves no output behind
#[tokio::test]
async fn test_run_withRejectedKey_shouldFailWithoutOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_workbook(
        temp_dir.path(),
        "statement.xlsx",
        vec![common::statement_sheet("Sheet1")],
    )?;

    let provider = MockProvider::rejecting_key();
    let controller = common::mock_controller(provider.clone());
    let result = controller.run(input, temp_dir.path().to_path_buf(), false).await;

    assert!(result.is_err());
    assert_eq!(provider.request_count(), 1, "only the key probe is sent");
    assert!(!temp_dir.path().join("statement на русском.xlsx").exists());

    Ok(())
}

/// A file that is not an xlsx archive is reported as an error
#[tokio::test]
async fn test_run_withCorruptFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = temp_dir.path().join("broken.xlsx");
    fs::write(&input, b"this is not a zip archive")?;

    let provider = MockProvider::working();
    let controller = common::mock_controller(provider.clone());
    let result = controller.run(input, temp_dir.path().to_path_buf(), false).await;

    assert!(result.is_err());
    assert_eq!(provider.request_count(), 1, "the key is probed before parsing");
    assert_eq!(controller.service().status().status_type, StatusType::Error);

    Ok(())
}

/// Folder mode translates every source, skips prior outputs and logs a summary
#[tokio::test]
async fn test_runFolder_withMixedFiles_shouldSummarizeOutcomes() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("january");
    fs::create_dir(&nested)?;

    common::create_test_workbook(temp_dir.path(), "a.xlsx", vec![common::statement_sheet("Sheet1")])?;
    common::create_test_workbook(&nested, "b.xlsx", vec![common::statement_sheet("Sheet1")])?;
    common::create_test_workbook(temp_dir.path(), "c.xlsx", vec![common::russian_only_sheet("Sheet1")])?;
    fs::write(temp_dir.path().join("broken.xlsx"), b"garbage")?;
    fs::write(temp_dir.path().join("old на русском.xlsx"), b"ignored")?;

    let controller = common::mock_controller(MockProvider::working());
    let summary = controller.run_folder(temp_dir.path().to_path_buf(), false).await?;

    assert_eq!(summary.translated, 2);
    assert_eq!(summary.unchanged, 1);
    assert_eq!(summary.errors, 1);
    assert_eq!(summary.skipped, 0);

    assert!(temp_dir.path().join("a на русском.xlsx").exists());
    assert!(nested.join("b на русском.xlsx").exists());

    let log = fs::read_to_string(temp_dir.path().join(FOLDER_LOG_FILE))?;
    assert!(log.contains("2 translated"));
    assert!(log.contains("1 errors"));

    // A second pass finds the outputs already in place
    let second = controller.run_folder(temp_dir.path().to_path_buf(), false).await?;
    assert_eq!(second.skipped, 2);
    assert_eq!(second.translated, 0);

    Ok(())
}

/// Folder mode with no spreadsheets is an error
#[tokio::test]
async fn test_runFolder_withoutSpreadsheets_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    fs::write(temp_dir.path().join("notes.txt"), b"nothing here")?;

    let controller = common::mock_controller(MockProvider::working());
    assert!(controller.run_folder(temp_dir.path().to_path_buf(), false).await.is_err());

    Ok(())
}
