/*!
 * Tests for the translation service through its public interface
 */

use std::sync::Arc;
use std::time::Duration;
use parking_lot::Mutex;
use xlsx_translator::errors::TranslationError;
use xlsx_translator::providers::mock::MockProvider;
use xlsx_translator::spreadsheet::{CellValue, Sheet, Workbook, write_workbook};
use xlsx_translator::translation::{StatusType, TranslationService};
use crate::common;

fn service(provider: &MockProvider) -> TranslationService {
    TranslationService::new(Arc::new(provider.clone()), common::fast_options())
}

fn column_workbook(texts: &[String]) -> Workbook {
    let grid = texts.iter().map(|t| vec![CellValue::Text(t.clone())]).collect();
    Workbook::new(vec![Sheet::new("Sheet1", grid)])
}

fn numbered(prefix: &str, range: std::ops::RangeInclusive<usize>) -> Vec<String> {
    range.map(|i| format!("{} {}", prefix, i)).collect()
}

/// Failed batches within the budget keep their original texts
#[tokio::test]
async fn test_translateWorkbook_withIntermittentProvider_shouldKeepOriginalsForFailedBatches() {
    // Probe succeeds, then every second request fails: batches 1 and 3 fail
    let provider = MockProvider::intermittent(2);
    let service = service(&provider);
    let texts = numbered("Payment order", 10..=39);

    let outcome = service
        .translate_workbook(&column_workbook(&texts), common::TEST_API_KEY)
        .await
        .expect("two failures are within the budget");

    assert_eq!(outcome.stats.api_errors, 2);
    assert_eq!(outcome.stats.fallbacks, 20);
    assert_eq!(outcome.stats.remote_translations, 10);
    assert_eq!(outcome.stats.remote_calls, 3);

    let grid = &outcome.output.expect("output workbook").sheets[0].grid;
    assert_eq!(grid[0][0], common::text("Payment order 10"));
    assert_eq!(grid[10][0], common::text(&MockProvider::translated("Payment order 20")));
    assert_eq!(grid[29][0], common::text("Payment order 39"));
    assert_eq!(service.status().status_type, StatusType::Success);
}

/// Texts fully covered by the dictionary never reach the provider
#[tokio::test]
async fn test_translateWorkbook_withDictionaryOnlyTexts_shouldOnlyProbe() {
    let provider = MockProvider::working();
    let service = service(&provider);
    let texts: Vec<String> = ["Commission", "Transfer to Account", "Currency Exchange", "INVOICE NO. 7"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let outcome = service
        .translate_workbook(&column_workbook(&texts), common::TEST_API_KEY)
        .await
        .unwrap();

    assert_eq!(provider.request_count(), 1);
    assert_eq!(outcome.stats.dictionary_hits, 4);
    assert_eq!(outcome.stats.remote_calls, 0);

    let grid = &outcome.output.unwrap().sheets[0].grid;
    assert_eq!(grid[0][0], common::text("Комиссия"));
    assert_eq!(grid[1][0], common::text("Перевод на счет"));
    assert_eq!(grid[2][0], common::text("Обмен валюты"));
    assert_eq!(grid[3][0], common::text("СЧЕТ-ФАКТУРА № 7"));
}

/// Empty provider answers leave the cell as it was
#[tokio::test]
async fn test_translateWorkbook_withEmptyProviderAnswers_shouldKeepOriginalText() {
    let provider = MockProvider::empty();
    let service = service(&provider);
    let texts = vec!["Payment order 5".to_string()];

    let outcome = service
        .translate_workbook(&column_workbook(&texts), common::TEST_API_KEY)
        .await
        .unwrap();

    let grid = &outcome.output.unwrap().sheets[0].grid;
    assert_eq!(grid[0][0], common::text("Payment order 5"));
}

/// Duplicated cells are translated once and written back everywhere
#[tokio::test]
async fn test_translateWorkbook_withDuplicateCells_shouldTranslateOnce() {
    let provider = MockProvider::working();
    let service = service(&provider);
    let texts = vec![
        "Payment order 1".to_string(),
        "Payment order 1".to_string(),
        "Payment order 2".to_string(),
    ];

    let outcome = service
        .translate_workbook(&column_workbook(&texts), common::TEST_API_KEY)
        .await
        .unwrap();

    assert_eq!(outcome.stats.unique_texts, 2);
    assert_eq!(provider.calls()[1].len(), 2);

    let grid = &outcome.output.unwrap().sheets[0].grid;
    assert_eq!(grid[0][0], grid[1][0]);
    assert_eq!(grid[1][0], common::text(&MockProvider::translated("Payment order 1")));
}

/// Exhausting the budget reports the last provider error
#[tokio::test]
async fn test_translateWorkbook_withBudgetExhausted_shouldReportErrorCount() {
    let provider = MockProvider::fail_after_probe();
    let service = service(&provider);
    let texts = numbered("Payment order", 10..=59);

    let result = service.translate_workbook(&column_workbook(&texts), common::TEST_API_KEY).await;

    match result {
        Err(TranslationError::TooManyApiErrors { errors, .. }) => assert_eq!(errors, 4),
        other => panic!("expected TooManyApiErrors, got {:?}", other.map(|o| o.stats.summary())),
    }
    let status = service.status();
    assert_eq!(status.status_type, StatusType::Error);
    assert!(status.message.starts_with("Error"));
    assert!(service.progress().is_none());
}

/// The listener sees monotonically increasing progress that ends at the total
#[tokio::test]
async fn test_progressListener_shouldReceiveMonotonicUpdates() {
    let provider = MockProvider::working();
    let service = service(&provider);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    service.set_progress_listener(move |p| sink.lock().push((p.current, p.total)));

    let texts = numbered("Payment order", 100..=124);
    service
        .translate_workbook(&column_workbook(&texts), common::TEST_API_KEY)
        .await
        .unwrap();

    let seen = seen.lock().clone();
    assert_eq!(seen.first(), Some(&(0, 25)));
    assert_eq!(seen.last(), Some(&(25, 25)));
    assert!(seen.windows(2).all(|w| w[0].0 <= w[1].0));
}

/// Finished runs return to idle on their own
#[tokio::test(start_paused = true)]
async fn test_status_afterError_shouldReturnToIdle() {
    let provider = MockProvider::rejecting_key();
    let service = service(&provider);
    let texts = vec!["Payment order 1".to_string()];

    let _ = service.translate_workbook(&column_workbook(&texts), common::TEST_API_KEY).await;
    assert_eq!(service.status().status_type, StatusType::Error);

    tokio::time::sleep(Duration::from_millis(5001)).await;
    assert_eq!(service.status().status_type, StatusType::Idle);
}

/// The key is checked before the document is parsed
#[tokio::test]
async fn test_translateFile_withGarbageBytes_shouldCheckKeyBeforeParsing() {
    let rejecting = MockProvider::rejecting_key();
    let result = service(&rejecting).translate_file(b"not a workbook", common::TEST_API_KEY).await;
    assert!(matches!(result, Err(TranslationError::InvalidApiKey(_))));

    let provider = MockProvider::working();
    let service = service(&provider);
    let result = service.translate_file(b"not a workbook", common::TEST_API_KEY).await;

    assert!(matches!(result, Err(TranslationError::Spreadsheet(_))));
    assert_eq!(provider.request_count(), 1, "only the key probe is sent");
    let status = service.status();
    assert_eq!(status.status_type, StatusType::Error);
    assert!(status.message.starts_with("Error: Spreadsheet error"));
}

/// Raw xlsx bytes go through the same run as a parsed workbook
#[tokio::test]
async fn test_translateFile_withStatementBytes_shouldTranslateFirstSheet() {
    let provider = MockProvider::working();
    let service = service(&provider);
    let bytes = write_workbook(&Workbook::new(vec![common::statement_sheet("Выписка")])).unwrap();

    let outcome = service.translate_file(&bytes, common::TEST_API_KEY).await.unwrap();

    let output = outcome.output.expect("output workbook");
    assert_eq!(output.sheets[0].name, "Выписка");
    assert_eq!(output.sheets[0].grid[1][1], common::text("Комиссия"));
    assert_eq!(service.status().status_type, StatusType::Success);
}
