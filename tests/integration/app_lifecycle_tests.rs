/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use xlsx_translator::app_config::{Config, TranslationProvider};
use xlsx_translator::app_controller::Controller;
use xlsx_translator::translation::StatusType;
use crate::common;

/// Test the controller initialization with default config
#[test]
fn test_controller_initialization_withDefaultConfig_shouldUseRelay() -> Result<()> {
    let controller = Controller::with_config(Config::default())?;

    assert_eq!(controller.service().provider_name(), "relay");
    assert_eq!(controller.service().status().status_type, StatusType::Idle);

    Ok(())
}

/// Test the controller with the direct provider selected
#[test]
fn test_controller_withYandexProvider_shouldBuildDirectClient() -> Result<()> {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Yandex;

    let controller = Controller::with_config(config)?;
    assert_eq!(controller.service().provider_name(), "yandex");

    Ok(())
}

/// A malformed endpoint is rejected before any file is touched
#[test]
fn test_controller_withInvalidEndpoint_shouldFail() {
    let mut config = Config::default();
    config.translation.active_provider_config_mut().endpoint = "not a url".to_string();

    assert!(Controller::with_config(config).is_err());
}

/// A config file written on first start is picked up on the next one
#[test]
fn test_configLifecycle_withMissingFile_shouldCreateAndReload() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());

    let mut edited = created.clone();
    edited.translation.active_provider_config_mut().api_key = common::TEST_API_KEY.to_string();
    edited.save(&path)?;

    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.translation.get_api_key(), common::TEST_API_KEY);
    assert!(Controller::with_config(reloaded).is_ok());

    Ok(())
}

/// The service reports success after a run driven through the controller
#[tokio::test]
async fn test_controller_afterRun_shouldExposeFinishedStatus() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_workbook(
        temp_dir.path(),
        "statement.xlsx",
        vec![common::statement_sheet("Sheet1")],
    )?;

    let controller = common::mock_controller(xlsx_translator::providers::mock::MockProvider::working());
    controller.run(input, temp_dir.path().to_path_buf(), false).await?;

    let status = controller.service().status();
    assert_eq!(status.status_type, StatusType::Success);
    assert!(status.message.contains("translated successfully"));

    controller.service().reset_status();
    assert_eq!(controller.service().status().status_type, StatusType::Idle);

    Ok(())
}
