/*!
 * Tests for application configuration functionality
 */

use xlsx_translator::app_config::{Config, LogLevel, ProviderConfig, TranslationProvider};
use xlsx_translator::providers::yandex::DEFAULT_ENDPOINT;
use xlsx_translator::translation::TranslationOptions;
use std::time::Duration;
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.target_language, "ru");
    assert_eq!(config.translation.provider, TranslationProvider::Relay);
    assert_eq!(config.log_level, LogLevel::Info);

    let relay = config.translation.get_provider_config(&TranslationProvider::Relay)
        .expect("Relay provider config should exist");
    assert_eq!(relay.timeout_secs, 30);
    assert!(relay.api_key.is_empty());
    assert_eq!(config.translation.get_endpoint(), "http://localhost:3000/api/translate");
}

/// Switching provider changes which entry the getters read
#[test]
fn test_providerSwitch_shouldReadMatchingEntry() {
    let mut config = Config::default();
    config.translation.active_provider_config_mut().api_key = "relay-key-0000".to_string();

    config.translation.provider = TranslationProvider::Yandex;
    assert_eq!(config.translation.get_api_key(), "");
    assert_eq!(config.translation.get_endpoint(), DEFAULT_ENDPOINT);

    config.translation.provider = TranslationProvider::Relay;
    assert_eq!(config.translation.get_api_key(), "relay-key-0000");
}

/// A missing provider entry is created on first mutable access
#[test]
fn test_activeProviderConfigMut_withMissingEntry_shouldCreateIt() {
    let mut config = Config::default();
    config.translation.available_providers.clear();
    config.translation.provider = TranslationProvider::Yandex;

    config.translation.active_provider_config_mut().endpoint = "https://translate.example.test/v2".to_string();

    assert_eq!(config.translation.available_providers.len(), 1);
    assert_eq!(config.translation.available_providers[0].provider_type, "yandex");
    assert_eq!(config.translation.get_endpoint(), "https://translate.example.test/v2");
}

/// Config written to disk reads back with the same values
#[test]
fn test_saveAndLoad_withCustomValues_shouldPersist() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("custom.json");

    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Yandex;
    config.translation.common.batch_size = 25;
    config.log_level = LogLevel::Debug;
    config.save(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.translation.provider, TranslationProvider::Yandex);
    assert_eq!(loaded.translation.common.batch_size, 25);
    assert_eq!(loaded.log_level, LogLevel::Debug);
}

/// Malformed JSON is reported instead of silently replaced
#[test]
fn test_fromFile_withMalformedJson_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("conf.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(Config::from_file(&path).is_err());
    assert!(Config::load_or_create(&path).is_err());
}

/// Provider entries serialize their kind under "type"
#[test]
fn test_providerConfig_shouldSerializeTypeField() {
    let json = serde_json::to_value(ProviderConfig::new(TranslationProvider::Relay)).unwrap();
    assert_eq!(json["type"], "relay");
}

/// Run options derive from the common section
#[test]
fn test_translationOptions_fromCommonConfig_shouldConvertUnits() {
    let mut config = Config::default();
    config.translation.common.batch_delay_ms = 250;
    config.translation.common.status_reset_delay_ms = 1000;

    let options = TranslationOptions::from(&config.translation.common);
    assert_eq!(options.batch_size, 10);
    assert_eq!(options.max_api_errors, 3);
    assert_eq!(options.batch_delay, Duration::from_millis(250));
    assert_eq!(options.status_reset_delay, Duration::from_secs(1));
}

/// Only Russian output is accepted as a target
#[test]
fn test_validate_withNonRussianTarget_shouldFail() {
    let mut config = common::test_config();
    config.target_language = "de".to_string();
    let error = config.validate().unwrap_err();
    assert!(error.to_string().contains("only Russian"));

    config.target_language = "ru".to_string();
    assert!(config.validate().is_ok());
}
