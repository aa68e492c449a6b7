/*!
 * Tests for configuration and capability tables
 */

use subedit::app_config::{CapabilityTables, Config, LogLevel};
use subedit::errors::TranslationError;
use crate::common;

/// Test defaults
#[test]
fn test_default_config_shouldCarryTranslationDefaults() {
    let config = Config::default();

    assert_eq!(config.translation.llm.model, "GPT-4o");
    assert_eq!(config.translation.llm.throttle, 0.5);
    assert_eq!(config.translation.llm.request_timeout_secs, 15);
    assert_eq!(config.translation.llm.response_timeout_secs, 45);
    assert_eq!(config.translation.engine.engine, "Google");
    assert_eq!(config.translation.engine.request_timeout_secs, 2);
    assert_eq!(config.statistics_file, "statistics.json");
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test partial JSON falls back to defaults
#[test]
fn test_config_fromPartialJson_shouldFillMissingFields() {
    let config: Config = serde_json::from_str(r#"{"translation": {"llm": {"throttle": 0.25}}, "log_level": "debug"}"#).unwrap();

    assert_eq!(config.translation.llm.throttle, 0.25);
    assert_eq!(config.translation.llm.model, "GPT-4o");
    assert_eq!(config.translation.engine.engine, "Google");
    assert_eq!(config.log_level, LogLevel::Debug);
}

/// Test throttle validation
#[test]
fn test_validate_withThrottleOutOfRange_shouldFail() {
    let mut config = Config::default();
    config.translation.llm.throttle = 1.5;
    assert!(config.validate().is_err());

    config.translation.llm.throttle = 0.0;
    assert!(config.validate().is_err());

    config.translation.llm.throttle = 1.0;
    assert!(config.validate().is_ok());
}

/// Test zero response budget
#[test]
fn test_validate_withZeroResponseTimeout_shouldFail() {
    let mut config = Config::default();
    config.translation.engine.response_timeout_secs = 0;
    assert!(config.validate().is_err());
}

/// Test that a missing file is created with defaults
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("nested").join("conf.json");

    let config = Config::load_or_create(&path).unwrap();

    assert_eq!(config, Config::default());
    assert!(path.is_file());
    assert_eq!(Config::from_file(&path).unwrap(), config);
}

/// Test that an existing file is read
#[test]
fn test_load_or_create_withExistingFile_shouldReadIt() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{"translation": {"engine": {"engine": "DeepL"}}, "statistics_file": "stats.json"}"#,
    )
    .unwrap();

    let config = Config::load_or_create(&path).unwrap();

    assert_eq!(config.translation.engine.engine, "DeepL");
    assert_eq!(config.statistics_file, "stats.json");
}

/// Test the built-in tables
#[test]
fn test_default_capabilities_shouldKnowModelsAndEngines() {
    let tables = CapabilityTables::default();

    assert_eq!(tables.model("GPT-4o").unwrap().tokens, 2048);
    assert_eq!(tables.engine_limit("Google").unwrap(), 5000);
    assert_eq!(tables.engine_limit("DeepL").unwrap(), 1500);
    assert!(matches!(tables.model("GPT-17"), Err(TranslationError::UnknownModel(name)) if name == "GPT-17"));
    assert!(matches!(tables.engine_limit("Babel"), Err(TranslationError::UnknownEngine(_))));
}

/// Test language name lookup with fallbacks
#[test]
fn test_language_name_withUnlistedCode_shouldFallBack() {
    let tables = CapabilityTables::default();

    assert_eq!(tables.language_name("fr"), "French");
    assert_eq!(tables.language_name("zh-TW"), "Chinese Traditional");
    assert_eq!(tables.language_name("sv"), "Swedish");
    assert_eq!(tables.language_name("xx-unknown"), "xx-unknown");
}

/// Test tables loaded from a file
#[test]
fn test_capabilities_withTablesFile_shouldUseFile() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        temp_dir.path(),
        "capabilities.json",
        r#"{"codes": {"en": "English"}, "models": {"Tiny": {"name": "tiny-1", "tokens": 64}}, "engines": {"Local": 200}}"#,
    )
    .unwrap();

    let config = Config {
        capabilities_file: Some(path.to_string_lossy().into_owned()),
        ..Config::default()
    };
    let tables = config.capabilities().unwrap();

    assert_eq!(tables.model("Tiny").unwrap().name, "tiny-1");
    assert_eq!(tables.engine_limit("Local").unwrap(), 200);
    assert!(tables.model("GPT-4o").is_err());
}
