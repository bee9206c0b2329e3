/*!
 * Tests for application configuration
 */

use std::fs;
use anyhow::Result;
use readaloud::app_config::{Config, LogLevel};
use readaloud::segmenter::SegmenterConfig;
use crate::common;

/// Test that default values are usable as-is
#[test]
fn test_default_config_shouldBeValid() {
    let config = Config::default();
    assert_eq!(config.reading.token_budget, 1);
    assert_eq!(config.reading.prosody_rate, "+20.00%");
    assert_eq!(config.reading.start_index, 0);
    assert_eq!(config.reading.start_sub_offset, 0);
    assert_eq!(config.speech.voice_name, "en-US-AriaNeural");
    assert_eq!(config.speech.language, "en-US");
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withZeroBudget_shouldFail() {
    let mut config = Config::default();
    config.reading.token_budget = 0;
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("token_budget"));
}

#[test]
fn test_validate_withMalformedRate_shouldFail() {
    let mut config = Config::default();
    config.reading.prosody_rate = "quick".to_string();
    assert!(config.validate().is_err());

    config.reading.prosody_rate = "-15%".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withBlankVoice_shouldFail() {
    let mut config = Config::default();
    config.speech.voice_name = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_speech_withMissingCredentials_shouldFail() {
    let mut config = Config::default();
    assert!(config.validate_speech().is_err());

    config.speech.subscription_key = "key".to_string();
    assert!(config.validate_speech().is_err());

    config.speech.region = "westeurope".to_string();
    assert!(config.validate_speech().is_ok());
}

#[test]
fn test_get_endpoint_shouldPreferOverride() {
    let mut config = Config::default();
    config.speech.region = "westeurope".to_string();
    assert_eq!(config.speech.get_endpoint(), "https://westeurope.tts.speech.microsoft.com");

    config.speech.endpoint = "http://localhost:8080/".to_string();
    assert_eq!(config.speech.get_endpoint(), "http://localhost:8080");
}

#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("readaloud.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config.reading.token_budget, 1);
    let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(written["reading"]["prosody_rate"], "+20.00%");
    Ok(())
}

#[test]
fn test_load_or_create_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "partial.json",
        r#"{ "reading": { "token_budget": 4 }, "log_level": "debug" }"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.reading.token_budget, 4);
    assert_eq!(config.reading.poll_interval_ms, 50);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.speech.speaking_style, "narration-professional");
    Ok(())
}

#[test]
fn test_load_or_create_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "broken.json", "{ not json")?;
    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

#[test]
fn test_segmenter_config_fromConfig_shouldCopyReadingAndSpeechSettings() {
    let mut config = Config::default();
    config.reading.token_budget = 3;
    config.reading.prosody_rate = "+5%".to_string();
    config.speech.voice_name = "en-GB-RyanNeural".to_string();

    let segmenter_config = SegmenterConfig::from(&config);

    assert_eq!(segmenter_config.token_budget, 3);
    assert_eq!(segmenter_config.prosody_rate, "+5%");
    assert_eq!(segmenter_config.voice_name, "en-GB-RyanNeural");
    assert_eq!(segmenter_config.language, "en-US");
}
