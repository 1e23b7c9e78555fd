/*!
 * Tests for application configuration loading and validation
 */

use anyhow::Result;
use std::path::PathBuf;

use resung::app_config::{Config, LogLevel};

use crate::common;

#[test]
fn test_config_roundTrip_shouldPreserveValues() -> Result<()> {
    let mut config = Config::default();
    config.whisper.model = "base.en".to_string();
    config.matching.min_clip_ms = 150;
    config.log_level = LogLevel::Debug;

    let json = serde_json::to_string_pretty(&config)?;
    let parsed: Config = serde_json::from_str(&json)?;

    assert_eq!(parsed.whisper.model, "base.en");
    assert_eq!(parsed.matching.min_clip_ms, 150);
    assert_eq!(parsed.log_level, LogLevel::Debug);
    Ok(())
}

#[test]
fn test_config_partialDocument_shouldFillDefaults() -> Result<()> {
    let json = r#"{
        "matching": { "min_clip_ms": 300 },
        "folders": { "input_dir": "recordings" }
    }"#;

    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.matching.min_clip_ms, 300);
    assert!((config.matching.loudness_offset_db - 10.0).abs() < f64::EPSILON);
    assert_eq!(config.folders.input_dir, PathBuf::from("recordings"));
    assert_eq!(config.folders.prep_dir, PathBuf::from("prep"));
    assert_eq!(config.whisper.model, "tiny.en");
    Ok(())
}

#[test]
fn test_config_loadFromFile_shouldParse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "conf.json",
        r#"{ "whisper": { "model": "small.en", "language": "en" } }"#,
    )?;

    let content = std::fs::read_to_string(&path)?;
    let config: Config = serde_json::from_str(&content)?;
    assert_eq!(config.whisper.model, "small.en");
    assert!(config.validate().is_ok());
    Ok(())
}

#[test]
fn test_validate_withInvertedTempoBounds_shouldFail() {
    let mut config = Config::default();
    config.matching.tempo_low = 0.9;
    config.matching.tempo_high = 0.95;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withEmptyModel_shouldFail() {
    let mut config = Config::default();
    config.whisper.model = String::new();
    assert!(config.validate().is_err());
}
