/*!
 * Tests for configuration loading and validation
 */

use tripdash::app_config::Config;

#[test]
fn test_defaultConfig_shouldTargetChineseFromVietnamese() {
    let config = Config::default();

    assert_eq!(config.source_language, "vi");
    assert_eq!(config.target_language, "zh");
    assert_eq!(config.provider.model, "gemini-2.5-flash");
    assert_eq!(config.batch.inter_item_delay_ms, 500);
    assert!(config.validate().is_ok());
}

#[test]
fn test_loadOrCreate_shouldRoundTripThroughDisk() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("conf.json");

    let mut config = Config::load_or_create(&path).expect("Failed to create config");
    config.target_language = "en".to_string();
    config.batch.inter_item_delay_ms = 750;
    config.save(&path).expect("Failed to save config");

    let reloaded = Config::load_or_create(&path).expect("Failed to reload config");
    assert_eq!(reloaded.target_language, "en");
    assert_eq!(reloaded.batch.inter_item_delay_ms, 750);
}

#[test]
fn test_loadOrCreate_withPartialFile_shouldFillDefaults() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("conf.json");

    // A minimal hand-written config without the optional sections
    std::fs::write(
        &path,
        r#"{"source_language":"vi","target_language":"en","provider":{"model":"gemini-2.5-flash"}}"#,
    )
    .expect("Failed to write config");

    let config = Config::load_or_create(&path).expect("Failed to load config");
    assert_eq!(config.server.bind, "127.0.0.1:8787");
    assert_eq!(config.batch.inter_item_delay_ms, 500);
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withBlankModel_shouldFail() {
    let mut config = Config::default();
    config.provider.model = "  ".to_string();
    assert!(config.validate().is_err());
}
