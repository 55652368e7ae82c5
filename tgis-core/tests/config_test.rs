//! Config loading tests.
//!
//! Missing sections and fields must fall back to defaults so that short
//! config files keep working.

use std::path::PathBuf;

use tgis_core::config::{StorageConfig, TemporalConfig};
use tgis_core::TgisConfig;

// ═══════════════════════════════════════════════════════════════════════════
// Defaults
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn empty_toml_gives_defaults() {
    let config = TgisConfig::from_toml("").unwrap();
    assert_eq!(config.storage.db_file_name, "tgis.db");
    assert_eq!(config.storage.read_pool_size, 2);
    assert_eq!(config.storage.busy_timeout_ms, 5000);
    assert_eq!(config.temporal.default_semantic_type, "mean");
    assert!(config.temporal.default_creator.is_none());
    assert!(config.temporal.refresh_on_register);
    assert_eq!(config.observability.log_level, "info");
    assert!(!config.observability.json_logs);
}

#[test]
fn partial_section_keeps_other_defaults() {
    let toml = r#"
        [storage]
        gisdbase = "/data/grassdata"
        location = "nc_spm"

        [temporal]
        refresh_on_register = false
    "#;
    let config = TgisConfig::from_toml(toml).unwrap();
    assert_eq!(config.storage.gisdbase, PathBuf::from("/data/grassdata"));
    assert_eq!(config.storage.db_file_name, "tgis.db");
    assert!(!config.temporal.refresh_on_register);
    assert_eq!(config.temporal.default_semantic_type, "mean");
}

#[test]
fn unknown_value_type_is_an_error() {
    let toml = r#"
        [storage]
        read_pool_size = "many"
    "#;
    assert!(TgisConfig::from_toml(toml).is_err());
}

// ═══════════════════════════════════════════════════════════════════════════
// Derived paths
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn database_path_joins_location() {
    let config = StorageConfig {
        gisdbase: PathBuf::from("/data"),
        location: "world".to_string(),
        ..Default::default()
    };
    assert_eq!(config.database_path(), PathBuf::from("/data/world/tgis.db"));
}

#[test]
fn temporal_config_json_roundtrip() {
    let config = TemporalConfig {
        default_creator: Some("soeren".to_string()),
        ..Default::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    let back: TemporalConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.default_creator.as_deref(), Some("soeren"));
}
