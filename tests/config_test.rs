// ==========================================
// 运行配置集成测试
// ==========================================
// 测试范围: JSON 文件 → 覆写 → 校验 → 读取选项派生
// ==========================================

use ecommerce_ingest::config::{ConfigError, IngestConfig, TemporalDetection};
use ecommerce_ingest::importer::ReaderOptions;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_file_then_overrides() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ingest.json");
    fs::write(
        &path,
        r#"{
            "database_path": "/var/lib/ingest/shop.db",
            "data_dir": "/srv/export",
            "chunk_size": 2500,
            "delimiter": ";",
            "temporal_detection": "declared",
            "null_markers": ["-", "n/a"]
        }"#,
    )
    .unwrap();

    let mut config = IngestConfig::from_json_file(&path).unwrap();
    config
        .apply_overrides(|key| match key {
            "INGEST_CHUNK_SIZE" => Some("500".to_string()),
            _ => None,
        })
        .unwrap();
    config.validate().unwrap();

    assert_eq!(config.database_path, PathBuf::from("/var/lib/ingest/shop.db"));
    assert_eq!(config.chunk_size, 500);
    assert_eq!(config.source_path("users.csv"), PathBuf::from("/srv/export/users.csv"));

    let options = ReaderOptions::from(&config);
    assert_eq!(options.chunk_size, 500);
    assert_eq!(options.delimiter, b';');
    assert_eq!(options.temporal_detection, TemporalDetection::Declared);
    assert_eq!(options.null_markers, vec!["-".to_string(), "n/a".to_string()]);
}

#[test]
fn test_missing_config_file() {
    let dir = TempDir::new().unwrap();
    let err = IngestConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::FileReadError { .. }));
}

#[test]
fn test_non_ascii_delimiter_rejected() {
    let config = IngestConfig {
        delimiter: '；',
        ..IngestConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError(_))
    ));
}

#[test]
fn test_unknown_temporal_detection_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ingest.json");
    fs::write(&path, r#"{ "temporal_detection": "guess" }"#).unwrap();
    let err = IngestConfig::from_json_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}
