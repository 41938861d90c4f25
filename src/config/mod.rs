// ==========================================
// 电商数据入库 - 配置层
// ==========================================
// 职责: 运行配置加载与校验（不持有全局状态）
// ==========================================

pub mod ingest_config;

// 重导出核心配置
pub use ingest_config::{
    default_database_path, env_keys, parse_database_url, ConfigError, IngestConfig,
    TemporalDetection, DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_CHUNK_SIZE, DEFAULT_NULL_MARKERS,
};
