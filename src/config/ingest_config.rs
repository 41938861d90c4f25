// ==========================================
// 电商数据入库 - 运行配置
// ==========================================
// 分层覆写: 默认值 → JSON 配置文件 → 环境变量 → 命令行
// 运行期只读，构造一次后按引用传入编排器
// ==========================================

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 默认分块行数
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 环境变量键
pub mod env_keys {
    pub const DATABASE_PATH: &str = "INGEST_DATABASE_PATH";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const DATA_DIR: &str = "INGEST_DATA_DIR";
    pub const CHUNK_SIZE: &str = "INGEST_CHUNK_SIZE";
}

/// 缺失值标记（与常见 CSV 导出工具的 NA 集合一致；空白值另行处理）
pub const DEFAULT_NULL_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    FileReadError { path: String, message: String },

    #[error("配置文件格式错误 ({path}): {message}")]
    ParseError { path: String, message: String },

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ValueError {
        key: String,
        value: String,
        message: String,
    },

    #[error("配置校验失败: {0}")]
    ValidationError(String),
}

/// 时间列识别方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalDetection {
    /// 规范化列名包含 "at" 即视为时间列
    #[default]
    NameHeuristic,
    /// 仅 Schema 中声明为 Timestamp 的字段
    Declared,
}

impl std::str::FromStr for TemporalDetection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name_heuristic" | "heuristic" => Ok(TemporalDetection::NameHeuristic),
            "declared" | "schema" => Ok(TemporalDetection::Declared),
            other => Err(ConfigError::ValueError {
                key: "temporal_detection".to_string(),
                value: other.to_string(),
                message: "可选值: name_heuristic / declared".to_string(),
            }),
        }
    }
}

/// 入库运行配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// SQLite 数据库文件路径
    pub database_path: PathBuf,
    /// 源文件目录
    pub data_dir: PathBuf,
    /// 每块行数（所有实体统一）
    pub chunk_size: usize,
    /// 分隔符（单个 ASCII 字符）
    pub delimiter: char,
    pub temporal_detection: TemporalDetection,
    pub null_markers: Vec<String>,
    pub enforce_foreign_keys: bool,
    pub busy_timeout_ms: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            data_dir: PathBuf::from("./data"),
            chunk_size: DEFAULT_CHUNK_SIZE,
            delimiter: ',',
            temporal_detection: TemporalDetection::default(),
            null_markers: DEFAULT_NULL_MARKERS.iter().map(|s| s.to_string()).collect(),
            enforce_foreign_keys: true,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl IngestConfig {
    /// 从 JSON 文件加载（缺省字段取默认值）
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::FileReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// 应用环境变量覆写
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// 按给定的查找函数覆写（便于测试注入）
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        // INGEST_DATABASE_PATH 优先于 DATABASE_URL
        if let Some(url) = non_empty(env_keys::DATABASE_URL) {
            self.database_path = parse_database_url(&url)?;
        }
        if let Some(path) = non_empty(env_keys::DATABASE_PATH) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(dir) = non_empty(env_keys::DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(size) = non_empty(env_keys::CHUNK_SIZE) {
            self.chunk_size = size.parse().map_err(|_| ConfigError::ValueError {
                key: env_keys::CHUNK_SIZE.to_string(),
                value: size.clone(),
                message: "必须为正整数".to_string(),
            })?;
        }
        Ok(())
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ValidationError(
                "chunk_size 必须大于 0".to_string(),
            ));
        }
        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "database_path 不能为空".to_string(),
            ));
        }
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError("data_dir 不能为空".to_string()));
        }
        if !self.delimiter.is_ascii() {
            return Err(ConfigError::ValidationError(format!(
                "分隔符必须为 ASCII 字符: {:?}",
                self.delimiter
            )));
        }
        Ok(())
    }

    /// 分隔符字节（validate 之后调用）
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            b','
        }
    }

    /// 实体源文件的完整路径
    pub fn source_path(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }
}

/// 解析 DATABASE_URL（支持 sqlite:// 与 sqlite: 前缀）
pub fn parse_database_url(url: &str) -> Result<PathBuf, ConfigError> {
    let trimmed = url.trim();
    let path = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);

    if path.contains("://") {
        return Err(ConfigError::ValueError {
            key: env_keys::DATABASE_URL.to_string(),
            value: trimmed.to_string(),
            message: "仅支持 SQLite 目标".to_string(),
        });
    }
    Ok(PathBuf::from(path))
}

/// 默认数据库路径（用户数据目录下）
pub fn default_database_path() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("ecommerce-ingest").join("ecommerce.db"),
        None => PathBuf::from("./ecommerce.db"),
    }
}
