// ==========================================
// 电商数据入库 - 核心库
// ==========================================
// 系统定位: 一次性批量入库（CSV → SQLite）
// 技术栈: Rust + csv + SQLite
// 数据流: 源文件 → 分块读取/清洗 → 事务化写入
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体定义与字段值
pub mod domain;

// 导入层 - 分块读取与清洗
pub mod importer;

// 写入层 - Sink 抽象与 SQLite 实现
pub mod repository;

// 编排层 - 加载计划与运行状态
pub mod engine;

// 配置层 - 运行配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// SQL 性能追踪
pub mod perf;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域
pub use domain::{
    EntitySchema, FieldType, FieldValue, Record, ALL_ENTITIES, DISTRIBUTION_CENTER,
    INVENTORY_ITEM, ORDER, ORDER_ITEM, PRODUCT, USER,
};

// 配置
pub use config::{IngestConfig, TemporalDetection};

// 读取层
pub use importer::{Chunk, ChunkReader, ReaderOptions};

// 写入层
pub use repository::{Sink, SinkError, SinkTransaction, SqliteSink};

// 编排层
pub use engine::{run_ingest, IngestOrchestrator, IngestPlan, RunOutcome, RunSummary};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "ecommerce-ingest";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_all_entities_exported() {
        assert_eq!(ALL_ENTITIES.len(), 6);
    }
}
