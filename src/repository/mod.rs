// ==========================================
// 电商数据入库 - 写入层
// ==========================================
// 红线: Sink 不含业务逻辑（无去重 / upsert / 校验）
// 职责: 建表与事务化批量写入
// ==========================================

pub mod error;
pub mod sink;
pub mod sqlite_sink;

// 重导出核心类型
pub use error::{SinkError, SinkResult};
pub use sink::{Sink, SinkTransaction};
pub use sqlite_sink::SqliteSink;
