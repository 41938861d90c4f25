// ==========================================
// 电商数据入库 - 读取/规范化层
// ==========================================
// 职责: 分隔文本 → 规范化记录块
// 流程: 表头规范化 → 时间列转换 → NULL 标准化 → 分块产出
// ==========================================

// 模块声明
pub mod chunk_reader;
pub mod column_normalizer;
pub mod data_cleaner;
pub mod error;

// 重导出核心类型
pub use chunk_reader::{Chunk, ChunkReader, ChunkStats, ReaderOptions};
pub use column_normalizer::{looks_temporal, normalize_column_name, normalize_headers};
pub use data_cleaner::{parse_timestamp, Coerced, DataCleaner};
pub use error::{ImportError, ImportResult};
