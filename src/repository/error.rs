// ==========================================
// 电商数据入库 - Sink 错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分级: ConnectionError / SchemaError 为致命错误，
//       其余只影响当前数据块
// ==========================================

use thiserror::Error;

/// Sink 错误类型
#[derive(Error, Debug, Clone)]
pub enum SinkError {
    // ===== 致命错误 =====
    #[error("数据库连接失败: {0}")]
    ConnectionError(String),

    #[error("建表失败 ({table}): {message}")]
    SchemaError { table: String, message: String },

    // ===== 数据块级错误 =====
    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    #[error("外键约束违反: {0}")]
    ForeignKeyViolation(String),

    #[error("非空约束违反: {0}")]
    NotNullViolation(String),

    #[error("类型不匹配: {0}")]
    TypeMismatch(String),

    #[error("数据库事务失败: {0}")]
    TransactionError(String),

    #[error("数据库写入失败: {0}")]
    DatabaseQueryError(String),

    #[error("Sink 已关闭")]
    Closed,
}

impl SinkError {
    /// 是否为致命错误（中止整次运行）
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SinkError::ConnectionError(_) | SinkError::SchemaError { .. } | SinkError::Closed
        )
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for SinkError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    SinkError::UniqueConstraintViolation(msg)
                } else if msg.contains("FOREIGN KEY") {
                    SinkError::ForeignKeyViolation(msg)
                } else if msg.contains("NOT NULL") {
                    SinkError::NotNullViolation(msg)
                } else if msg.contains("cannot store") || msg.contains("datatype mismatch") {
                    SinkError::TypeMismatch(msg)
                } else {
                    SinkError::DatabaseQueryError(msg)
                }
            }
            rusqlite::Error::SqliteFailure(e, None)
                if e.code == rusqlite::ErrorCode::CannotOpen =>
            {
                SinkError::ConnectionError(e.to_string())
            }
            _ => SinkError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type SinkResult<T> = Result<T, SinkError>;
