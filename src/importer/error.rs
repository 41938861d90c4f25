// ==========================================
// 电商数据入库 - 读取层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 行级问题（格式错误行 / 无法解析的时间）不产生错误，
//       只有源文件不可用或读取中断才会向上传播
// ==========================================

use thiserror::Error;

/// 读取层错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读取失败 ({path}): {message}")]
    FileReadError { path: String, message: String },

    #[error("表头解析失败 ({path}): {message}")]
    HeaderParseError { path: String, message: String },

    // ===== 配置错误 =====
    #[error("分块大小必须大于 0")]
    InvalidChunkSize,
}

impl ImportError {
    pub(crate) fn read_error(path: &str, err: impl std::fmt::Display) -> Self {
        ImportError::FileReadError {
            path: path.to_string(),
            message: err.to_string(),
        }
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
