// ==========================================
// Quản lý kho cám - mix - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use std::path::PathBuf;
use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 文件错误 =====
    #[error("文件读写失败: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("文件内容损坏: {path}: {message}")]
    CorruptData { path: PathBuf, message: String },

    // ===== 数据错误 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("记录已存在: {entity} with id={id}")]
    AlreadyExists { entity: String, id: String },

    // ===== 数据质量错误 =====
    #[error("数据验证失败: {}", .messages.join("; "))]
    ValidationError { messages: Vec<String> },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RepositoryError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RepositoryError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn corrupt(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        RepositoryError::CorruptData {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn validation(messages: Vec<String>) -> Self {
        RepositoryError::ValidationError { messages }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
