// ==========================================
// Quản lý kho cám - mix - API层错误类型
// ==========================================
// 职责: 定义API层错误类型,转换Repository错误为用户友好的错误消息
// 对外: 展示层只看到 结果值 / 成功标志 / 可读消息列表
// ==========================================

use crate::repository::error::RepositoryError;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("数据验证失败: {}", .0.join("; "))]
    ValidationError(Vec<String>),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 数据错误
    // ==========================================
    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("资源已存在: {0}")]
    AlreadyExists(String),

    #[error("数据文件损坏: {0}")]
    CorruptData(String),

    #[error("保存失败: {0}")]
    PersistenceError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("锁获取失败: {0}")]
    LockError(String),

    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 稳定错误代码（供展示层判断）
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::AlreadyExists(_) => "ALREADY_EXISTS",
            ApiError::CorruptData(_) => "CORRUPT_DATA",
            ApiError::PersistenceError(_) => "PERSISTENCE_ERROR",
            ApiError::LockError(_) => "LOCK_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
            ApiError::Other(_) => "OTHER_ERROR",
        }
    }

    /// 展开为消息列表（校验错误逐条展开）
    pub fn messages(&self) -> Vec<String> {
        match self {
            ApiError::ValidationError(messages) => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ValidationError { messages } => ApiError::ValidationError(messages),
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}({})不存在", entity, id))
            }
            RepositoryError::AlreadyExists { entity, id } => {
                ApiError::AlreadyExists(format!("{}({})已存在", entity, id))
            }
            RepositoryError::CorruptData { path, message } => {
                ApiError::CorruptData(format!("{}: {}", path.display(), message))
            }
            RepositoryError::Io { path, source } => {
                ApiError::PersistenceError(format!("{}: {}", path.display(), source))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

/// 获取共享状态锁（中毒时转为 LockError）
pub fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> ApiResult<MutexGuard<'a, T>> {
    mutex
        .lock()
        .map_err(|e| ApiError::LockError(format!("{}: {}", what, e)))
}

// ==========================================
// OperationOutcome - 操作结果（成功标志 + 消息列表）
// ==========================================

/// 修改类操作的结构化结果
///
/// 校验失败、资源不存在、写盘失败均以 `success=false` 返回,不向上传播错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcome {
    pub success: bool,
    /// 失败时为错误代码
    pub code: Option<String>,
    pub messages: Vec<String>,
}

impl OperationOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            code: None,
            messages: Vec::new(),
        }
    }

    pub fn ok_with(messages: Vec<String>) -> Self {
        Self {
            success: true,
            code: None,
            messages,
        }
    }

    pub fn failed(err: &ApiError) -> Self {
        Self {
            success: false,
            code: Some(err.code().to_string()),
            messages: err.messages(),
        }
    }
}

impl<T> From<ApiResult<T>> for OperationOutcome {
    fn from(result: ApiResult<T>) -> Self {
        match result {
            Ok(_) => OperationOutcome::ok(),
            Err(err) => {
                tracing::warn!("操作失败 [{}]: {}", err.code(), err);
                OperationOutcome::failed(&err)
            }
        }
    }
}
