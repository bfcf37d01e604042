//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::{
    ArchiveError, AudioStorageError, RepositoryError, TranscodeError, TtsError,
};
use crate::domain::SpeechError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 验证错误（用户可修正）
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 合成引擎错误
    #[error("Synthesis error: {0}")]
    SynthesisError(String),

    /// 转码引擎错误
    #[error("Transcode error: {0}")]
    TranscodeError(String),

    /// 文件存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 数据库错误
    #[error("Persistence error: {0}")]
    PersistenceError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }

    /// 机器可读的错误类别
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::ValidationError(_) => "validation_error",
            Self::SynthesisError(_) => "synthesis_error",
            Self::TranscodeError(_) => "transcode_error",
            Self::StorageError(_) => "storage_error",
            Self::PersistenceError(_) => "persistence_error",
            Self::InternalError(_) => "internal_error",
        }
    }
}

impl From<SpeechError> for ApplicationError {
    fn from(err: SpeechError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => Self::not_found("History record", id),
            other => Self::PersistenceError(other.to_string()),
        }
    }
}

impl From<AudioStorageError> for ApplicationError {
    fn from(err: AudioStorageError) -> Self {
        match err {
            AudioStorageError::FileNotFound(name) => Self::not_found("Audio file", name),
            AudioStorageError::InvalidName(name) => {
                Self::ValidationError(format!("invalid file name: {}", name))
            }
            AudioStorageError::IoError(msg) => Self::StorageError(msg),
        }
    }
}

impl From<TtsError> for ApplicationError {
    fn from(err: TtsError) -> Self {
        Self::SynthesisError(err.to_string())
    }
}

impl From<TranscodeError> for ApplicationError {
    fn from(err: TranscodeError) -> Self {
        Self::TranscodeError(err.to_string())
    }
}

impl From<ArchiveError> for ApplicationError {
    fn from(err: ArchiveError) -> Self {
        Self::StorageError(err.to_string())
    }
}
