//! Repository Ports - 出站端口
//!
//! 定义合成历史的持久化接口
//! 具体实现在 infrastructure 层（SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::Language;

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// 合成历史记录
///
/// 记录只追加不删除；`filename` 指向的文件可能已被过期清理
#[derive(Debug, Clone)]
pub struct HistoryRecord {
    pub id: i64,
    pub text: String,
    pub language: Language,
    pub filename: String,
    pub created_at: DateTime<Utc>,
    pub is_favorite: bool,
}

/// 新增历史记录
#[derive(Debug, Clone)]
pub struct NewHistoryRecord {
    pub text: String,
    pub language: Language,
    pub filename: String,
}

/// History Repository Port
#[async_trait]
pub trait HistoryRepositoryPort: Send + Sync {
    /// 追加记录，返回分配的 ID
    async fn append(&self, record: NewHistoryRecord) -> Result<i64, RepositoryError>;

    /// 按创建时间倒序返回最近的记录（同一时间按 ID 倒序）
    async fn list_recent(&self, limit: u32) -> Result<Vec<HistoryRecord>, RepositoryError>;

    /// 切换收藏状态，返回新状态；记录不存在时返回 None
    async fn toggle_favorite(&self, id: i64) -> Result<Option<bool>, RepositoryError>;

    /// 根据 ID 查找
    async fn find_by_id(&self, id: i64) -> Result<Option<HistoryRecord>, RepositoryError>;

    /// 记录总数
    async fn count(&self) -> Result<u64, RepositoryError>;

    /// 检查数据库连接
    async fn ping(&self) -> Result<(), RepositoryError>;
}
