//! History Queries

use chrono::{DateTime, Utc};

use crate::domain::Language;

/// 最近历史查询
#[derive(Debug, Clone, Default)]
pub struct ListHistory {
    /// 返回条数，缺省 20，限制在 1..=100
    pub limit: Option<u32>,
}

/// 历史条目
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub id: i64,
    pub text: String,
    pub language: Language,
    pub filename: String,
    pub created_at: DateTime<Utc>,
    pub is_favorite: bool,
    /// 文件是否仍在存储中（可能已被过期清理）
    pub audio_available: bool,
}
