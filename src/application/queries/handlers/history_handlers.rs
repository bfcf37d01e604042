//! History Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{AudioStoragePort, HistoryRepositoryPort};
use crate::application::queries::history_queries::{HistoryEntry, ListHistory};

pub const DEFAULT_HISTORY_LIMIT: u32 = 20;
pub const MAX_HISTORY_LIMIT: u32 = 100;

/// ListHistory Handler - 最近的合成记录
pub struct ListHistoryHandler {
    history_repo: Arc<dyn HistoryRepositoryPort>,
    storage: Arc<dyn AudioStoragePort>,
}

impl ListHistoryHandler {
    pub fn new(
        history_repo: Arc<dyn HistoryRepositoryPort>,
        storage: Arc<dyn AudioStoragePort>,
    ) -> Self {
        Self {
            history_repo,
            storage,
        }
    }

    pub async fn handle(&self, query: ListHistory) -> Result<Vec<HistoryEntry>, ApplicationError> {
        let limit = query
            .limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);

        let records = self.history_repo.list_recent(limit).await?;

        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            let audio_available = self.storage.exists(&record.filename).await;
            entries.push(HistoryEntry {
                id: record.id,
                text: record.text,
                language: record.language,
                filename: record.filename,
                created_at: record.created_at,
                is_favorite: record.is_favorite,
                audio_available,
            });
        }

        Ok(entries)
    }
}
