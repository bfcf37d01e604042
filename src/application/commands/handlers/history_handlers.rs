//! History Command Handlers

use std::sync::Arc;

use crate::application::commands::ToggleFavorite;
use crate::application::error::ApplicationError;
use crate::application::ports::HistoryRepositoryPort;

/// 收藏切换响应
#[derive(Debug, Clone)]
pub struct ToggleFavoriteResponse {
    pub id: i64,
    pub is_favorite: bool,
}

/// ToggleFavorite Handler
pub struct ToggleFavoriteHandler {
    history_repo: Arc<dyn HistoryRepositoryPort>,
}

impl ToggleFavoriteHandler {
    pub fn new(history_repo: Arc<dyn HistoryRepositoryPort>) -> Self {
        Self { history_repo }
    }

    pub async fn handle(
        &self,
        command: ToggleFavorite,
    ) -> Result<ToggleFavoriteResponse, ApplicationError> {
        let is_favorite = self
            .history_repo
            .toggle_favorite(command.id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("History record", command.id))?;

        tracing::info!(id = command.id, is_favorite, "Favorite toggled");

        Ok(ToggleFavoriteResponse {
            id: command.id,
            is_favorite,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::handlers::test_support::MemoryHistory;
    use crate::application::ports::NewHistoryRecord;
    use crate::domain::Language;

    #[tokio::test]
    async fn test_toggle_twice_restores_state() {
        let history = Arc::new(MemoryHistory::default());
        let id = history
            .append(NewHistoryRecord {
                text: "Hola".to_string(),
                language: Language::Es,
                filename: "tts_20240101_000000.mp3".to_string(),
            })
            .await
            .unwrap();
        let handler = ToggleFavoriteHandler::new(history);

        let first = handler.handle(ToggleFavorite { id }).await.unwrap();
        let second = handler.handle(ToggleFavorite { id }).await.unwrap();

        assert!(first.is_favorite);
        assert!(!second.is_favorite);
    }

    #[tokio::test]
    async fn test_toggle_unknown_id_is_not_found() {
        let handler = ToggleFavoriteHandler::new(Arc::new(MemoryHistory::default()));

        let err = handler.handle(ToggleFavorite { id: 42 }).await.unwrap_err();

        assert_eq!(err.kind(), "not_found");
    }
}
