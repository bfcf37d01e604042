//! SQLite History Repository

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::FromRow;

use super::DbPool;
use crate::application::ports::{
    HistoryRecord, HistoryRepositoryPort, NewHistoryRecord, RepositoryError,
};

/// SQLite History Repository
pub struct SqliteHistoryRepository {
    pool: DbPool,
}

impl SqliteHistoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct HistoryRow {
    id: i64,
    text: String,
    language: String,
    filename: String,
    created_at: String,
    is_favorite: bool,
}

impl TryFrom<HistoryRow> for HistoryRecord {
    type Error = RepositoryError;

    fn try_from(row: HistoryRow) -> Result<Self, Self::Error> {
        Ok(HistoryRecord {
            id: row.id,
            text: row.text,
            language: row
                .language
                .parse()
                .map_err(|e: crate::domain::SpeechError| {
                    RepositoryError::SerializationError(e.to_string())
                })?,
            filename: row.filename,
            created_at: DateTime::parse_from_rfc3339(&row.created_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
            is_favorite: row.is_favorite,
        })
    }
}

/// 定长时间戳，按字符串排序即按时间排序
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn db_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::DatabaseError(e.to_string())
}

const SELECT_COLUMNS: &str = "SELECT id, text, language, filename, created_at, is_favorite FROM audio_history";

#[async_trait]
impl HistoryRepositoryPort for SqliteHistoryRepository {
    async fn append(&self, record: NewHistoryRecord) -> Result<i64, RepositoryError> {
        let result = sqlx::query(
            r#"
            INSERT INTO audio_history (text, language, filename, created_at, is_favorite)
            VALUES (?, ?, ?, ?, 0)
            "#,
        )
        .bind(&record.text)
        .bind(record.language.as_str())
        .bind(&record.filename)
        .bind(timestamp(Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(result.last_insert_rowid())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<HistoryRecord>, RepositoryError> {
        let rows: Vec<HistoryRow> = sqlx::query_as(&format!(
            "{} ORDER BY created_at DESC, id DESC LIMIT ?",
            SELECT_COLUMNS
        ))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn toggle_favorite(&self, id: i64) -> Result<Option<bool>, RepositoryError> {
        // 单条语句完成读改写，并发切换不会丢失更新
        let row: Option<(bool,)> = sqlx::query_as(
            "UPDATE audio_history SET is_favorite = NOT is_favorite WHERE id = ? RETURNING is_favorite",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(|(is_favorite,)| is_favorite))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<HistoryRecord>, RepositoryError> {
        let row: Option<HistoryRow> = sqlx::query_as(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.map(TryInto::try_into).transpose()
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM audio_history")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(count as u64)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Language;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};

    async fn repo() -> SqliteHistoryRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteHistoryRepository::new(pool)
    }

    fn record(text: &str, filename: &str) -> NewHistoryRecord {
        NewHistoryRecord {
            text: text.to_string(),
            language: Language::Es,
            filename: filename.to_string(),
        }
    }

    #[tokio::test]
    async fn test_append_and_find() {
        let repo = repo().await;

        let id = repo
            .append(record("Hola mundo", "tts_20240101_000000.mp3"))
            .await
            .unwrap();

        let found = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.text, "Hola mundo");
        assert_eq!(found.language, Language::Es);
        assert_eq!(found.filename, "tts_20240101_000000.mp3");
        assert!(!found.is_favorite);

        assert!(repo.find_by_id(id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_recent_newest_first() {
        let repo = repo().await;
        for i in 0..5 {
            repo.append(record(&format!("texto {}", i), "tts_20240101_000000.mp3"))
                .await
                .unwrap();
        }

        let recent = repo.list_recent(3).await.unwrap();

        let texts: Vec<&str> = recent.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["texto 4", "texto 3", "texto 2"]);
        assert_eq!(repo.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_same_timestamp_falls_back_to_id() {
        let repo = repo().await;
        let stamp = timestamp(Utc::now());
        for text in ["a", "b"] {
            sqlx::query(
                "INSERT INTO audio_history (text, language, filename, created_at) VALUES (?, 'es', 'f.mp3', ?)",
            )
            .bind(text)
            .bind(&stamp)
            .execute(&repo.pool)
            .await
            .unwrap();
        }

        let recent = repo.list_recent(10).await.unwrap();
        assert_eq!(recent[0].text, "b");
        assert_eq!(recent[1].text, "a");
    }

    #[tokio::test]
    async fn test_toggle_favorite() {
        let repo = repo().await;
        let id = repo
            .append(record("Hola", "tts_20240101_000000.mp3"))
            .await
            .unwrap();

        assert_eq!(repo.toggle_favorite(id).await.unwrap(), Some(true));
        assert_eq!(repo.toggle_favorite(id).await.unwrap(), Some(false));
        assert_eq!(repo.toggle_favorite(999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ping() {
        let repo = repo().await;
        repo.ping().await.unwrap();
    }
}
