//! Batch Synthesis Handler
//!
//! 逐条合成并追加到同一个 ZIP 归档中。
//! 任意一条失败即中止并丢弃未完成的归档。

use std::sync::Arc;

use crate::application::commands::SynthesizeBatch;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ArchiveError, ArchivePort, ArchiveWriter, AudioStoragePort, FileKind, SynthesisRequest,
    TtsEnginePort,
};
use crate::domain::{AudioFormat, Language, SpeechError, SynthesisPolicy};

/// 归档清单中的一条
#[derive(Debug, Clone)]
pub struct BatchItem {
    /// 原始请求中的序号（从 1 开始），跳过的空文本不重新编号
    pub index: usize,
    pub entry_name: String,
    pub preview: String,
}

/// 批量合成响应
#[derive(Debug, Clone)]
pub struct SynthesizeBatchResponse {
    pub archive: String,
    pub size_bytes: u64,
    pub language: Language,
    pub items: Vec<BatchItem>,
    /// 因为空白而跳过的序号
    pub skipped: Vec<usize>,
}

/// 同一秒内创建归档的最大尝试次数
const MAX_ARCHIVE_ATTEMPTS: usize = 100;

/// 归档条目名: `audio_01.mp3`
pub fn entry_name(index: usize) -> String {
    format!("audio_{:02}.{}", index, AudioFormat::Mp3.extension())
}

/// SynthesizeBatch Handler
pub struct SynthesizeBatchHandler {
    policy: Arc<SynthesisPolicy>,
    tts_engine: Arc<dyn TtsEnginePort>,
    storage: Arc<dyn AudioStoragePort>,
    archive: Arc<dyn ArchivePort>,
}

impl SynthesizeBatchHandler {
    pub fn new(
        policy: Arc<SynthesisPolicy>,
        tts_engine: Arc<dyn TtsEnginePort>,
        storage: Arc<dyn AudioStoragePort>,
        archive: Arc<dyn ArchivePort>,
    ) -> Self {
        Self {
            policy,
            tts_engine,
            storage,
            archive,
        }
    }

    pub async fn handle(
        &self,
        command: SynthesizeBatch,
    ) -> Result<SynthesizeBatchResponse, ApplicationError> {
        self.policy.validate_batch_size(command.texts.len())?;
        let language = self.policy.validate_language(&command.language)?;

        let mut work = Vec::new();
        let mut skipped = Vec::new();
        for (i, text) in command.texts.iter().enumerate() {
            let index = i + 1;
            // 批量条目不受单条长度上限约束
            let trimmed = text.trim();
            if trimmed.is_empty() {
                skipped.push(index);
            } else {
                work.push((index, trimmed));
            }
        }
        if work.is_empty() {
            return Err(SpeechError::NoUsableTexts.into());
        }

        let (archive_name, writer) = self.create_archive()?;

        let (items, size_bytes) = match self.fill(writer, &work, language).await {
            Ok(done) => done,
            Err(e) => {
                if let Err(cleanup) = self.archive.discard(&archive_name) {
                    tracing::warn!(archive = %archive_name, error = %cleanup, "Failed to discard archive");
                }
                tracing::warn!(archive = %archive_name, error = %e, "Batch synthesis aborted");
                return Err(e);
            }
        };

        tracing::info!(
            archive = %archive_name,
            items = items.len(),
            skipped = skipped.len(),
            size_bytes,
            "Batch synthesized"
        );

        Ok(SynthesizeBatchResponse {
            archive: archive_name,
            size_bytes,
            language,
            items,
            skipped,
        })
    }

    /// 创建归档；同一秒内已有同名归档时改用带序号的名字
    fn create_archive(&self) -> Result<(String, Box<dyn ArchiveWriter>), ApplicationError> {
        for attempt in 1..=MAX_ARCHIVE_ATTEMPTS {
            let index = (attempt > 1).then_some(attempt);
            let name = self.storage.allocate_name(FileKind::Archive, index, "zip");
            match self.archive.create(&name) {
                Ok(writer) => return Ok((name, writer)),
                Err(ArchiveError::AlreadyExists(_)) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(ApplicationError::StorageError(
            "no free archive name".to_string(),
        ))
    }

    /// 依次合成并写入归档，成功后收尾
    async fn fill(
        &self,
        mut writer: Box<dyn ArchiveWriter>,
        work: &[(usize, &str)],
        language: Language,
    ) -> Result<(Vec<BatchItem>, u64), ApplicationError> {
        let mut items = Vec::with_capacity(work.len());
        for &(index, text) in work {
            items.push(self.add_item(writer.as_mut(), index, text, language).await?);
        }
        let size = writer.finish()?;
        Ok((items, size))
    }

    async fn add_item(
        &self,
        writer: &mut dyn ArchiveWriter,
        index: usize,
        text: &str,
        language: Language,
    ) -> Result<BatchItem, ApplicationError> {
        let output = self
            .tts_engine
            .synthesize(SynthesisRequest {
                text: text.to_string(),
                language,
                slow: false,
            })
            .await?;

        if output.audio_data.is_empty() {
            return Err(ApplicationError::SynthesisError(format!(
                "engine returned no audio for item {}",
                index
            )));
        }

        // 每条先落盘为独立文件，打包后删除
        let temp = self.storage.allocate_name(
            FileKind::BatchItem,
            Some(index),
            AudioFormat::Mp3.extension(),
        );
        self.storage.write(&temp, &output.audio_data).await?;

        let entry = entry_name(index);
        let appended = writer.append(&entry, &output.audio_data);
        if let Err(e) = self.storage.delete(&temp).await {
            tracing::warn!(filename = %temp, error = %e, "Failed to remove batch item");
        }
        appended?;

        tracing::debug!(index, entry = %entry, bytes = output.audio_data.len(), "Batch item added");

        Ok(BatchItem {
            index,
            entry_name: entry,
            preview: self.policy.preview(text),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::handlers::test_support::{
        MemoryArchive, MemoryStorage, ScriptedEngine,
    };

    struct Fixture {
        storage: Arc<MemoryStorage>,
        archive: MemoryArchive,
        handler: SynthesizeBatchHandler,
    }

    fn fixture(engine: ScriptedEngine) -> Fixture {
        let storage = Arc::new(MemoryStorage::default());
        let archive = MemoryArchive::default();
        let handler = SynthesizeBatchHandler::new(
            Arc::new(SynthesisPolicy::default()),
            Arc::new(engine),
            storage.clone(),
            Arc::new(archive.clone()),
        );
        Fixture {
            storage,
            archive,
            handler,
        }
    }

    fn batch(texts: &[&str]) -> SynthesizeBatch {
        SynthesizeBatch {
            texts: texts.iter().map(|t| t.to_string()).collect(),
            language: "es".to_string(),
        }
    }

    #[tokio::test]
    async fn test_batch_keeps_original_indices() {
        let f = fixture(ScriptedEngine::default());

        let response = f.handler.handle(batch(&["Uno", "  ", "Tres"])).await.unwrap();

        let indices: Vec<usize> = response.items.iter().map(|i| i.index).collect();
        assert_eq!(indices, vec![1, 3]);
        assert_eq!(response.skipped, vec![2]);
        assert_eq!(response.items[1].entry_name, "audio_03.mp3");

        let finished = f.archive.finished.lock().unwrap();
        let entries: Vec<&str> = finished[&response.archive]
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(entries, vec!["audio_01.mp3", "audio_03.mp3"]);
        drop(finished);

        // 单条临时文件打包后被删除
        assert!(f.storage.names().is_empty());
    }

    #[tokio::test]
    async fn test_batch_preview_is_truncated() {
        let f = fixture(ScriptedEngine::default());
        let long = "palabra ".repeat(20);

        let response = f.handler.handle(batch(&[&long])).await.unwrap();

        assert!(response.items[0].preview.ends_with("..."));
    }

    #[tokio::test]
    async fn test_batch_size_limits() {
        let f = fixture(ScriptedEngine::default());

        let empty = f.handler.handle(batch(&[])).await.unwrap_err();
        assert_eq!(empty.kind(), "validation_error");

        let texts: Vec<&str> = vec!["x"; 11];
        let too_many = f.handler.handle(batch(&texts)).await.unwrap_err();
        assert_eq!(too_many.kind(), "validation_error");
    }

    #[tokio::test]
    async fn test_batch_items_are_not_length_capped() {
        let f = fixture(ScriptedEngine::default());
        let long = "a".repeat(6000);

        let response = f.handler.handle(batch(&[&long])).await.unwrap();

        assert_eq!(response.items.len(), 1);
    }

    #[tokio::test]
    async fn test_all_blank_batch_is_rejected() {
        let f = fixture(ScriptedEngine::default());

        let err = f.handler.handle(batch(&["", "   "])).await.unwrap_err();

        assert!(err.to_string().contains("no non-empty texts"));
        assert!(f.archive.finished.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_discards_archive() {
        let f = fixture(ScriptedEngine::failing_on("falla"));

        let err = f
            .handler
            .handle(batch(&["Uno", "falla", "Tres"]))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "synthesis_error");
        assert!(f.archive.finished.lock().unwrap().is_empty());
        assert_eq!(f.archive.discarded.lock().unwrap().len(), 1);
        assert!(f.storage.names().is_empty());
    }

    #[tokio::test]
    async fn test_empty_engine_output_aborts_batch() {
        let f = fixture(ScriptedEngine::silent_on("mudo"));

        let err = f
            .handler
            .handle(batch(&["Uno", "mudo"]))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "synthesis_error");
        assert!(err.to_string().contains("item 2"));
        assert!(f.archive.finished.lock().unwrap().is_empty());
        assert_eq!(f.archive.discarded.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_taken_archive_name_gets_index() {
        let f = fixture(ScriptedEngine::default());
        f.archive.collide_next(1);

        let response = f.handler.handle(batch(&["Uno"])).await.unwrap();

        assert!(response.archive.starts_with("archive_2_"));
        assert!(f.archive.finished.lock().unwrap().contains_key(&response.archive));
    }

    #[tokio::test]
    async fn test_concurrent_batches_get_distinct_archives() {
        let f = fixture(ScriptedEngine::default());

        let first = f.handler.handle(batch(&["Uno"])).await.unwrap();
        let second = f.handler.handle(batch(&["Dos"])).await.unwrap();

        assert_ne!(first.archive, second.archive);
        assert_eq!(f.archive.finished.lock().unwrap().len(), 2);
    }
}
