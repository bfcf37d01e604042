//! Synthesis Command Handlers
//!
//! 单条合成：校验 -> 引擎合成 -> 写文件 -> 写历史。
//! 历史写入失败时删除已写的文件，保证每个成功响应都有对应记录。

use std::sync::Arc;

use crate::application::commands::Synthesize;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    AudioStoragePort, FileKind, HistoryRepositoryPort, NewHistoryRecord, SynthesisRequest,
    TtsEnginePort,
};
use crate::domain::{AudioFormat, Language, SynthesisPolicy};

/// 单条合成响应
#[derive(Debug, Clone)]
pub struct SynthesizeResponse {
    pub history_id: i64,
    pub filename: String,
    pub language: Language,
    pub slow: bool,
    pub format: AudioFormat,
    pub audio_data: Vec<u8>,
}

/// Synthesize Handler
pub struct SynthesizeHandler {
    policy: Arc<SynthesisPolicy>,
    tts_engine: Arc<dyn TtsEnginePort>,
    storage: Arc<dyn AudioStoragePort>,
    history_repo: Arc<dyn HistoryRepositoryPort>,
}

impl SynthesizeHandler {
    pub fn new(
        policy: Arc<SynthesisPolicy>,
        tts_engine: Arc<dyn TtsEnginePort>,
        storage: Arc<dyn AudioStoragePort>,
        history_repo: Arc<dyn HistoryRepositoryPort>,
    ) -> Self {
        Self {
            policy,
            tts_engine,
            storage,
            history_repo,
        }
    }

    pub async fn handle(&self, command: Synthesize) -> Result<SynthesizeResponse, ApplicationError> {
        let text = self.policy.validate_text(&command.text)?;
        let language = self.policy.validate_language(&command.language)?;
        let speed = self.policy.validate_speed(command.speed)?;
        let slow = self.policy.is_slow(speed);

        let output = self
            .tts_engine
            .synthesize(SynthesisRequest {
                text: text.to_string(),
                language,
                slow,
            })
            .await
            .map_err(|e| {
                tracing::warn!(engine = self.tts_engine.name(), error = %e, "Synthesis failed");
                ApplicationError::from(e)
            })?;

        if output.audio_data.is_empty() {
            return Err(ApplicationError::SynthesisError(
                "engine returned no audio".to_string(),
            ));
        }

        let format = AudioFormat::Mp3;
        let filename = self
            .storage
            .allocate_name(FileKind::Speech, None, format.extension());
        self.storage.write(&filename, &output.audio_data).await?;

        let record = NewHistoryRecord {
            text: command.text,
            language,
            filename: filename.clone(),
        };
        let history_id = match self.history_repo.append(record).await {
            Ok(id) => id,
            Err(e) => {
                // 回滚：没有历史记录的文件不应留下
                if let Err(cleanup) = self.storage.delete(&filename).await {
                    tracing::warn!(filename = %filename, error = %cleanup, "Failed to remove orphaned audio");
                }
                tracing::error!(filename = %filename, error = %e, "Failed to record history");
                return Err(e.into());
            }
        };

        tracing::info!(
            history_id,
            filename = %filename,
            language = %language,
            slow,
            chunks = output.chunk_count,
            bytes = output.audio_data.len(),
            "Speech synthesized"
        );

        Ok(SynthesizeResponse {
            history_id,
            filename,
            language,
            slow,
            format,
            audio_data: output.audio_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::handlers::test_support::{
        MemoryHistory, MemoryStorage, ScriptedEngine,
    };

    struct Fixture {
        engine: Arc<ScriptedEngine>,
        storage: Arc<MemoryStorage>,
        history: Arc<MemoryHistory>,
        handler: SynthesizeHandler,
    }

    fn fixture(engine: ScriptedEngine, history: MemoryHistory) -> Fixture {
        let engine = Arc::new(engine);
        let storage = Arc::new(MemoryStorage::default());
        let history = Arc::new(history);
        let handler = SynthesizeHandler::new(
            Arc::new(SynthesisPolicy::default()),
            engine.clone(),
            storage.clone(),
            history.clone(),
        );
        Fixture {
            engine,
            storage,
            history,
            handler,
        }
    }

    fn command(text: &str, language: &str, speed: f32) -> Synthesize {
        Synthesize {
            text: text.to_string(),
            language: language.to_string(),
            speed,
        }
    }

    #[tokio::test]
    async fn test_synthesize_writes_file_and_history() {
        let f = fixture(ScriptedEngine::default(), MemoryHistory::default());

        let response = f.handler.handle(command("  Hola mundo ", "es", 1.0)).await.unwrap();

        assert!(response.filename.starts_with("tts_"));
        assert!(response.filename.ends_with(".mp3"));
        assert!(!response.slow);
        assert_eq!(f.storage.names(), vec![response.filename.clone()]);

        let record = f.history.find_by_id(response.history_id).await.unwrap().unwrap();
        assert_eq!(record.filename, response.filename);
        // 历史保存原始输入，引擎收到去除空白后的文本
        assert_eq!(record.text, "  Hola mundo ");
        assert_eq!(f.engine.requests()[0].text, "Hola mundo");
    }

    #[tokio::test]
    async fn test_low_speed_maps_to_slow() {
        let f = fixture(ScriptedEngine::default(), MemoryHistory::default());

        let response = f.handler.handle(command("Hello", "en", 0.6)).await.unwrap();

        assert!(response.slow);
        assert!(f.engine.requests()[0].slow);
    }

    #[tokio::test]
    async fn test_validation_failures_leave_no_trace() {
        let f = fixture(ScriptedEngine::default(), MemoryHistory::default());

        let cases = [
            command("   ", "es", 1.0),
            command("Hola", "xx", 1.0),
            command("Hola", "es", 3.0),
            command(&"a".repeat(5001), "es", 1.0),
        ];
        for cmd in cases {
            let err = f.handler.handle(cmd).await.unwrap_err();
            assert_eq!(err.kind(), "validation_error");
        }

        assert!(f.engine.requests().is_empty());
        assert!(f.storage.names().is_empty());
        assert_eq!(f.history.len(), 0);
    }

    #[tokio::test]
    async fn test_engine_failure_is_synthesis_error() {
        let f = fixture(ScriptedEngine::failing_on("boom"), MemoryHistory::default());

        let err = f.handler.handle(command("boom", "es", 1.0)).await.unwrap_err();

        assert_eq!(err.kind(), "synthesis_error");
        assert!(f.storage.names().is_empty());
        assert_eq!(f.history.len(), 0);
    }

    #[tokio::test]
    async fn test_history_failure_removes_written_file() {
        let f = fixture(ScriptedEngine::default(), MemoryHistory::failing());

        let err = f.handler.handle(command("Hola", "es", 1.0)).await.unwrap_err();

        assert_eq!(err.kind(), "persistence_error");
        assert!(f.storage.names().is_empty());
    }
}
