//! System Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    AudioStoragePort, AudioTranscoderPort, HistoryRepositoryPort, SweepPolicy, TtsEnginePort,
};
use crate::application::queries::system_queries::{
    GetSystemInfo, HealthCheck, HealthStatus, LanguageInfo, LimitsInfo, ListTemplates,
    StorageInfo, SystemInfo,
};
use crate::domain::{builtin_templates, AudioFormat, Language, SynthesisPolicy, TextTemplate};

/// ListTemplates Handler
pub struct ListTemplatesHandler;

impl ListTemplatesHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(&self, query: ListTemplates) -> Result<Vec<TextTemplate>, ApplicationError> {
        let language = query
            .language
            .as_deref()
            .map(str::parse::<Language>)
            .transpose()?;

        Ok(builtin_templates()
            .iter()
            .filter(|t| language.map_or(true, |l| t.language == l))
            .cloned()
            .collect())
    }
}

impl Default for ListTemplatesHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// GetSystemInfo Handler
pub struct SystemInfoHandler {
    policy: Arc<SynthesisPolicy>,
    sweep_policy: SweepPolicy,
    tts_engine: Arc<dyn TtsEnginePort>,
    transcoder: Arc<dyn AudioTranscoderPort>,
    storage: Arc<dyn AudioStoragePort>,
    history_repo: Arc<dyn HistoryRepositoryPort>,
}

impl SystemInfoHandler {
    pub fn new(
        policy: Arc<SynthesisPolicy>,
        sweep_policy: SweepPolicy,
        tts_engine: Arc<dyn TtsEnginePort>,
        transcoder: Arc<dyn AudioTranscoderPort>,
        storage: Arc<dyn AudioStoragePort>,
        history_repo: Arc<dyn HistoryRepositoryPort>,
    ) -> Self {
        Self {
            policy,
            sweep_policy,
            tts_engine,
            transcoder,
            storage,
            history_repo,
        }
    }

    pub async fn handle(&self, _query: GetSystemInfo) -> Result<SystemInfo, ApplicationError> {
        let stats = self.storage.stats().await?;
        let history_count = self.history_repo.count().await?;
        let (min_speed, max_speed) = self.policy.speed_range();

        Ok(SystemInfo {
            version: env!("CARGO_PKG_VERSION"),
            engine: self.tts_engine.name(),
            languages: self
                .policy
                .languages()
                .iter()
                .map(|l| LanguageInfo {
                    code: l.as_str(),
                    name: l.display_name(),
                })
                .collect(),
            output_formats: [AudioFormat::Mp3, AudioFormat::Wav, AudioFormat::Ogg]
                .into_iter()
                .filter(|f| self.transcoder.supports_format(*f))
                .collect(),
            limits: LimitsInfo {
                max_text_chars: self.policy.max_text_chars(),
                max_batch_items: self.policy.max_batch_items(),
                min_speed,
                max_speed,
            },
            storage: StorageInfo {
                file_count: stats.file_count,
                used_bytes: stats.used_bytes,
                retention_secs: self.sweep_policy.max_age.as_secs(),
            },
            history_count,
        })
    }
}

/// HealthCheck Handler
pub struct HealthCheckHandler {
    tts_engine: Arc<dyn TtsEnginePort>,
    history_repo: Arc<dyn HistoryRepositoryPort>,
}

impl HealthCheckHandler {
    pub fn new(
        tts_engine: Arc<dyn TtsEnginePort>,
        history_repo: Arc<dyn HistoryRepositoryPort>,
    ) -> Self {
        Self {
            tts_engine,
            history_repo,
        }
    }

    /// 健康检查本身不返回错误，依赖不可用时报告 degraded
    pub async fn handle(&self, _query: HealthCheck) -> HealthStatus {
        let engine_available = self.tts_engine.health_check().await;
        let database_available = match self.history_repo.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                false
            }
        };

        HealthStatus {
            status: if engine_available && database_available {
                "ok"
            } else {
                "degraded"
            },
            engine_available,
            database_available,
        }
    }
}
