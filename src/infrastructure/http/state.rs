//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    SynthesizeBatchHandler, SynthesizeHandler, ToggleFavoriteHandler, TranscodeHandler,
    // Query handlers
    GetAudioHandler, HealthCheckHandler, ListHistoryHandler, ListTemplatesHandler,
    SystemInfoHandler,
    // Ports
    ArchivePort, AudioStoragePort, AudioTranscoderPort, HistoryRepositoryPort, SweepPolicy,
    TtsEnginePort,
};
use crate::domain::SynthesisPolicy;

/// 应用状态
pub struct AppState {
    // ========== Command Handlers ==========
    pub synthesize_handler: SynthesizeHandler,
    pub synthesize_batch_handler: SynthesizeBatchHandler,
    pub transcode_handler: TranscodeHandler,
    pub toggle_favorite_handler: ToggleFavoriteHandler,

    // ========== Query Handlers ==========
    pub list_history_handler: ListHistoryHandler,
    pub get_audio_handler: GetAudioHandler,
    pub list_templates_handler: ListTemplatesHandler,
    pub system_info_handler: SystemInfoHandler,
    pub health_check_handler: HealthCheckHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        policy: Arc<SynthesisPolicy>,
        sweep_policy: SweepPolicy,
        tts_engine: Arc<dyn TtsEnginePort>,
        transcoder: Arc<dyn AudioTranscoderPort>,
        storage: Arc<dyn AudioStoragePort>,
        archive: Arc<dyn ArchivePort>,
        history_repo: Arc<dyn HistoryRepositoryPort>,
    ) -> Self {
        Self {
            // Command handlers
            synthesize_handler: SynthesizeHandler::new(
                policy.clone(),
                tts_engine.clone(),
                storage.clone(),
                history_repo.clone(),
            ),
            synthesize_batch_handler: SynthesizeBatchHandler::new(
                policy.clone(),
                tts_engine.clone(),
                storage.clone(),
                archive,
            ),
            transcode_handler: TranscodeHandler::new(storage.clone(), transcoder.clone()),
            toggle_favorite_handler: ToggleFavoriteHandler::new(history_repo.clone()),

            // Query handlers
            list_history_handler: ListHistoryHandler::new(history_repo.clone(), storage.clone()),
            get_audio_handler: GetAudioHandler::new(storage.clone()),
            list_templates_handler: ListTemplatesHandler::new(),
            system_info_handler: SystemInfoHandler::new(
                policy,
                sweep_policy,
                tts_engine.clone(),
                transcoder,
                storage,
                history_repo.clone(),
            ),
            health_check_handler: HealthCheckHandler::new(tts_engine, history_repo),
        }
    }
}
