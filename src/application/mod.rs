//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（TtsEngine、AudioStorage、Transcoder、Archive、Repository）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    handlers::{
        BatchItem, SynthesizeBatchHandler, SynthesizeBatchResponse, SynthesizeHandler,
        SynthesizeResponse, ToggleFavoriteHandler, ToggleFavoriteResponse, TranscodeHandler,
        TranscodeResponse,
    },
    Synthesize, SynthesizeBatch, ToggleFavorite, Transcode,
};

pub use error::ApplicationError;

pub use ports::{
    ArchiveError, ArchivePort, ArchiveWriter, AudioStorageError, AudioStoragePort,
    AudioTranscoderPort, FileKind, HistoryRecord, HistoryRepositoryPort, NewHistoryRecord,
    RepositoryError, StorageStats, SweepPolicy, SweepResult, SynthesisOutput, SynthesisRequest,
    TranscodeConfig, TranscodeError, TranscodeResult, TtsEnginePort, TtsError,
};

pub use queries::{
    handlers::{
        GetAudioHandler, HealthCheckHandler, ListHistoryHandler, ListTemplatesHandler,
        SystemInfoHandler,
    },
    GetAudioQuery, GetAudioResponse, GetSystemInfo, HealthCheck, HealthStatus, HistoryEntry,
    ListHistory, ListTemplates, SystemInfo,
};
