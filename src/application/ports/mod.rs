//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod archive;
mod audio_storage;
mod audio_transcoder;
mod repositories;
mod tts_engine;

pub use archive::{ArchiveError, ArchivePort, ArchiveWriter};
pub use audio_storage::{
    AudioStorageError, AudioStoragePort, FileKind, StorageStats, SweepPolicy, SweepResult,
};
pub use audio_transcoder::{AudioTranscoderPort, TranscodeConfig, TranscodeError, TranscodeResult};
pub use repositories::{HistoryRecord, HistoryRepositoryPort, NewHistoryRecord, RepositoryError};
pub use tts_engine::{SynthesisOutput, SynthesisRequest, TtsEnginePort, TtsError};
