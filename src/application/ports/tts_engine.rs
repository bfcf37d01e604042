//! TTS Engine Port - 语音合成引擎抽象
//!
//! 定义 TTS 合成的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Language;

/// TTS 错误
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Empty text")]
    EmptyText,
}

/// TTS 合成请求
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// 要合成的文本内容
    pub text: String,
    /// 目标语言
    pub language: Language,
    /// 慢速朗读（引擎只提供慢速/正常两档）
    pub slow: bool,
}

/// TTS 合成结果
#[derive(Debug, Clone)]
pub struct SynthesisOutput {
    /// MP3 编码的音频数据
    pub audio_data: Vec<u8>,
    /// 实际发出的引擎请求数（长文本会被分块）
    pub chunk_count: usize,
}

/// TTS Engine Port
///
/// 外部语音合成服务的抽象接口
#[async_trait]
pub trait TtsEnginePort: Send + Sync {
    /// 执行语音合成，返回 MP3 音频
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisOutput, TtsError>;

    /// 引擎名称（用于日志和系统信息）
    fn name(&self) -> &'static str;

    /// 检查 TTS 服务是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
