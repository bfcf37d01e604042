//! Audio Transcoder Port - 音频转码抽象
//!
//! 定义音频转码的抽象接口，将已存储的音频（通常为 MP3）转换为其他格式

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{AudioFormat, Quality};

/// 转码错误
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// 转码配置
#[derive(Debug, Clone)]
pub struct TranscodeConfig {
    /// 输出格式
    pub format: AudioFormat,
    /// 目标比特率（bps）
    /// None 表示由编码器决定（WAV 无比特率，OGG 使用固定码率）
    pub bitrate: Option<u32>,
}

impl TranscodeConfig {
    /// 根据质量档位生成配置
    ///
    /// 只有 MP3 区分档位；OGG 使用固定编码参数
    pub fn for_quality(format: AudioFormat, quality: Quality) -> Self {
        let bitrate = match format {
            AudioFormat::Mp3 => Some(quality.mp3_bitrate()),
            AudioFormat::Wav | AudioFormat::Ogg => None,
        };
        Self { format, bitrate }
    }
}

/// 转码结果
#[derive(Debug, Clone)]
pub struct TranscodeResult {
    /// 转码后的音频数据
    pub audio_data: Vec<u8>,
    /// 输出格式
    pub format: AudioFormat,
    /// 时长（毫秒）
    pub duration_ms: u64,
    /// 采样率
    pub sample_rate: u32,
    /// 声道数
    pub channels: u8,
    /// 原始大小（字节）
    pub original_size: usize,
    /// 转码后大小（字节）
    pub transcoded_size: usize,
}

/// Audio Transcoder Port
#[async_trait]
pub trait AudioTranscoderPort: Send + Sync {
    /// 转码音频
    ///
    /// # Arguments
    /// * `input` - 输入音频数据
    /// * `source` - 输入音频格式
    /// * `config` - 转码配置
    async fn transcode(
        &self,
        input: &[u8],
        source: AudioFormat,
        config: &TranscodeConfig,
    ) -> Result<TranscodeResult, TranscodeError>;

    /// 检查是否支持指定输出格式
    fn supports_format(&self, format: AudioFormat) -> bool;
}
