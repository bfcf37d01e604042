//! Symphonia Transcoder - 音频转码器
//!
//! 支持：
//! - MP3 / WAV 解码（symphonia）
//! - WAV 编码
//! - OGG/Opus 编码
//! - MP3 编码（需要 ffmpeg，不可用时不提供该格式）

use async_trait::async_trait;

use super::ffmpeg::FfmpegEncoder;
use super::opus_ogg::encode_ogg_opus;
use super::pcm::{decode, encode_wav, DecodedAudio};
use crate::application::ports::{
    AudioTranscoderPort, TranscodeConfig, TranscodeError, TranscodeResult,
};
use crate::domain::{AudioFormat, Quality};

/// 转码器配置
#[derive(Debug, Clone)]
pub struct SymphoniaTranscoderConfig {
    /// ffmpeg 可执行文件路径
    pub ffmpeg_path: String,
    /// OGG/Opus 码率（bps）
    pub ogg_bitrate: u32,
}

impl Default for SymphoniaTranscoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            ogg_bitrate: 64_000,
        }
    }
}

/// 音频转码器
pub struct SymphoniaTranscoder {
    config: SymphoniaTranscoderConfig,
    ffmpeg: FfmpegEncoder,
    mp3_available: bool,
}

impl SymphoniaTranscoder {
    pub fn new(config: SymphoniaTranscoderConfig, mp3_available: bool) -> Self {
        let ffmpeg = FfmpegEncoder::new(config.ffmpeg_path.clone());
        Self {
            config,
            ffmpeg,
            mp3_available,
        }
    }

    /// 检测 ffmpeg 后创建
    pub async fn detect(config: SymphoniaTranscoderConfig) -> Self {
        let ffmpeg = FfmpegEncoder::new(config.ffmpeg_path.clone());
        let mp3_available = ffmpeg.is_available().await;
        if mp3_available {
            tracing::info!(ffmpeg = %config.ffmpeg_path, "MP3 encoding enabled");
        } else {
            tracing::warn!(
                ffmpeg = %config.ffmpeg_path,
                "ffmpeg not found, MP3 output disabled"
            );
        }
        Self::new(config, mp3_available)
    }

    async fn decode_blocking(
        input: &[u8],
        source: AudioFormat,
    ) -> Result<DecodedAudio, TranscodeError> {
        let data = input.to_vec();
        tokio::task::spawn_blocking(move || decode(&data, source))
            .await
            .map_err(|e| TranscodeError::DecodingError(format!("decoder task failed: {}", e)))?
    }
}

#[async_trait]
impl AudioTranscoderPort for SymphoniaTranscoder {
    async fn transcode(
        &self,
        input: &[u8],
        source: AudioFormat,
        config: &TranscodeConfig,
    ) -> Result<TranscodeResult, TranscodeError> {
        if !self.supports_format(config.format) {
            return Err(TranscodeError::UnsupportedFormat(config.format.to_string()));
        }

        let original_size = input.len();
        let decoded = Self::decode_blocking(input, source).await?;

        let audio_data = match config.format {
            // 同为 WAV 时原样返回
            AudioFormat::Wav if source == AudioFormat::Wav => input.to_vec(),
            AudioFormat::Wav => encode_wav(&decoded),
            AudioFormat::Ogg => {
                let bitrate = config.bitrate.unwrap_or(self.config.ogg_bitrate);
                let pcm = decoded.clone();
                tokio::task::spawn_blocking(move || encode_ogg_opus(&pcm, bitrate))
                    .await
                    .map_err(|e| {
                        TranscodeError::EncodingError(format!("encoder task failed: {}", e))
                    })??
            }
            AudioFormat::Mp3 => {
                let bitrate = config
                    .bitrate
                    .unwrap_or_else(|| Quality::default().mp3_bitrate());
                self.ffmpeg.wav_to_mp3(encode_wav(&decoded), bitrate).await?
            }
        };

        tracing::debug!(
            source = %source,
            target = %config.format,
            original_size,
            transcoded_size = audio_data.len(),
            "Transcoded audio"
        );

        Ok(TranscodeResult {
            transcoded_size: audio_data.len(),
            audio_data,
            format: config.format,
            duration_ms: decoded.duration_ms(),
            sample_rate: decoded.sample_rate,
            channels: decoded.channels,
            original_size,
        })
    }

    fn supports_format(&self, format: AudioFormat) -> bool {
        match format {
            AudioFormat::Wav | AudioFormat::Ogg => true,
            AudioFormat::Mp3 => self.mp3_available,
        }
    }
}
