//! Fake TTS Client - 离线开发和测试用的 TTS 客户端
//!
//! 不调用外部服务，返回由静音 MP3 帧拼成的音频，
//! 帧数随文本长度增长，慢速时加倍。

use async_trait::async_trait;

use crate::application::ports::{SynthesisOutput, SynthesisRequest, TtsEnginePort, TtsError};

/// MPEG-1 Layer III, 128 kbps, 44.1 kHz, 单声道
const FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0xC4];
/// 144 * 128000 / 44100，无填充位
const FRAME_LEN: usize = 417;

/// Fake TTS Client 配置
#[derive(Debug, Clone)]
pub struct FakeTtsClientConfig {
    /// 每个字符对应的帧数
    pub frames_per_char: usize,
    /// 文本包含该标记时返回服务错误
    pub fail_marker: Option<String>,
}

impl Default for FakeTtsClientConfig {
    fn default() -> Self {
        Self {
            frames_per_char: 2,
            fail_marker: None,
        }
    }
}

/// Fake TTS Client
pub struct FakeTtsClient {
    config: FakeTtsClientConfig,
}

impl FakeTtsClient {
    pub fn new(config: FakeTtsClientConfig) -> Self {
        tracing::info!(
            frames_per_char = config.frames_per_char,
            "FakeTtsClient initialized"
        );
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeTtsClientConfig::default())
    }

    fn silent_frames(count: usize) -> Vec<u8> {
        let mut frame = vec![0u8; FRAME_LEN];
        frame[..4].copy_from_slice(&FRAME_HEADER);
        frame.repeat(count)
    }
}

#[async_trait]
impl TtsEnginePort for FakeTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisOutput, TtsError> {
        if request.text.trim().is_empty() {
            return Err(TtsError::EmptyText);
        }
        if let Some(marker) = &self.config.fail_marker {
            if request.text.contains(marker.as_str()) {
                return Err(TtsError::ServiceError("simulated failure".to_string()));
            }
        }

        let mut frames = request.text.chars().count().max(1) * self.config.frames_per_char.max(1);
        if request.slow {
            frames *= 2;
        }

        tracing::debug!(
            text_len = request.text.len(),
            language = %request.language,
            frames,
            "FakeTtsClient: returning silent audio"
        );

        Ok(SynthesisOutput {
            audio_data: Self::silent_frames(frames),
            chunk_count: 1,
        })
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Language;

    fn request(text: &str, slow: bool) -> SynthesisRequest {
        SynthesisRequest {
            text: text.to_string(),
            language: Language::Es,
            slow,
        }
    }

    #[tokio::test]
    async fn test_output_is_mp3_frames() {
        let client = FakeTtsClient::with_defaults();

        let output = client.synthesize(request("Hola", false)).await.unwrap();

        assert_eq!(output.audio_data.len(), 4 * 2 * FRAME_LEN);
        assert_eq!(&output.audio_data[..4], &FRAME_HEADER);
    }

    #[tokio::test]
    async fn test_slow_is_longer() {
        let client = FakeTtsClient::with_defaults();

        let normal = client.synthesize(request("Hola", false)).await.unwrap();
        let slow = client.synthesize(request("Hola", true)).await.unwrap();

        assert_eq!(slow.audio_data.len(), normal.audio_data.len() * 2);
    }

    #[tokio::test]
    async fn test_fail_marker() {
        let client = FakeTtsClient::new(FakeTtsClientConfig {
            fail_marker: Some("#fail".to_string()),
            ..Default::default()
        });

        let err = client.synthesize(request("texto #fail", false)).await.unwrap_err();

        assert!(matches!(err, TtsError::ServiceError(_)));
    }
}
