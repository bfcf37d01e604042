//! Google TTS Client - 调用 Google 翻译的公开朗读接口
//!
//! 实现 TtsEnginePort trait
//!
//! 外部接口:
//! GET {base_url}/translate_tts?ie=UTF-8&client=tw-ob&tl=es&q=...&ttsspeed=1
//! Response: audio/mpeg binary
//!
//! 单次请求的文本长度有限，长文本按句子切块后逐块请求，
//! MP3 帧可以直接首尾拼接。

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::application::ports::{SynthesisOutput, SynthesisRequest, TtsEnginePort, TtsError};
use crate::domain::chunk_text;

/// 慢速朗读时的 ttsspeed 参数
const SLOW_SPEED: &str = "0.24";
const NORMAL_SPEED: &str = "1";

/// Google TTS 客户端配置
#[derive(Debug, Clone)]
pub struct GoogleTtsClientConfig {
    /// 服务基础 URL
    pub base_url: String,
    /// 单个请求超时时间（秒）
    pub timeout_secs: u64,
    /// 每个请求的最大字符数
    pub chunk_chars: usize,
}

impl Default for GoogleTtsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://translate.google.com".to_string(),
            timeout_secs: 30,
            chunk_chars: 100,
        }
    }
}

impl GoogleTtsClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_chunk_chars(mut self, chars: usize) -> Self {
        self.chunk_chars = chars;
        self
    }
}

/// Google TTS 客户端
pub struct GoogleTtsClient {
    client: Client,
    config: GoogleTtsClientConfig,
}

impl GoogleTtsClient {
    pub fn new(config: GoogleTtsClientConfig) -> Result<Self, TtsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("vocalis/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TtsError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn with_default_config() -> Result<Self, TtsError> {
        Self::new(GoogleTtsClientConfig::default())
    }

    fn tts_url(&self) -> String {
        format!("{}/translate_tts", self.config.base_url.trim_end_matches('/'))
    }

    /// 请求单个文本块
    async fn fetch_chunk(
        &self,
        chunk: &str,
        language: &str,
        slow: bool,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>, TtsError> {
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();
        let speed = if slow { SLOW_SPEED } else { NORMAL_SPEED };

        let response = self
            .client
            .get(self.tts_url())
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", language),
                ("q", chunk),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", textlen.as_str()),
                ("ttsspeed", speed),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TtsError::Timeout
                } else if e.is_connect() {
                    TtsError::NetworkError(format!("Cannot connect to TTS service: {}", e))
                } else {
                    TtsError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let snippet: String = error_text.chars().take(200).collect();
            return Err(TtsError::ServiceError(format!("HTTP {}: {}", status, snippet)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Failed to read audio: {}", e)))?;

        if bytes.is_empty() {
            return Err(TtsError::InvalidResponse("empty audio chunk".to_string()));
        }

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl TtsEnginePort for GoogleTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisOutput, TtsError> {
        let chunks = chunk_text(&request.text, self.config.chunk_chars);
        if chunks.is_empty() {
            return Err(TtsError::EmptyText);
        }

        let language = request.language.engine_code();
        tracing::debug!(
            url = %self.tts_url(),
            language,
            slow = request.slow,
            chunks = chunks.len(),
            "Sending TTS requests"
        );

        let total = chunks.len();
        let mut audio_data = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let part = self
                .fetch_chunk(chunk, language, request.slow, idx, total)
                .await?;
            audio_data.extend_from_slice(&part);
        }

        tracing::debug!(
            chunks = total,
            audio_size = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(SynthesisOutput {
            audio_data,
            chunk_count: total,
        })
    }

    fn name(&self) -> &'static str {
        "google"
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .head(&self.config.base_url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => !response.status().is_server_error(),
            Err(_) => false,
        }
    }
}
