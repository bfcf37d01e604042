//! Transcode Command Handler

use std::path::Path;
use std::sync::Arc;

use crate::application::commands::Transcode;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    AudioStoragePort, AudioTranscoderPort, FileKind, TranscodeConfig,
};
use crate::domain::{AudioFormat, Quality};

/// 转码响应
#[derive(Debug, Clone)]
pub struct TranscodeResponse {
    pub filename: String,
    pub source: String,
    pub format: AudioFormat,
    pub quality: Quality,
    pub duration_ms: u64,
    pub audio_data: Vec<u8>,
}

/// Transcode Handler
pub struct TranscodeHandler {
    storage: Arc<dyn AudioStoragePort>,
    transcoder: Arc<dyn AudioTranscoderPort>,
}

impl TranscodeHandler {
    pub fn new(
        storage: Arc<dyn AudioStoragePort>,
        transcoder: Arc<dyn AudioTranscoderPort>,
    ) -> Self {
        Self {
            storage,
            transcoder,
        }
    }

    pub async fn handle(&self, command: Transcode) -> Result<TranscodeResponse, ApplicationError> {
        let format: AudioFormat = command.format.parse()?;
        let quality = command
            .quality
            .as_deref()
            .map(str::parse::<Quality>)
            .transpose()?
            .unwrap_or_default();

        // 源文件缺失优先于输出格式不可用
        let input = self.storage.read(&command.filename).await?;
        if !self.transcoder.supports_format(format) {
            return Err(ApplicationError::TranscodeError(format!(
                "output format {} is not available",
                format
            )));
        }

        let source_format = Path::new(&command.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(AudioFormat::from_extension)
            .ok_or_else(|| {
                ApplicationError::validation(format!(
                    "not an audio file: {}",
                    command.filename
                ))
            })?;

        let config = TranscodeConfig::for_quality(format, quality);
        let result = self
            .transcoder
            .transcode(&input, source_format, &config)
            .await
            .map_err(|e| {
                tracing::warn!(source = %command.filename, target = %format, error = %e, "Transcode failed");
                ApplicationError::from(e)
            })?;

        let filename = self
            .storage
            .allocate_name(FileKind::Converted, None, format.extension());
        self.storage.write(&filename, &result.audio_data).await?;

        tracing::info!(
            source = %command.filename,
            filename = %filename,
            quality = quality.as_str(),
            original_size = result.original_size,
            transcoded_size = result.transcoded_size,
            "Audio transcoded"
        );

        Ok(TranscodeResponse {
            filename,
            source: command.filename,
            format,
            quality,
            duration_ms: result.duration_ms,
            audio_data: result.audio_data,
        })
    }
}
