//! Audio Query Handlers

use std::path::Path;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::AudioStoragePort;
use crate::application::queries::audio_queries::{GetAudioQuery, GetAudioResponse};
use crate::domain::AudioFormat;

/// 根据扩展名推断 Content-Type
pub fn content_type_for(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    match AudioFormat::from_extension(ext) {
        Some(format) => format.content_type(),
        None if ext.eq_ignore_ascii_case("zip") => "application/zip",
        None => "application/octet-stream",
    }
}

/// GetAudio Handler - 定位已生成的文件
pub struct GetAudioHandler {
    storage: Arc<dyn AudioStoragePort>,
}

impl GetAudioHandler {
    pub fn new(storage: Arc<dyn AudioStoragePort>) -> Self {
        Self { storage }
    }

    pub async fn handle(&self, query: GetAudioQuery) -> Result<GetAudioResponse, ApplicationError> {
        let path = self.storage.path_of(&query.filename)?;
        if !self.storage.exists(&query.filename).await {
            return Err(ApplicationError::not_found("Audio file", &query.filename));
        }

        Ok(GetAudioResponse {
            content_type: content_type_for(&query.filename),
            filename: query.filename,
            path,
        })
    }
}
