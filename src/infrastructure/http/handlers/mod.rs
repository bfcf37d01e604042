//! HTTP Handlers

mod audio;
mod history;
mod system;
mod tts;

pub use audio::*;
pub use history::*;
pub use system::*;
pub use tts::*;

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};

use super::error::ApiError;

pub const X_AUDIO_FILENAME: HeaderName = HeaderName::from_static("x-audio-filename");
pub const X_HISTORY_ID: HeaderName = HeaderName::from_static("x-history-id");

/// 音频下载响应头
pub(crate) fn audio_headers(
    filename: &str,
    content_type: &'static str,
    content_length: u64,
) -> Result<HeaderMap, ApiError> {
    let filename_value = HeaderValue::from_str(filename)
        .map_err(|e| ApiError::internal(format!("invalid header value: {}", e)))?;
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .map_err(|e| ApiError::internal(format!("invalid header value: {}", e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(content_length));
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    headers.insert(X_AUDIO_FILENAME, filename_value);
    Ok(headers)
}
