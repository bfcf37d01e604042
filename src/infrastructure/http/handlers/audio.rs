//! Audio Handlers - 下载已生成的文件

use axum::{
    body::Body,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use super::audio_headers;
use crate::application::GetAudioQuery;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 流式返回存储目录中的文件
pub async fn get_audio(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let result = state
        .get_audio_handler
        .handle(GetAudioQuery { filename })
        .await?;

    // 查询与打开之间文件可能被清理
    let file = match tokio::fs::File::open(&result.path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::NotFound(format!(
                "Audio file not found: {}",
                result.filename
            )));
        }
        Err(e) => return Err(ApiError::internal(format!("Failed to open audio file: {}", e))),
    };

    let metadata = file
        .metadata()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to get file metadata: {}", e)))?;

    let headers = audio_headers(&result.filename, result.content_type, metadata.len())?;
    let body = Body::from_stream(ReaderStream::new(file));

    Ok((headers, body).into_response())
}
