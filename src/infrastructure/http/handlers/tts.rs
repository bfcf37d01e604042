//! TTS HTTP Handlers - 合成、批量合成、转码

use axum::{
    extract::State,
    http::HeaderValue,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::{audio_headers, X_HISTORY_ID};
use crate::application::{Synthesize, SynthesizeBatch, Transcode};
use crate::infrastructure::http::dto::{
    ApiResponse, BatchRequest, BatchResponse, SynthesizeRequest, TranscodeRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 单条合成，直接返回 MP3
pub async fn synthesize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SynthesizeRequest>,
) -> Result<Response, ApiError> {
    let command = Synthesize {
        text: req.text,
        language: req.language,
        speed: req.speed,
    };

    let result = state.synthesize_handler.handle(command).await?;

    let mut headers = audio_headers(
        &result.filename,
        result.format.content_type(),
        result.audio_data.len() as u64,
    )?;
    headers.insert(X_HISTORY_ID, HeaderValue::from(result.history_id));

    Ok((headers, result.audio_data).into_response())
}

/// 批量合成，返回归档清单
pub async fn synthesize_batch(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<ApiResponse<BatchResponse>>, ApiError> {
    let command = SynthesizeBatch {
        texts: req.texts,
        language: req.language,
    };

    let result = state.synthesize_batch_handler.handle(command).await?;

    Ok(Json(ApiResponse::success(result.into())))
}

/// 转码已生成的文件
pub async fn transcode(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TranscodeRequest>,
) -> Result<Response, ApiError> {
    let command = Transcode {
        filename: req.filename,
        format: req.format,
        quality: req.quality,
    };

    let result = state.transcode_handler.handle(command).await?;

    let headers = audio_headers(
        &result.filename,
        result.format.content_type(),
        result.audio_data.len() as u64,
    )?;

    Ok((headers, result.audio_data).into_response())
}
