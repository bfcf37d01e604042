//! History HTTP Handlers

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::application::{ListHistory, ToggleFavorite};
use crate::infrastructure::http::dto::{
    ApiResponse, HistoryEntryDto, HistoryParams, ToggleFavoriteRequest, ToggleFavoriteResponseDto,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

pub async fn list_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<ApiResponse<Vec<HistoryEntryDto>>>, ApiError> {
    let entries = state
        .list_history_handler
        .handle(ListHistory {
            limit: params.limit,
        })
        .await?;

    Ok(Json(ApiResponse::success(
        entries.into_iter().map(Into::into).collect(),
    )))
}

pub async fn toggle_favorite(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ToggleFavoriteRequest>,
) -> Result<Json<ApiResponse<ToggleFavoriteResponseDto>>, ApiError> {
    let result = state
        .toggle_favorite_handler
        .handle(ToggleFavorite { id: req.id })
        .await?;

    Ok(Json(ApiResponse::success(ToggleFavoriteResponseDto {
        id: result.id,
        is_favorite: result.is_favorite,
    })))
}
