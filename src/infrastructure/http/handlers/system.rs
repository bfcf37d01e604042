//! System Handlers - 模板、系统信息、健康检查

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::application::{GetSystemInfo, HealthCheck, HealthStatus, ListTemplates, SystemInfo};
use crate::domain::TextTemplate;
use crate::infrastructure::http::dto::{ApiResponse, TemplateParams};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

pub async fn list_templates(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TemplateParams>,
) -> Result<Json<ApiResponse<Vec<TextTemplate>>>, ApiError> {
    let templates = state
        .list_templates_handler
        .handle(ListTemplates {
            language: params.language,
        })
        .await?;

    Ok(Json(ApiResponse::success(templates)))
}

pub async fn system_info(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SystemInfo>>, ApiError> {
    let info = state.system_info_handler.handle(GetSystemInfo).await?;
    Ok(Json(ApiResponse::success(info)))
}

/// 健康检查 - 依赖不可用时仍返回 errno 0，由 status 字段表示
pub async fn health(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthStatus>> {
    Json(ApiResponse::success(
        state.health_check_handler.handle(HealthCheck).await,
    ))
}
