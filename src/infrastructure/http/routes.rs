//! HTTP Routes
//!
//! API Endpoints:
//! - /api/tts/synthesize     POST  单条合成，返回 MP3
//! - /api/tts/batch          POST  批量合成，返回 ZIP 清单
//! - /api/tts/transcode      POST  转码已生成的文件
//! - /api/audio/:filename    GET   下载已生成的文件
//! - /api/history            GET   最近的合成记录
//! - /api/history/favorite   POST  切换收藏
//! - /api/templates          GET   内置文本模板
//! - /api/system/info        GET   系统信息
//! - /api/health             GET   健康检查

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/tts", tts_routes())
        .route("/audio/:filename", get(handlers::get_audio))
        .nest("/history", history_routes())
        .route("/templates", get(handlers::list_templates))
        .route("/system/info", get(handlers::system_info))
        .route("/health", get(handlers::health))
}

/// TTS 路由
fn tts_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/synthesize", post(handlers::synthesize))
        .route("/batch", post(handlers::synthesize_batch))
        .route("/transcode", post(handlers::transcode))
}

/// History 路由
fn history_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::list_history))
        .route("/favorite", post(handlers::toggle_favorite))
}
