//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::application::{BatchItem, HistoryEntry, SynthesizeBatchResponse};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

// ============================================================================
// TTS DTOs
// ============================================================================

fn default_language() -> String {
    "es".to_string()
}

fn default_speed() -> f32 {
    1.0
}

#[derive(Debug, Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_speed")]
    pub speed: f32,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub texts: Vec<String>,
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Serialize)]
pub struct BatchItemDto {
    pub index: usize,
    pub entry_name: String,
    pub preview: String,
}

impl From<BatchItem> for BatchItemDto {
    fn from(item: BatchItem) -> Self {
        Self {
            index: item.index,
            entry_name: item.entry_name,
            preview: item.preview,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub archive: String,
    pub download_url: String,
    pub size_bytes: u64,
    pub language: String,
    pub items: Vec<BatchItemDto>,
    pub skipped: Vec<usize>,
}

impl From<SynthesizeBatchResponse> for BatchResponse {
    fn from(r: SynthesizeBatchResponse) -> Self {
        Self {
            download_url: audio_url(&r.archive),
            archive: r.archive,
            size_bytes: r.size_bytes,
            language: r.language.to_string(),
            items: r.items.into_iter().map(Into::into).collect(),
            skipped: r.skipped,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TranscodeRequest {
    pub filename: String,
    pub format: String,
    pub quality: Option<String>,
}

/// 生成文件的下载地址
pub fn audio_url(filename: &str) -> String {
    format!("/api/audio/{}", filename)
}

// ============================================================================
// History DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct HistoryEntryDto {
    pub id: i64,
    pub text: String,
    pub language: String,
    pub filename: String,
    pub created_at: String,
    pub is_favorite: bool,
    pub audio_available: bool,
    pub audio_url: String,
}

impl From<HistoryEntry> for HistoryEntryDto {
    fn from(e: HistoryEntry) -> Self {
        Self {
            id: e.id,
            text: e.text,
            language: e.language.to_string(),
            audio_url: audio_url(&e.filename),
            filename: e.filename,
            created_at: e.created_at.to_rfc3339(),
            is_favorite: e.is_favorite,
            audio_available: e.audio_available,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ToggleFavoriteRequest {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct ToggleFavoriteResponseDto {
    pub id: i64,
    pub is_favorite: bool,
}

#[derive(Debug, Deserialize)]
pub struct TemplateParams {
    pub language: Option<String>,
}
