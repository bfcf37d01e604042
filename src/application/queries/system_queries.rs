//! System Queries - 模板、系统信息、健康检查

use serde::Serialize;

use crate::domain::AudioFormat;

/// 列出内置模板
#[derive(Debug, Clone, Default)]
pub struct ListTemplates {
    /// 按语言过滤
    pub language: Option<String>,
}

/// 系统信息查询
#[derive(Debug, Clone, Default)]
pub struct GetSystemInfo;

/// 健康检查查询
#[derive(Debug, Clone, Default)]
pub struct HealthCheck;

#[derive(Debug, Clone, Serialize)]
pub struct LanguageInfo {
    pub code: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct LimitsInfo {
    pub max_text_chars: usize,
    pub max_batch_items: usize,
    pub min_speed: f32,
    pub max_speed: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct StorageInfo {
    pub file_count: u64,
    pub used_bytes: u64,
    pub retention_secs: u64,
}

/// 系统信息
#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    pub version: &'static str,
    pub engine: &'static str,
    pub languages: Vec<LanguageInfo>,
    pub output_formats: Vec<AudioFormat>,
    pub limits: LimitsInfo,
    pub storage: StorageInfo,
    pub history_count: u64,
}

/// 健康状态
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// "ok" 或 "degraded"
    pub status: &'static str,
    pub engine_available: bool,
    pub database_available: bool,
}
