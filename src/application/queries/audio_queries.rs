//! Audio Queries - 音频文件查询

use std::path::PathBuf;

/// 按文件名获取已生成的文件
#[derive(Debug, Clone)]
pub struct GetAudioQuery {
    pub filename: String,
}

/// 获取文件响应
///
/// 只返回位置，由 HTTP 层流式读取
#[derive(Debug, Clone)]
pub struct GetAudioResponse {
    pub filename: String,
    pub path: PathBuf,
    pub content_type: &'static str,
}
