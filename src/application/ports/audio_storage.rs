//! Audio Storage Port - 出站端口
//!
//! 定义音频文件存储和过期清理的抽象接口。
//! 所有文件位于同一个扁平目录，以文件名标识。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use thiserror::Error;

/// 音频存储错误
#[derive(Debug, Error)]
pub enum AudioStorageError {
    /// 文件不存在（例如已被过期清理），属于可预期情况
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// 文件类别，决定文件名前缀
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// 单条合成
    Speech,
    /// 批量合成的单条临时文件
    BatchItem,
    /// 转码输出
    Converted,
    /// 批量打包文件
    Archive,
}

impl FileKind {
    pub fn tag(&self) -> &'static str {
        match self {
            FileKind::Speech => "tts",
            FileKind::BatchItem => "batch",
            FileKind::Converted => "converted",
            FileKind::Archive => "archive",
        }
    }

    /// 生成文件名: `{tag}[_{index}]_{YYYYMMDD_HHMMSS}.{ext}`
    ///
    /// 时间戳精度为秒，同一秒内不带序号的同类文件会互相覆盖
    pub fn filename(&self, index: Option<usize>, ext: &str, at: DateTime<Utc>) -> String {
        let stamp = at.format("%Y%m%d_%H%M%S");
        match index {
            Some(i) => format!("{}_{}_{}.{}", self.tag(), i, stamp, ext),
            None => format!("{}_{}.{}", self.tag(), stamp, ext),
        }
    }
}

/// 过期清理策略
#[derive(Debug, Clone, Copy)]
pub struct SweepPolicy {
    /// 文件保留时间，超过即删除
    pub max_age: Duration,
    /// 新文件保护期，小于该年龄的文件不会被删除
    pub grace: Duration,
}

impl Default for SweepPolicy {
    fn default() -> Self {
        Self {
            max_age: Duration::from_secs(3600), // 1 小时
            grace: Duration::from_secs(30),
        }
    }
}

/// 清理结果
#[derive(Debug, Clone, Default)]
pub struct SweepResult {
    /// 扫描的文件数量
    pub scanned: u64,
    /// 删除的文件数量
    pub removed: u64,
    /// 因正在写入而跳过的文件数量
    pub skipped_in_flight: u64,
    /// 释放的空间（字节）
    pub freed_bytes: u64,
}

/// 存储统计
#[derive(Debug, Clone, Default)]
pub struct StorageStats {
    /// 文件数量
    pub file_count: u64,
    /// 已使用空间（字节）
    pub used_bytes: u64,
}

/// Audio Storage Port - 出站端口
#[async_trait]
pub trait AudioStoragePort: Send + Sync {
    /// 分配新文件名
    fn allocate_name(&self, kind: FileKind, index: Option<usize>, ext: &str) -> String {
        kind.filename(index, ext, Utc::now())
    }

    /// 获取文件的完整路径（校验文件名，不检查是否存在）
    fn path_of(&self, filename: &str) -> Result<PathBuf, AudioStorageError>;

    /// 写入文件，目录不存在时自动创建
    async fn write(&self, filename: &str, data: &[u8]) -> Result<(), AudioStorageError>;

    /// 读取文件
    async fn read(&self, filename: &str) -> Result<Vec<u8>, AudioStorageError>;

    /// 删除文件，文件不存在不视为错误
    async fn delete(&self, filename: &str) -> Result<(), AudioStorageError>;

    /// 检查文件是否存在
    async fn exists(&self, filename: &str) -> bool;

    /// 删除超过保留时间的文件
    async fn sweep(
        &self,
        policy: &SweepPolicy,
        now: SystemTime,
    ) -> Result<SweepResult, AudioStorageError>;

    /// 获取存储统计
    async fn stats(&self) -> Result<StorageStats, AudioStorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_filename_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            FileKind::Speech.filename(None, "mp3", at),
            "tts_20240309_070501.mp3"
        );
        assert_eq!(
            FileKind::BatchItem.filename(Some(3), "mp3", at),
            "batch_3_20240309_070501.mp3"
        );
        assert_eq!(
            FileKind::Archive.filename(None, "zip", at),
            "archive_20240309_070501.zip"
        );
    }

    #[test]
    fn test_index_keeps_names_distinct_within_same_second() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let first = FileKind::BatchItem.filename(Some(1), "mp3", at);
        let second = FileKind::BatchItem.filename(Some(2), "mp3", at);
        assert_ne!(first, second);
    }
}
