//! File Storage - 文件系统音频存储实现
//!
//! 实现 AudioStoragePort trait。所有文件放在同一个目录下，
//! 写入中的文件登记在 in-flight 集合里，过期清理会跳过它们。

use async_trait::async_trait;
use dashmap::DashSet;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::fs;

use crate::application::ports::{
    AudioStorageError, AudioStoragePort, StorageStats, SweepPolicy, SweepResult,
};

/// 文件年龄的起点：优先创建时间，平台不支持时退回修改时间
pub(crate) fn file_timestamp(metadata: &Metadata) -> Option<SystemTime> {
    metadata.created().or_else(|_| metadata.modified()).ok()
}

/// 文件系统音频存储
pub struct FileAudioStorage {
    /// 存储根目录
    base_dir: PathBuf,
    /// 正在写入的文件名
    in_flight: Arc<DashSet<String>>,
}

/// 离开作用域时从 in-flight 集合移除
struct InFlightGuard {
    set: Arc<DashSet<String>>,
    name: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.set.remove(&self.name);
    }
}

impl FileAudioStorage {
    /// 创建新的文件存储
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, AudioStorageError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?;

        Ok(Self {
            base_dir,
            in_flight: Arc::new(DashSet::new()),
        })
    }

    /// 获取存储根目录
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn mark_in_flight(&self, filename: &str) -> InFlightGuard {
        self.in_flight.insert(filename.to_string());
        InFlightGuard {
            set: self.in_flight.clone(),
            name: filename.to_string(),
        }
    }

    /// 文件名只能是目录下的单个普通名字
    fn validate_name(filename: &str) -> Result<(), AudioStorageError> {
        let invalid = filename.is_empty()
            || filename.starts_with('.')
            || filename.contains("..")
            || filename.contains(['/', '\\', '\0']);
        if invalid {
            return Err(AudioStorageError::InvalidName(filename.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl AudioStoragePort for FileAudioStorage {
    fn path_of(&self, filename: &str) -> Result<PathBuf, AudioStorageError> {
        Self::validate_name(filename)?;
        Ok(self.base_dir.join(filename))
    }

    async fn write(&self, filename: &str, data: &[u8]) -> Result<(), AudioStorageError> {
        let path = self.path_of(filename)?;
        let _guard = self.mark_in_flight(filename);

        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?;
        fs::write(&path, data)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?;

        tracing::debug!(filename, size = data.len(), "Saved audio");

        Ok(())
    }

    async fn read(&self, filename: &str) -> Result<Vec<u8>, AudioStorageError> {
        let path = self.path_of(filename)?;

        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AudioStorageError::FileNotFound(filename.to_string()))
            }
            Err(e) => Err(AudioStorageError::IoError(e.to_string())),
        }
    }

    async fn delete(&self, filename: &str) -> Result<(), AudioStorageError> {
        let path = self.path_of(filename)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(filename, "Deleted audio");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AudioStorageError::IoError(e.to_string())),
        }
    }

    async fn exists(&self, filename: &str) -> bool {
        match self.path_of(filename) {
            Ok(path) => fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    async fn sweep(
        &self,
        policy: &SweepPolicy,
        now: SystemTime,
    ) -> Result<SweepResult, AudioStorageError> {
        let mut result = SweepResult::default();
        let threshold = policy.max_age.max(policy.grace);

        let mut entries = match fs::read_dir(&self.base_dir).await {
            Ok(entries) => entries,
            // 目录不存在时没有可清理的内容
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(result),
            Err(e) => return Err(AudioStorageError::IoError(e.to_string())),
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?
        {
            let metadata = match entry.metadata().await {
                Ok(m) if m.is_file() => m,
                _ => continue,
            };
            result.scanned += 1;

            let name = entry.file_name().to_string_lossy().to_string();
            if self.in_flight.contains(&name) {
                result.skipped_in_flight += 1;
                continue;
            }

            let Some(stamp) = file_timestamp(&metadata) else {
                continue;
            };
            let age = now.duration_since(stamp).unwrap_or(Duration::ZERO);
            if age <= threshold {
                continue;
            }

            match fs::remove_file(entry.path()).await {
                Ok(()) => {
                    result.removed += 1;
                    result.freed_bytes += metadata.len();
                    tracing::debug!(filename = %name, age_secs = age.as_secs(), "Expired file removed");
                }
                // 并发删除
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(filename = %name, error = %e, "Failed to remove expired file");
                }
            }
        }

        Ok(result)
    }

    async fn stats(&self) -> Result<StorageStats, AudioStorageError> {
        let mut stats = StorageStats::default();

        let mut entries = match fs::read_dir(&self.base_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(stats),
            Err(e) => return Err(AudioStorageError::IoError(e.to_string())),
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?
        {
            if let Ok(metadata) = entry.metadata().await {
                if metadata.is_file() {
                    stats.file_count += 1;
                    stats.used_bytes += metadata.len();
                }
            }
        }

        Ok(stats)
    }
}
