//! 应用层测试用的内存端口实现

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use crate::application::ports::{
    ArchiveError, ArchivePort, ArchiveWriter, AudioStorageError, AudioStoragePort,
    AudioTranscoderPort, HistoryRecord, HistoryRepositoryPort, NewHistoryRecord,
    RepositoryError, StorageStats, SweepPolicy, SweepResult, SynthesisOutput, SynthesisRequest,
    TranscodeConfig, TranscodeError, TranscodeResult, TtsEnginePort, TtsError,
};
use crate::domain::AudioFormat;

/// 记录请求、可按文本内容触发失败或返回空音频的引擎
#[derive(Default)]
pub struct ScriptedEngine {
    pub fail_on: Option<String>,
    pub silent_on: Option<String>,
    pub requests: Mutex<Vec<SynthesisRequest>>,
}

impl ScriptedEngine {
    pub fn failing_on(marker: &str) -> Self {
        Self {
            fail_on: Some(marker.to_string()),
            ..Default::default()
        }
    }

    pub fn silent_on(marker: &str) -> Self {
        Self {
            silent_on: Some(marker.to_string()),
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<SynthesisRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TtsEnginePort for ScriptedEngine {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisOutput, TtsError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(marker) = &self.fail_on {
            if request.text.contains(marker.as_str()) {
                return Err(TtsError::ServiceError("HTTP 503".to_string()));
            }
        }
        if let Some(marker) = &self.silent_on {
            if request.text.contains(marker.as_str()) {
                return Ok(SynthesisOutput {
                    audio_data: Vec::new(),
                    chunk_count: 1,
                });
            }
        }
        let mut audio_data = b"ID3".to_vec();
        audio_data.extend_from_slice(request.text.as_bytes());
        Ok(SynthesisOutput {
            audio_data,
            chunk_count: 1,
        })
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// 内存文件存储
#[derive(Default)]
pub struct MemoryStorage {
    pub files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn insert(&self, filename: &str, data: &[u8]) {
        self.files
            .lock()
            .unwrap()
            .insert(filename.to_string(), data.to_vec());
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.files.lock().unwrap().keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl AudioStoragePort for MemoryStorage {
    fn path_of(&self, filename: &str) -> Result<PathBuf, AudioStorageError> {
        if filename.contains('/') {
            return Err(AudioStorageError::InvalidName(filename.to_string()));
        }
        Ok(PathBuf::from("/memory").join(filename))
    }

    async fn write(&self, filename: &str, data: &[u8]) -> Result<(), AudioStorageError> {
        self.insert(filename, data);
        Ok(())
    }

    async fn read(&self, filename: &str) -> Result<Vec<u8>, AudioStorageError> {
        self.files
            .lock()
            .unwrap()
            .get(filename)
            .cloned()
            .ok_or_else(|| AudioStorageError::FileNotFound(filename.to_string()))
    }

    async fn delete(&self, filename: &str) -> Result<(), AudioStorageError> {
        self.files.lock().unwrap().remove(filename);
        Ok(())
    }

    async fn exists(&self, filename: &str) -> bool {
        self.files.lock().unwrap().contains_key(filename)
    }

    async fn sweep(
        &self,
        _policy: &SweepPolicy,
        _now: SystemTime,
    ) -> Result<SweepResult, AudioStorageError> {
        Ok(SweepResult::default())
    }

    async fn stats(&self) -> Result<StorageStats, AudioStorageError> {
        let files = self.files.lock().unwrap();
        Ok(StorageStats {
            file_count: files.len() as u64,
            used_bytes: files.values().map(|d| d.len() as u64).sum(),
        })
    }
}

/// 内存历史记录，可模拟写入失败
#[derive(Default)]
pub struct MemoryHistory {
    pub fail_append: bool,
    pub records: Mutex<Vec<HistoryRecord>>,
}

impl MemoryHistory {
    pub fn failing() -> Self {
        Self {
            fail_append: true,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl HistoryRepositoryPort for MemoryHistory {
    async fn append(&self, record: NewHistoryRecord) -> Result<i64, RepositoryError> {
        if self.fail_append {
            return Err(RepositoryError::DatabaseError("disk I/O error".to_string()));
        }
        let mut records = self.records.lock().unwrap();
        let id = records.len() as i64 + 1;
        records.push(HistoryRecord {
            id,
            text: record.text,
            language: record.language,
            filename: record.filename,
            created_at: Utc::now(),
            is_favorite: false,
        });
        Ok(id)
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<HistoryRecord>, RepositoryError> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().rev().take(limit as usize).cloned().collect())
    }

    async fn toggle_favorite(&self, id: i64) -> Result<Option<bool>, RepositoryError> {
        let mut records = self.records.lock().unwrap();
        Ok(records.iter_mut().find(|r| r.id == id).map(|r| {
            r.is_favorite = !r.is_favorite;
            r.is_favorite
        }))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<HistoryRecord>, RepositoryError> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.len() as u64)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        if self.fail_append {
            return Err(RepositoryError::DatabaseError("unavailable".to_string()));
        }
        Ok(())
    }
}

/// 内存归档，记录已完成和已丢弃的归档；同名归档不可重复创建
#[derive(Default, Clone)]
pub struct MemoryArchive {
    pub finished: Arc<Mutex<HashMap<String, Vec<(String, Vec<u8>)>>>>,
    pub discarded: Arc<Mutex<HashSet<String>>>,
    created: Arc<Mutex<HashSet<String>>>,
    collisions: Arc<Mutex<usize>>,
}

impl MemoryArchive {
    /// 接下来的 n 次创建视为文件已存在
    pub fn collide_next(&self, n: usize) {
        *self.collisions.lock().unwrap() = n;
    }
}

struct MemoryArchiveWriter {
    name: String,
    entries: Vec<(String, Vec<u8>)>,
    finished: Arc<Mutex<HashMap<String, Vec<(String, Vec<u8>)>>>>,
}

impl ArchiveWriter for MemoryArchiveWriter {
    fn append(&mut self, entry_name: &str, data: &[u8]) -> Result<(), ArchiveError> {
        self.entries.push((entry_name.to_string(), data.to_vec()));
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<u64, ArchiveError> {
        let size = self.entries.iter().map(|(_, d)| d.len() as u64).sum();
        self.finished.lock().unwrap().insert(self.name, self.entries);
        Ok(size)
    }
}

impl ArchivePort for MemoryArchive {
    fn create(&self, filename: &str) -> Result<Box<dyn ArchiveWriter>, ArchiveError> {
        let mut collisions = self.collisions.lock().unwrap();
        if *collisions > 0 {
            *collisions -= 1;
            return Err(ArchiveError::AlreadyExists(filename.to_string()));
        }
        if !self.created.lock().unwrap().insert(filename.to_string()) {
            return Err(ArchiveError::AlreadyExists(filename.to_string()));
        }
        Ok(Box::new(MemoryArchiveWriter {
            name: filename.to_string(),
            entries: Vec::new(),
            finished: self.finished.clone(),
        }))
    }

    fn discard(&self, filename: &str) -> Result<(), ArchiveError> {
        self.discarded.lock().unwrap().insert(filename.to_string());
        Ok(())
    }
}

/// 只支持 WAV 输出的转码器
pub struct WavOnlyTranscoder;

#[async_trait]
impl AudioTranscoderPort for WavOnlyTranscoder {
    async fn transcode(
        &self,
        input: &[u8],
        _source: AudioFormat,
        config: &TranscodeConfig,
    ) -> Result<TranscodeResult, TranscodeError> {
        if !self.supports_format(config.format) {
            return Err(TranscodeError::UnsupportedFormat(
                config.format.to_string(),
            ));
        }
        if !input.starts_with(b"ID3") {
            return Err(TranscodeError::DecodingError("not an mp3 stream".to_string()));
        }
        let audio_data = b"RIFF0000WAVE".to_vec();
        Ok(TranscodeResult {
            transcoded_size: audio_data.len(),
            audio_data,
            format: config.format,
            duration_ms: 1000,
            sample_rate: 24000,
            channels: 1,
            original_size: input.len(),
        })
    }

    fn supports_format(&self, format: AudioFormat) -> bool {
        format == AudioFormat::Wav
    }
}
