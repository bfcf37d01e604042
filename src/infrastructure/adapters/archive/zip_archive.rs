//! ZIP Archive Store - 实现 ArchivePort
//!
//! 归档直接写在音频存储目录中，与其他生成文件一起参与过期清理

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::application::ports::{ArchiveError, ArchivePort, ArchiveWriter};

/// ZIP 归档存储
pub struct ZipArchiveStore {
    base_dir: PathBuf,
}

impl ZipArchiveStore {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    fn path_of(&self, filename: &str) -> Result<PathBuf, ArchiveError> {
        let invalid = filename.is_empty()
            || filename.starts_with('.')
            || filename.contains("..")
            || filename.contains(['/', '\\', '\0']);
        if invalid {
            return Err(ArchiveError::InvalidName(filename.to_string()));
        }
        Ok(self.base_dir.join(filename))
    }
}

struct ZipFileWriter {
    zip: ZipWriter<File>,
    options: SimpleFileOptions,
}

impl ArchiveWriter for ZipFileWriter {
    fn append(&mut self, entry_name: &str, data: &[u8]) -> Result<(), ArchiveError> {
        self.zip
            .start_file(entry_name, self.options)
            .map_err(|e| ArchiveError::FormatError(e.to_string()))?;
        self.zip
            .write_all(data)
            .map_err(|e| ArchiveError::IoError(e.to_string()))
    }

    fn finish(self: Box<Self>) -> Result<u64, ArchiveError> {
        let file = self
            .zip
            .finish()
            .map_err(|e| ArchiveError::FormatError(e.to_string()))?;
        let metadata = file
            .metadata()
            .map_err(|e| ArchiveError::IoError(e.to_string()))?;
        Ok(metadata.len())
    }
}

impl ArchivePort for ZipArchiveStore {
    fn create(&self, filename: &str) -> Result<Box<dyn ArchiveWriter>, ArchiveError> {
        let path = self.path_of(filename)?;
        std::fs::create_dir_all(&self.base_dir).map_err(|e| ArchiveError::IoError(e.to_string()))?;
        // 不截断已有文件，并发的同名归档各自失败或成功
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => ArchiveError::AlreadyExists(filename.to_string()),
                _ => ArchiveError::IoError(e.to_string()),
            })?;

        tracing::debug!(archive = filename, "Archive created");

        Ok(Box::new(ZipFileWriter {
            zip: ZipWriter::new(file),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
        }))
    }

    fn discard(&self, filename: &str) -> Result<(), ArchiveError> {
        let path = self.path_of(filename)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ArchiveError::IoError(e.to_string())),
        }
    }
}
