//! Archive Port - 批量打包抽象
//!
//! 批量合成的结果逐条追加到一个归档文件中，全部完成后收尾

use thiserror::Error;

/// 归档错误
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Invalid archive name: {0}")]
    InvalidName(String),

    #[error("Archive already exists: {0}")]
    AlreadyExists(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Archive format error: {0}")]
    FormatError(String),
}

/// 正在构建的归档
///
/// 写入是同步的小块 IO，调用方可以跨 await 持有
pub trait ArchiveWriter: Send {
    /// 追加一个条目
    fn append(&mut self, entry_name: &str, data: &[u8]) -> Result<(), ArchiveError>;

    /// 完成归档，返回文件大小（字节）
    fn finish(self: Box<Self>) -> Result<u64, ArchiveError>;
}

/// Archive Port
pub trait ArchivePort: Send + Sync {
    /// 在存储目录中创建新的归档文件，同名文件已存在时返回 `AlreadyExists`
    fn create(&self, filename: &str) -> Result<Box<dyn ArchiveWriter>, ArchiveError>;

    /// 删除未完成或不再需要的归档，文件不存在不视为错误
    fn discard(&self, filename: &str) -> Result<(), ArchiveError>;
}
