//! Archive Adapter - ZIP 打包

mod zip_archive;

pub use zip_archive::ZipArchiveStore;
