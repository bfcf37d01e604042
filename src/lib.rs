//! Vocalis - 多语言文本转语音 Web 服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Speech: 语言、音频格式、质量档位
//! - Policy: 文本长度、语速、批量大小限制
//! - Templates: 内置示例文本
//! - Text Chunker: 长文本分块与预览
//!
//! 应用层 (application/):
//! - Ports: 端口定义（TtsEngine, AudioStorage, AudioTranscoder, Archive, HistoryRepository）
//! - Commands: 合成、批量合成、转码、收藏
//! - Queries: 历史、音频下载、模板、系统信息、健康检查
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API + 静态前端
//! - Adapters: Google/Fake TTS, 文件存储, symphonia/opus/ffmpeg 转码, ZIP 打包
//! - Persistence: SQLite 合成历史
//! - Worker: SweepWorker 过期文件清理

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
