//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::ports::SweepPolicy;
use crate::domain::{Language, SpeechError, SynthesisPolicy};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// TTS 引擎配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 转码配置
    #[serde(default)]
    pub transcoder: TranscoderConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 输入限制（语言、长度、语速、批量大小）
    #[serde(default)]
    pub limits: LimitsConfig,

    /// 过期音频清理配置
    #[serde(default)]
    pub sweep: SweepConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 静态文件服务配置
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

/// 静态文件服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    /// 是否启用静态文件服务
    #[serde(default = "default_static_enabled")]
    pub enabled: bool,

    /// 静态文件目录
    #[serde(default = "default_static_dir")]
    pub dir: PathBuf,
}

fn default_static_enabled() -> bool {
    false
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("web")
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: default_static_enabled(),
            dir: default_static_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_files: StaticFilesConfig::default(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// TTS 引擎类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    /// Google Translate TTS
    #[default]
    Google,
    /// 本地假引擎，返回固定音频（离线调试）
    Fake,
}

impl std::fmt::Display for TtsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TtsProvider::Google => write!(f, "google"),
            TtsProvider::Fake => write!(f, "fake"),
        }
    }
}

/// TTS 引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    /// 引擎类型
    #[serde(default)]
    pub provider: TtsProvider,

    /// TTS 服务基础 URL
    #[serde(default = "default_tts_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,

    /// 单次请求的最大字符数，超出则分块请求后拼接
    #[serde(default = "default_chunk_chars")]
    pub chunk_chars: usize,
}

fn default_tts_url() -> String {
    "https://translate.google.com".to_string()
}

fn default_tts_timeout() -> u64 {
    30
}

fn default_chunk_chars() -> usize {
    100
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            provider: TtsProvider::default(),
            url: default_tts_url(),
            timeout_secs: default_tts_timeout(),
            chunk_chars: default_chunk_chars(),
        }
    }
}

/// 转码配置
#[derive(Debug, Clone, Deserialize)]
pub struct TranscoderConfig {
    /// ffmpeg 可执行文件路径（MP3 编码使用）
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    /// OGG (Opus) 输出比特率（bps），不区分质量档位
    #[serde(default = "default_ogg_bitrate")]
    pub ogg_bitrate: u32,
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_ogg_bitrate() -> u32 {
    64000
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ogg_bitrate: default_ogg_bitrate(),
        }
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/vocalis.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// 获取数据库 URL
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.path)
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 音频存储目录（扁平目录）
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("data/audio")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            audio_dir: default_audio_dir(),
        }
    }
}

/// 输入限制配置
///
/// 这些数值属于对外契约，修改前需确认客户端兼容
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,

    #[serde(default = "default_max_batch_items")]
    pub max_batch_items: usize,

    #[serde(default = "default_min_speed")]
    pub min_speed: f32,

    #[serde(default = "default_max_speed")]
    pub max_speed: f32,

    /// 低于该语速时启用慢速朗读
    #[serde(default = "default_slow_below")]
    pub slow_below: f32,

    /// 批量清单中文本预览的字符数
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

fn default_languages() -> Vec<String> {
    SynthesisPolicy::default()
        .languages()
        .iter()
        .map(|l| l.as_str().to_string())
        .collect()
}

fn default_max_text_chars() -> usize {
    5000
}

fn default_max_batch_items() -> usize {
    10
}

fn default_min_speed() -> f32 {
    0.5
}

fn default_max_speed() -> f32 {
    2.0
}

fn default_slow_below() -> f32 {
    0.8
}

fn default_preview_chars() -> usize {
    50
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            max_text_chars: default_max_text_chars(),
            max_batch_items: default_max_batch_items(),
            min_speed: default_min_speed(),
            max_speed: default_max_speed(),
            slow_below: default_slow_below(),
            preview_chars: default_preview_chars(),
        }
    }
}

impl LimitsConfig {
    /// 构建合成输入策略，未知语言代码或空范围返回错误
    pub fn policy(&self) -> Result<SynthesisPolicy, SpeechError> {
        let languages = self
            .languages
            .iter()
            .map(|code| code.parse::<Language>())
            .collect::<Result<Vec<_>, _>>()?;

        SynthesisPolicy::new(
            languages,
            self.max_text_chars,
            self.max_batch_items,
            self.min_speed,
            self.max_speed,
            self.slow_below,
            self.preview_chars,
        )
    }
}

/// 过期音频清理配置
#[derive(Debug, Clone, Deserialize)]
pub struct SweepConfig {
    /// 是否启用定时清理（启动时的清理总是执行）
    #[serde(default = "default_sweep_enabled")]
    pub enabled: bool,

    /// 清理间隔（秒）
    #[serde(default = "default_sweep_interval")]
    pub interval_secs: u64,

    /// 文件保留时间（秒）
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,

    /// 新文件保护期（秒），避免删除刚写入的文件
    #[serde(default = "default_grace")]
    pub grace_secs: u64,
}

fn default_sweep_enabled() -> bool {
    true
}

fn default_sweep_interval() -> u64 {
    600 // 10 分钟
}

fn default_max_age() -> u64 {
    3600 // 1 小时
}

fn default_grace() -> u64 {
    30
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: default_sweep_enabled(),
            interval_secs: default_sweep_interval(),
            max_age_secs: default_max_age(),
            grace_secs: default_grace(),
        }
    }
}

impl SweepConfig {
    pub fn policy(&self) -> SweepPolicy {
        SweepPolicy {
            max_age: Duration::from_secs(self.max_age_secs),
            grace: Duration::from_secs(self.grace_secs),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.tts.provider, TtsProvider::Google);
        assert_eq!(config.database.path, "data/vocalis.db");
        assert_eq!(config.limits.languages.len(), 10);
        assert_eq!(config.limits.max_text_chars, 5000);
        assert_eq!(config.sweep.max_age_secs, 3600);
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:5000");
    }

    #[test]
    fn test_database_url() {
        let config = DatabaseConfig::default();
        assert_eq!(config.database_url(), "sqlite:data/vocalis.db?mode=rwc");
    }

    #[test]
    fn test_limits_policy() {
        let policy = LimitsConfig::default().policy().unwrap();
        assert_eq!(policy.max_batch_items(), 10);
        assert_eq!(policy.speed_range(), (0.5, 2.0));
    }

    #[test]
    fn test_limits_policy_rejects_unknown_language() {
        let limits = LimitsConfig {
            languages: vec!["es".to_string(), "xx".to_string()],
            ..Default::default()
        };
        assert!(limits.policy().is_err());
    }

    #[test]
    fn test_sweep_policy() {
        let policy = SweepConfig::default().policy();
        assert_eq!(policy.max_age, Duration::from_secs(3600));
        assert_eq!(policy.grace, Duration::from_secs(30));
    }
}
