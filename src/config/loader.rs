//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, TtsProvider};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "VOCALIS";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `VOCALIS_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `VOCALIS_SERVER__PORT=8080`
/// - `VOCALIS_TTS__PROVIDER=fake`
/// - `VOCALIS_LIMITS__LANGUAGES=es,en,fr`
/// - `VOCALIS_SWEEP__MAX_AGE_SECS=7200`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    build_config(config_path, None)
}

/// `env` 为 None 时读取进程环境变量
fn build_config(
    config_path: Option<&Path>,
    env: Option<HashMap<String, String>>,
) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5000)?
        .set_default("tts.provider", "google")?
        .set_default("tts.url", "https://translate.google.com")?
        .set_default("tts.timeout_secs", 30)?
        .set_default("database.path", "data/vocalis.db")?
        .set_default("storage.audio_dir", "data/audio")?
        .set_default("sweep.enabled", true)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: VOCALIS_TTS__URL=http://localhost:8080
    // 注意: 环境变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("limits.languages")
            .source(env),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.tts.provider == TtsProvider::Google && config.tts.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "TTS URL cannot be empty".to_string(),
        ));
    }

    if config.tts.chunk_chars == 0 {
        return Err(ConfigError::ValidationError(
            "TTS chunk size must be positive".to_string(),
        ));
    }

    if config.database.path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    // 语言代码、长度和语速范围
    config
        .limits
        .policy()
        .map_err(|e| ConfigError::ValidationError(format!("Invalid limits: {}", e)))?;

    if config.sweep.enabled && config.sweep.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Sweep interval cannot be 0 when sweep is enabled".to_string(),
        ));
    }

    if config.sweep.max_age_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Audio retention cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    if config.server.static_files.enabled {
        tracing::info!("Static Files: {:?}", config.server.static_files.dir);
    }
    tracing::info!("TTS Provider: {}", config.tts.provider);
    if config.tts.provider == TtsProvider::Google {
        tracing::info!("TTS URL: {}", config.tts.url);
        tracing::info!("TTS Timeout: {}s", config.tts.timeout_secs);
    }
    tracing::info!("ffmpeg: {}", config.transcoder.ffmpeg_path);
    tracing::info!("Database: {}", config.database.path);
    tracing::info!("Audio Directory: {:?}", config.storage.audio_dir);
    tracing::info!("Languages: {}", config.limits.languages.join(","));
    tracing::info!(
        "Limits: {} chars, {} batch items, speed {}-{}",
        config.limits.max_text_chars,
        config.limits.max_batch_items,
        config.limits.min_speed,
        config.limits.max_speed
    );
    tracing::info!("Audio Retention: {}s", config.sweep.max_age_secs);
    tracing::info!("Sweep Enabled: {}", config.sweep.enabled);
    if config.sweep.enabled {
        tracing::info!("Sweep Interval: {}s", config.sweep.interval_secs);
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
