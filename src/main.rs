//! Vocalis - 多语言文本转语音 Web 服务
//!
//! 启动顺序：配置 -> 日志 -> 数据库 -> 适配器 -> 启动清理 -> HTTP 服务

use std::sync::Arc;

use vocalis::application::{AudioStoragePort, TtsEnginePort};
use vocalis::config::{load_config, print_config, AppConfig, TtsProvider};
use vocalis::infrastructure::adapters::{
    FakeTtsClient, FileAudioStorage, GoogleTtsClient, GoogleTtsClientConfig, SymphoniaTranscoder,
    SymphoniaTranscoderConfig, ZipArchiveStore,
};
use vocalis::infrastructure::http::{AppState, HttpServer, ServerConfig};
use vocalis::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteHistoryRepository,
};
use vocalis::infrastructure::worker::SweepWorker;

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},vocalis={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn create_tts_engine(config: &AppConfig) -> anyhow::Result<Arc<dyn TtsEnginePort>> {
    let engine: Arc<dyn TtsEnginePort> = match config.tts.provider {
        TtsProvider::Google => {
            let tts_config = GoogleTtsClientConfig::new(&config.tts.url)
                .with_timeout(config.tts.timeout_secs)
                .with_chunk_chars(config.tts.chunk_chars);
            Arc::new(GoogleTtsClient::new(tts_config)?)
        }
        TtsProvider::Fake => Arc::new(FakeTtsClient::with_defaults()),
    };
    Ok(engine)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for ctrl-c");
        return;
    }
    tracing::info!("Received shutdown signal");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Vocalis v{}", env!("CARGO_PKG_VERSION"));
    print_config(&config);

    let policy = Arc::new(config.limits.policy()?);
    let sweep_policy = config.sweep.policy();

    // 确保数据目录存在
    tokio::fs::create_dir_all(&config.storage.audio_dir).await?;
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;
    let history_repo = Arc::new(SqliteHistoryRepository::new(pool));

    // 创建适配器
    let tts_engine = create_tts_engine(&config)?;
    let transcoder = Arc::new(
        SymphoniaTranscoder::detect(SymphoniaTranscoderConfig {
            ffmpeg_path: config.transcoder.ffmpeg_path.clone(),
            ogg_bitrate: config.transcoder.ogg_bitrate,
        })
        .await,
    );
    let storage: Arc<dyn AudioStoragePort> =
        Arc::new(FileAudioStorage::new(&config.storage.audio_dir).await?);
    let archive = Arc::new(ZipArchiveStore::new(&config.storage.audio_dir));

    // 启动时清理上次运行遗留的过期文件
    let sweeper = SweepWorker::new(storage.clone(), sweep_policy, config.sweep.interval());
    if let Err(e) = sweeper.run_once().await {
        tracing::warn!(error = %e, "Startup sweep failed");
    }
    let sweep_handle = config.sweep.enabled.then(|| sweeper.spawn());

    // 创建 HTTP 服务器
    let mut server_config = ServerConfig::new(&config.server.host, config.server.port);
    if config.server.static_files.enabled {
        server_config = server_config.with_static_dir(&config.server.static_files.dir);
    }
    let state = AppState::new(
        policy,
        sweep_policy,
        tts_engine,
        transcoder,
        storage,
        archive,
        history_repo,
    );

    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    server.run_with_shutdown(shutdown_signal()).await?;

    if let Some(handle) = sweep_handle {
        handle.abort();
    }

    tracing::info!("Server shutdown complete");

    Ok(())
}
