//! Sweep Worker - 过期文件清理
//!
//! 启动时先同步清理一次，之后按固定间隔在后台运行。
//! 单次失败只记录日志，不影响后续轮次。

use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::task::JoinHandle;

use crate::application::ports::{AudioStorageError, AudioStoragePort, SweepPolicy, SweepResult};

/// 过期文件清理 Worker
pub struct SweepWorker {
    storage: Arc<dyn AudioStoragePort>,
    policy: SweepPolicy,
    interval: Duration,
}

impl SweepWorker {
    pub fn new(storage: Arc<dyn AudioStoragePort>, policy: SweepPolicy, interval: Duration) -> Self {
        Self {
            storage,
            policy,
            interval,
        }
    }

    /// 执行一轮清理
    pub async fn run_once(&self) -> Result<SweepResult, AudioStorageError> {
        let result = self.storage.sweep(&self.policy, SystemTime::now()).await?;

        if result.removed > 0 {
            tracing::info!(
                scanned = result.scanned,
                removed = result.removed,
                skipped_in_flight = result.skipped_in_flight,
                freed_bytes = result.freed_bytes,
                "Expired files removed"
            );
        } else {
            tracing::debug!(scanned = result.scanned, "No expired files");
        }

        Ok(result)
    }

    /// 在后台按间隔运行，返回的句柄可用于关闭时 abort
    pub fn spawn(self) -> JoinHandle<()> {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            max_age_secs = self.policy.max_age.as_secs(),
            "Starting sweep worker"
        );

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // 第一次 tick 立即返回，启动清理已由调用方执行
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if let Err(e) = self.run_once().await {
                    tracing::error!(error = %e, "Sweep failed");
                }
            }
        })
    }
}
