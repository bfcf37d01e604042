//! Worker Layer - Background Task Processing
//!
//! 实现 SweepWorker，定期清理过期的生成文件

mod sweep_worker;

pub use sweep_worker::SweepWorker;
