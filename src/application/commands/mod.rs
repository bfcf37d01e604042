//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：合成、批量合成、转码、收藏切换

mod history_commands;
mod synthesis_commands;

pub mod handlers;

pub use history_commands::*;
pub use synthesis_commands::*;
