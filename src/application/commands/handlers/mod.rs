//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod batch_handlers;
mod history_handlers;
mod synthesis_handlers;
mod transcode_handlers;

#[cfg(test)]
pub(crate) mod test_support;

pub use batch_handlers::*;
pub use history_handlers::*;
pub use synthesis_handlers::*;
pub use transcode_handlers::*;
