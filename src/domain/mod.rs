//! Domain Layer - 领域层
//!
//! - speech: 语言、音频格式、质量档位等值对象
//! - policy: 输入限制策略（所有 handler 共享同一份）
//! - text_chunker: 按引擎单次请求上限切分文本
//! - templates: 内置文本模板

pub mod speech;

mod policy;
mod templates;
mod text_chunker;

pub use policy::{SynthesisPolicy, DEFAULT_LANGUAGES};
pub use speech::{AudioFormat, Language, Quality, SpeechError};
pub use templates::{builtin_templates, TextTemplate};
pub use text_chunker::{chunk_text, preview_text};
