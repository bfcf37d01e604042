//! Speech Context - 语音合成相关值对象
//!
//! 职责:
//! - 语言代码
//! - 音频格式与转码质量档位
//! - 输入校验错误

mod errors;
mod value_objects;

pub use errors::SpeechError;
pub use value_objects::{AudioFormat, Language, Quality};
