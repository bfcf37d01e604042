//! Speech Context - Errors

use thiserror::Error;

/// 输入校验错误
///
/// Display 文本直接返回给调用方
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpeechError {
    #[error("empty text")]
    EmptyText,

    #[error("text too long")]
    TextTooLong { max_chars: usize },

    #[error("unsupported language")]
    UnsupportedLanguage(String),

    #[error("speed out of range")]
    SpeedOutOfRange(f32),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("unsupported quality: {0}")]
    UnsupportedQuality(String),

    #[error("empty batch")]
    EmptyBatch,

    #[error("too many texts: at most {max_items} per batch")]
    BatchTooLarge { max_items: usize },

    #[error("no non-empty texts")]
    NoUsableTexts,

    #[error("invalid limits: {0}")]
    InvalidPolicy(String),
}
