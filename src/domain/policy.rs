//! 合成输入限制策略
//!
//! 语言集合、文本长度、语速范围和批量大小集中在一个结构里，
//! 由配置构建一次后共享给所有 handler。

use serde::Serialize;

use super::speech::{Language, SpeechError};
use super::text_chunker::preview_text;

/// 默认支持的语言
pub const DEFAULT_LANGUAGES: [Language; 10] = Language::ALL;

/// 合成输入限制
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisPolicy {
    languages: Vec<Language>,
    max_text_chars: usize,
    max_batch_items: usize,
    min_speed: f32,
    max_speed: f32,
    slow_below: f32,
    preview_chars: usize,
}

impl Default for SynthesisPolicy {
    fn default() -> Self {
        Self {
            languages: DEFAULT_LANGUAGES.to_vec(),
            max_text_chars: 5000,
            max_batch_items: 10,
            min_speed: 0.5,
            max_speed: 2.0,
            slow_below: 0.8,
            preview_chars: 50,
        }
    }
}

impl SynthesisPolicy {
    pub fn new(
        languages: Vec<Language>,
        max_text_chars: usize,
        max_batch_items: usize,
        min_speed: f32,
        max_speed: f32,
        slow_below: f32,
        preview_chars: usize,
    ) -> Result<Self, SpeechError> {
        if languages.is_empty() {
            return Err(SpeechError::InvalidPolicy(
                "at least one language is required".to_string(),
            ));
        }
        if max_text_chars == 0 || max_batch_items == 0 {
            return Err(SpeechError::InvalidPolicy(
                "text and batch limits must be positive".to_string(),
            ));
        }
        if !(min_speed > 0.0 && min_speed <= max_speed) {
            return Err(SpeechError::InvalidPolicy(format!(
                "speed range [{}, {}] is empty",
                min_speed, max_speed
            )));
        }

        Ok(Self {
            languages,
            max_text_chars,
            max_batch_items,
            min_speed,
            max_speed,
            slow_below,
            preview_chars,
        })
    }

    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    pub fn max_text_chars(&self) -> usize {
        self.max_text_chars
    }

    pub fn max_batch_items(&self) -> usize {
        self.max_batch_items
    }

    pub fn speed_range(&self) -> (f32, f32) {
        (self.min_speed, self.max_speed)
    }

    /// 校验单条合成文本，返回去除首尾空白后的内容
    pub fn validate_text<'a>(&self, text: &'a str) -> Result<&'a str, SpeechError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SpeechError::EmptyText);
        }
        if text.chars().count() > self.max_text_chars {
            return Err(SpeechError::TextTooLong {
                max_chars: self.max_text_chars,
            });
        }
        Ok(trimmed)
    }

    pub fn validate_language(&self, code: &str) -> Result<Language, SpeechError> {
        let language: Language = code.parse()?;
        if !self.languages.contains(&language) {
            return Err(SpeechError::UnsupportedLanguage(code.to_string()));
        }
        Ok(language)
    }

    pub fn validate_speed(&self, speed: f32) -> Result<f32, SpeechError> {
        // NaN 不在任何区间内
        if !(self.min_speed..=self.max_speed).contains(&speed) {
            return Err(SpeechError::SpeedOutOfRange(speed));
        }
        Ok(speed)
    }

    /// 引擎只有慢速/正常两档，低于阈值映射为慢速
    pub fn is_slow(&self, speed: f32) -> bool {
        speed < self.slow_below
    }

    /// 校验批量请求的条目数量
    pub fn validate_batch_size(&self, count: usize) -> Result<(), SpeechError> {
        if count == 0 {
            return Err(SpeechError::EmptyBatch);
        }
        if count > self.max_batch_items {
            return Err(SpeechError::BatchTooLarge {
                max_items: self.max_batch_items,
            });
        }
        Ok(())
    }

    /// 批量清单中的文本预览
    pub fn preview(&self, text: &str) -> String {
        preview_text(text, self.preview_chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_text() {
        let policy = SynthesisPolicy::default();
        assert_eq!(policy.validate_text("  hola  ").unwrap(), "hola");
        assert_eq!(policy.validate_text(""), Err(SpeechError::EmptyText));
        assert_eq!(policy.validate_text(" \n\t "), Err(SpeechError::EmptyText));
        assert!(policy.validate_text(&"a".repeat(5000)).is_ok());
        assert_eq!(
            policy.validate_text(&"a".repeat(5001)),
            Err(SpeechError::TextTooLong { max_chars: 5000 })
        );
    }

    #[test]
    fn test_text_limit_counts_chars_not_bytes() {
        let policy = SynthesisPolicy::default();
        // 5000 个汉字超过 5000 字节，但只有 5000 个字符
        assert!(policy.validate_text(&"语".repeat(5000)).is_ok());
    }

    #[test]
    fn test_validate_language() {
        let policy = SynthesisPolicy::default();
        assert_eq!(policy.validate_language("es").unwrap(), Language::Es);
        assert!(policy.validate_language("xx").is_err());

        let restricted = SynthesisPolicy::new(vec![Language::En], 5000, 10, 0.5, 2.0, 0.8, 50)
            .unwrap();
        assert!(restricted.validate_language("es").is_err());
        assert!(restricted.validate_language("en").is_ok());
    }

    #[test]
    fn test_validate_speed() {
        let policy = SynthesisPolicy::default();
        assert!(policy.validate_speed(0.5).is_ok());
        assert!(policy.validate_speed(2.0).is_ok());
        assert!(policy.validate_speed(0.49).is_err());
        assert!(policy.validate_speed(3.0).is_err());
        assert!(policy.validate_speed(f32::NAN).is_err());
    }

    #[test]
    fn test_slow_mapping() {
        let policy = SynthesisPolicy::default();
        assert!(policy.is_slow(0.5));
        assert!(policy.is_slow(0.79));
        assert!(!policy.is_slow(0.8));
        assert!(!policy.is_slow(2.0));
    }

    #[test]
    fn test_validate_batch_size() {
        let policy = SynthesisPolicy::default();
        assert_eq!(policy.validate_batch_size(0), Err(SpeechError::EmptyBatch));
        assert!(policy.validate_batch_size(10).is_ok());
        assert_eq!(
            policy.validate_batch_size(11),
            Err(SpeechError::BatchTooLarge { max_items: 10 })
        );
    }

    #[test]
    fn test_invalid_policy() {
        assert!(SynthesisPolicy::new(vec![], 5000, 10, 0.5, 2.0, 0.8, 50).is_err());
        assert!(SynthesisPolicy::new(vec![Language::Es], 5000, 10, 2.0, 0.5, 0.8, 50).is_err());
        assert!(SynthesisPolicy::new(vec![Language::Es], 0, 10, 0.5, 2.0, 0.8, 50).is_err());
    }
}
