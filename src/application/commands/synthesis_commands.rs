//! Synthesis Commands

/// 单条合成命令
#[derive(Debug, Clone)]
pub struct Synthesize {
    pub text: String,
    /// 语言代码，如 "es"
    pub language: String,
    /// 语速 (0.5 - 2.0)
    pub speed: f32,
}

/// 批量合成命令
#[derive(Debug, Clone)]
pub struct SynthesizeBatch {
    pub texts: Vec<String>,
    pub language: String,
}

/// 转码命令
#[derive(Debug, Clone)]
pub struct Transcode {
    /// 存储目录中的源文件名
    pub filename: String,
    /// 目标格式: mp3 / wav / ogg
    pub format: String,
    /// 质量档位: low / medium / high，缺省为 medium
    pub quality: Option<String>,
}
