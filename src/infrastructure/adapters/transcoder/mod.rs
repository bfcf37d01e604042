//! Transcoder Adapter - 音频转码实现
//!
//! - pcm: symphonia 解码与 WAV 编码
//! - opus: OGG/Opus 编码
//! - ffmpeg: MP3 编码（外部进程）

mod ffmpeg;
mod opus_ogg;
mod pcm;
mod symphonia_transcoder;

pub use ffmpeg::FfmpegEncoder;
pub use symphonia_transcoder::{SymphoniaTranscoder, SymphoniaTranscoderConfig};
