//! FFmpeg MP3 编码器
//!
//! 通过外部 ffmpeg 进程把 WAV 编码为 MP3（libmp3lame），
//! 数据经 stdin/stdout 管道传递，不落临时文件。

use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::application::ports::TranscodeError;

/// FFmpeg 编码器
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    ffmpeg_path: String,
}

impl FfmpegEncoder {
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    /// 检查 ffmpeg 是否可执行
    pub async fn is_available(&self) -> bool {
        Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// WAV -> MP3
    pub async fn wav_to_mp3(&self, wav: Vec<u8>, bitrate: u32) -> Result<Vec<u8>, TranscodeError> {
        let bitrate_arg = format!("{}k", bitrate / 1000);

        let mut child = Command::new(&self.ffmpeg_path)
            .args(["-loglevel", "error", "-f", "wav", "-i", "pipe:0"])
            .args(["-codec:a", "libmp3lame", "-b:a", bitrate_arg.as_str()])
            .args(["-f", "mp3", "pipe:1"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| TranscodeError::IoError(format!("Failed to spawn ffmpeg: {}", e)))?;

        // 输入和输出同时进行，避免管道缓冲区写满后互相等待
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| TranscodeError::IoError("ffmpeg stdin unavailable".to_string()))?;
        let feeder = tokio::spawn(async move {
            let result = stdin.write_all(&wav).await;
            drop(stdin);
            result
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| TranscodeError::IoError(format!("Failed to wait for ffmpeg: {}", e)))?;

        match feeder.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(TranscodeError::IoError(format!(
                    "Failed to write to ffmpeg stdin: {}",
                    e
                )))
            }
            Err(e) => return Err(TranscodeError::IoError(e.to_string())),
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TranscodeError::EncodingError(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        if output.stdout.is_empty() {
            return Err(TranscodeError::EncodingError(
                "ffmpeg produced no output".to_string(),
            ));
        }

        tracing::debug!(bitrate, size = output.stdout.len(), "Encoded to MP3 via ffmpeg");

        Ok(output.stdout)
    }
}
