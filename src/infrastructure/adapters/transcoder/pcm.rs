//! PCM 解码与 WAV 编码
//!
//! 解码统一走 symphonia，输出交错的 f32 样本

use std::io::Cursor;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::TranscodeError;
use crate::domain::AudioFormat;

/// 解码后的音频
#[derive(Debug, Clone)]
pub(super) struct DecodedAudio {
    /// 交错样本
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u8,
}

impl DecodedAudio {
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0;
        }
        (self.samples.len() as u64 * 1000) / (self.sample_rate as u64 * self.channels as u64)
    }

    /// 多于两个声道时混为单声道
    pub fn downmix_to_stereo_or_mono(self) -> Self {
        if self.channels <= 2 {
            return self;
        }
        let channels = self.channels as usize;
        let samples = self
            .samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();
        Self {
            samples,
            sample_rate: self.sample_rate,
            channels: 1,
        }
    }
}

/// f32 -> i16，超出范围的样本截断
pub(super) fn to_i16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16)
        .collect()
}

/// 使用 symphonia 解码为 PCM
pub(super) fn decode(data: &[u8], source: AudioFormat) -> Result<DecodedAudio, TranscodeError> {
    if data.is_empty() {
        return Err(TranscodeError::InvalidInput("empty input".to_string()));
    }

    let cursor = Cursor::new(data.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let mut hint = Hint::new();
    hint.with_extension(source.extension());

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| TranscodeError::DecodingError(format!("Probe failed: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| TranscodeError::DecodingError("No audio track found".to_string()))?;

    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u8)
        .unwrap_or(0);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| TranscodeError::DecodingError(format!("Decoder creation failed: {}", e)))?;

    let track_id = track.id;
    let mut samples: Vec<f32> = Vec::new();
    let mut decoded_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => {
                return Err(TranscodeError::DecodingError(format!(
                    "Packet read error: {}",
                    e
                )));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::warn!("Decode error (skipping packet): {}", e);
                continue;
            }
            Err(e) => {
                return Err(TranscodeError::DecodingError(e.to_string()));
            }
        };

        let spec = *decoded.spec();
        sample_rate = spec.rate;
        channels = spec.channels.count() as u8;

        let num_frames = decoded.frames();
        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        let actual_samples = num_frames * spec.channels.count();
        samples.extend(&sample_buf.samples()[..actual_samples]);
        decoded_packets += 1;
    }

    if decoded_packets == 0 || sample_rate == 0 || channels == 0 {
        return Err(TranscodeError::DecodingError(
            "no decodable audio".to_string(),
        ));
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

/// 编码为 16 位 PCM WAV
pub(super) fn encode_wav(pcm: &DecodedAudio) -> Vec<u8> {
    let bits_per_sample: u16 = 16;
    let num_channels = pcm.channels as u16;
    let sample_rate = pcm.sample_rate;
    let byte_rate = sample_rate * num_channels as u32 * (bits_per_sample / 8) as u32;
    let block_align = num_channels * (bits_per_sample / 8);

    let pcm_data = to_i16(&pcm.samples);
    let data_size = pcm_data.len() * 2;
    let file_size = 36 + data_size;

    let mut wav = Vec::with_capacity(44 + data_size);

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(file_size as u32).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&num_channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&(data_size as u32).to_le_bytes());
    for sample in pcm_data {
        wav.extend_from_slice(&sample.to_le_bytes());
    }

    wav
}


#[cfg(test)]
mod tests {
    use super::test_audio::*;
    use super::*;

    #[test]
    fn test_wav_round_trip_keeps_duration() {
        let wav = sine_wav();
        let decoded = decode(&wav, AudioFormat::Wav).unwrap();

        assert_eq!(decoded.sample_rate, 16_000);
        assert_eq!(decoded.channels, 1);
        assert!((990..=1010).contains(&decoded.duration_ms()));
    }

    #[test]
    fn test_decode_mp3() {
        let decoded = decode(&silent_mp3(40), AudioFormat::Mp3).unwrap();

        assert_eq!(decoded.sample_rate, 44_100);
        assert_eq!(decoded.channels, 1);
        assert!(decoded.duration_ms() > 0);
    }

    #[test]
    fn test_garbage_is_decoding_error() {
        let err = decode(b"definitely not audio", AudioFormat::Mp3).unwrap_err();
        assert!(matches!(err, TranscodeError::DecodingError(_)));

        let err = decode(&[], AudioFormat::Wav).unwrap_err();
        assert!(matches!(err, TranscodeError::InvalidInput(_)));
    }

    #[test]
    fn test_downmix() {
        let audio = DecodedAudio {
            samples: vec![0.3, 0.3, 0.3, 0.6, 0.6, 0.6],
            sample_rate: 8000,
            channels: 3,
        }
        .downmix_to_stereo_or_mono();

        assert_eq!(audio.channels, 1);
        assert_eq!(audio.samples.len(), 2);
    }
}
