//! OGG/Opus 编码 (RFC 7845)

use ogg::writing::{PacketWriteEndInfo, PacketWriter};
use opus::{Application, Bitrate, Channels, Encoder};

use super::pcm::{to_i16, DecodedAudio};
use crate::application::ports::TranscodeError;

/// Opus 最大包大小
const MAX_PACKET: usize = 4000;
/// 帧长 20ms
const FRAME_MS: usize = 20;
/// granule position 的时间基准
const GRANULE_RATE: f64 = 48_000.0;

fn encoding_error(context: &str, e: impl std::fmt::Display) -> TranscodeError {
    TranscodeError::EncodingError(format!("{}: {}", context, e))
}

/// Opus 支持: 8000, 12000, 16000, 24000, 48000
fn opus_sample_rate(sample_rate: u32) -> u32 {
    match sample_rate {
        8000 | 12000 | 16000 | 24000 | 48000 => sample_rate,
        r if r <= 8000 => 8000,
        r if r <= 12000 => 12000,
        r if r <= 16000 => 16000,
        r if r <= 24000 => 24000,
        _ => 48000,
    }
}

/// 线性插值重采样
fn resample(samples: &[f32], from_rate: u32, to_rate: u32, channels: usize) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let frame_count = samples.len() / channels;
    let new_frame_count = (frame_count as f64 * ratio) as usize;
    let mut resampled = Vec::with_capacity(new_frame_count * channels);

    for i in 0..new_frame_count {
        let src_pos = i as f64 / ratio;
        let src_idx = src_pos as usize;
        let frac = (src_pos - src_idx as f64) as f32;

        for ch in 0..channels {
            let idx0 = src_idx * channels + ch;
            let idx1 = (src_idx + 1).min(frame_count - 1) * channels + ch;
            let s0 = samples.get(idx0).copied().unwrap_or(0.0);
            let s1 = samples.get(idx1).copied().unwrap_or(s0);
            resampled.push(s0 + (s1 - s0) * frac);
        }
    }

    resampled
}

fn opus_head(channels: u8, input_rate: u32, pre_skip: u16) -> Vec<u8> {
    let mut head = Vec::with_capacity(19);
    head.extend_from_slice(b"OpusHead");
    head.push(1); // version
    head.push(channels);
    head.extend_from_slice(&pre_skip.to_le_bytes());
    head.extend_from_slice(&input_rate.to_le_bytes());
    head.extend_from_slice(&0i16.to_le_bytes()); // output gain
    head.push(0); // mapping family
    head
}

fn opus_tags() -> Vec<u8> {
    let vendor = concat!("vocalis ", env!("CARGO_PKG_VERSION"));
    let mut tags = Vec::new();
    tags.extend_from_slice(b"OpusTags");
    tags.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
    tags.extend_from_slice(vendor.as_bytes());
    tags.extend_from_slice(&0u32.to_le_bytes());
    tags
}

/// 编码为 OGG 容器的 Opus 流
pub(super) fn encode_ogg_opus(pcm: &DecodedAudio, bitrate: u32) -> Result<Vec<u8>, TranscodeError> {
    let pcm = pcm.clone().downmix_to_stereo_or_mono();
    let channel_count = pcm.channels as usize;
    let channels = if channel_count == 1 {
        Channels::Mono
    } else {
        Channels::Stereo
    };

    let sample_rate = opus_sample_rate(pcm.sample_rate);
    let samples = resample(&pcm.samples, pcm.sample_rate, sample_rate, channel_count);

    let mut encoder = Encoder::new(sample_rate, channels, Application::Voip)
        .map_err(|e| encoding_error("Failed to create Opus encoder", e))?;
    encoder
        .set_bitrate(Bitrate::Bits(bitrate as i32))
        .map_err(|e| encoding_error("Failed to set bitrate", e))?;

    let pre_skip = encoder.get_lookahead().map(|l| l as u16).unwrap_or(312);

    let pcm_i16 = to_i16(&samples);
    let frame_size = sample_rate as usize * FRAME_MS / 1000;
    let samples_per_frame = frame_size * channel_count;

    // granule position 以 48kHz 计数
    let granule_scale = GRANULE_RATE / sample_rate as f64;
    let frame_granule = (frame_size as f64 * granule_scale) as u64;
    let mut granule_pos = (pre_skip as f64 * granule_scale) as u64;

    // 编码器缓存的 pre_skip 样本需要额外的静音帧推出
    let flush_frames = (pre_skip as usize).div_ceil(frame_size).max(1);

    let mut ogg_data = Vec::new();
    {
        let mut writer = PacketWriter::new(&mut ogg_data);
        writer
            .write_packet(
                opus_head(channel_count as u8, pcm.sample_rate, pre_skip),
                0,
                PacketWriteEndInfo::EndPage,
                0,
            )
            .map_err(|e| encoding_error("Failed to write Opus head", e))?;
        writer
            .write_packet(opus_tags(), 0, PacketWriteEndInfo::EndPage, 0)
            .map_err(|e| encoding_error("Failed to write Opus tags", e))?;

        let mut output_buf = vec![0u8; MAX_PACKET];
        let silence = vec![0i16; samples_per_frame];
        let frames = pcm_i16
            .chunks(samples_per_frame)
            .map(|chunk| {
                let mut frame = chunk.to_vec();
                frame.resize(samples_per_frame, 0);
                frame
            })
            .chain(std::iter::repeat(silence).take(flush_frames));
        let total = pcm_i16.len().div_ceil(samples_per_frame) + flush_frames;

        for (i, frame) in frames.enumerate() {
            let encoded_len = encoder
                .encode(&frame, &mut output_buf)
                .map_err(|e| encoding_error("Opus encode failed", e))?;
            granule_pos += frame_granule;

            let end_info = if i + 1 == total {
                PacketWriteEndInfo::EndStream
            } else {
                PacketWriteEndInfo::NormalPacket
            };
            writer
                .write_packet(output_buf[..encoded_len].to_vec(), 0, end_info, granule_pos)
                .map_err(|e| encoding_error("Failed to write Opus packet", e))?;
        }
    }

    Ok(ogg_data)
}
