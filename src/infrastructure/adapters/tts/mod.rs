//! TTS Adapter - 语音合成引擎实现

mod fake_tts_client;
mod google_tts_client;

pub use fake_tts_client::{FakeTtsClient, FakeTtsClientConfig};
pub use google_tts_client::*;
