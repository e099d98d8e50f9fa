//! Audio container encoding
//!
//! The TTS endpoint returns headerless 16-bit PCM; chat clients need a playable
//! file, so the samples are wrapped in a WAV container before delivery.

pub mod wav;

pub use wav::{pcm_to_wav, wav_to_pcm, WavHeader, WAV_HEADER_LEN};
