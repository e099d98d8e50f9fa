use crate::{Error, Result};

pub const WAV_HEADER_LEN: usize = 44;

const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const PCM_FORMAT_TAG: u16 = 1;

/// Header fields of a canonical PCM WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub data_len: u32,
}

impl WavHeader {
    /// Mono 16-bit header for `data_len` bytes of PCM.
    pub fn mono16(sample_rate: u32, data_len: u32) -> Self {
        Self {
            channels: CHANNELS,
            sample_rate,
            bits_per_sample: BITS_PER_SAMPLE,
            data_len,
        }
    }

    fn block_align(&self) -> u16 {
        self.channels * (self.bits_per_sample / 8)
    }

    fn byte_rate(&self) -> u32 {
        self.sample_rate.saturating_mul(u32::from(self.block_align()))
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + self.data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");

        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&PCM_FORMAT_TAG.to_le_bytes());
        out.extend_from_slice(&self.channels.to_le_bytes());
        out.extend_from_slice(&self.sample_rate.to_le_bytes());
        out.extend_from_slice(&self.byte_rate().to_le_bytes());
        out.extend_from_slice(&self.block_align().to_le_bytes());
        out.extend_from_slice(&self.bits_per_sample.to_le_bytes());

        out.extend_from_slice(b"data");
        out.extend_from_slice(&self.data_len.to_le_bytes());
    }
}

/// Wraps raw little-endian 16-bit mono PCM in a 44-byte WAV header.
pub fn pcm_to_wav(pcm: &[u8], sample_rate: u32) -> Vec<u8> {
    // RIFF sizes are u32; TTS clips are far below 4 GiB.
    let data_len = u32::try_from(pcm.len())
        .unwrap_or(u32::MAX)
        .min(u32::MAX - 36);
    let header = WavHeader::mono16(sample_rate, data_len);

    let mut out = Vec::with_capacity(WAV_HEADER_LEN + pcm.len());
    header.write_to(&mut out);
    out.extend_from_slice(pcm);
    out
}

/// Parses a canonical 44-byte-header WAV produced by [`pcm_to_wav`].
///
/// Returns the header and a borrow of the PCM payload.
pub fn wav_to_pcm(wav: &[u8]) -> Result<(WavHeader, &[u8])> {
    if wav.len() < WAV_HEADER_LEN {
        return Err(Error::MalformedResponse(format!(
            "WAV data too short: {} bytes",
            wav.len()
        )));
    }
    if &wav[0..4] != b"RIFF" || &wav[8..12] != b"WAVE" {
        return Err(Error::MalformedResponse("Missing RIFF/WAVE magic".to_string()));
    }
    if &wav[12..16] != b"fmt " || &wav[36..40] != b"data" {
        return Err(Error::MalformedResponse(
            "Unsupported WAV chunk layout".to_string(),
        ));
    }
    if read_u16(wav, 20) != PCM_FORMAT_TAG {
        return Err(Error::MalformedResponse("WAV data is not PCM".to_string()));
    }

    let header = WavHeader {
        channels: read_u16(wav, 22),
        sample_rate: read_u32(wav, 24),
        bits_per_sample: read_u16(wav, 34),
        data_len: read_u32(wav, 40),
    };

    let end = WAV_HEADER_LEN + header.data_len as usize;
    let pcm = wav.get(WAV_HEADER_LEN..end).ok_or_else(|| {
        Error::MalformedResponse(format!(
            "WAV data chunk declares {} bytes but only {} present",
            header.data_len,
            wav.len() - WAV_HEADER_LEN
        ))
    })?;

    Ok((header, pcm))
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
