use super::client::GeminiHttpClient;
use super::types::{
    decode_base64, parse_body, Content, GenerateContentResponse, Part, PrebuiltVoiceConfig,
    SpeechConfig, SpeechGenerationConfig, SpeechRequest, VoiceConfig,
};
use crate::audio::pcm_to_wav;
use crate::models::Config;
use crate::voices::VoiceCatalog;
use crate::{Error, Result};

pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Raw PCM returned by the TTS model.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechPayload {
    pub pcm: Vec<u8>,
    pub mime_type: String,
    pub sample_rate: u32,
}

/// Builds the TTS body. `voice` must already be a catalog member.
pub fn speech_request(text: &str, voice: &str) -> SpeechRequest {
    SpeechRequest {
        contents: vec![Content {
            role: None,
            parts: vec![Part::Text {
                text: text.to_string(),
            }],
        }],
        generation_config: SpeechGenerationConfig {
            response_modalities: vec!["AUDIO".to_string()],
            speech_config: SpeechConfig {
                voice_config: VoiceConfig {
                    prebuilt_voice_config: PrebuiltVoiceConfig {
                        voice_name: voice.to_string(),
                    },
                },
            },
        },
    }
}

/// Reads the `rate` parameter of an audio MIME type such as
/// `audio/L16;codec=pcm;rate=24000`, defaulting to 24 kHz.
pub fn parse_sample_rate(mime_type: &str) -> u32 {
    let rate = mime_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("rate") {
            value.trim().parse::<u32>().ok().filter(|rate| *rate > 0)
        } else {
            None
        }
    });

    rate.unwrap_or_else(|| {
        tracing::warn!(
            "Could not parse sample rate from mimeType: {}. Using default {} Hz.",
            mime_type,
            DEFAULT_SAMPLE_RATE
        );
        DEFAULT_SAMPLE_RATE
    })
}

/// Extracts `candidates[0].content.parts[0].inlineData.{data,mimeType}`.
pub fn decode_speech(body: &str) -> Result<SpeechPayload> {
    let response: GenerateContentResponse = parse_body(body)?;

    let inline = response
        .first_part()
        .and_then(|part| part.inline_data.as_ref())
        .ok_or_else(|| Error::MalformedResponse("TTS response missing audio data".to_string()))?;

    let (data, mime_type) = match (inline.data.as_deref(), inline.mime_type.as_deref()) {
        (Some(data), Some(mime_type)) => (data, mime_type),
        _ => {
            return Err(Error::MalformedResponse(
                "TTS inlineData missing data or mimeType".to_string(),
            ))
        }
    };

    Ok(SpeechPayload {
        pcm: decode_base64(data, "audio")?,
        mime_type: mime_type.to_string(),
        sample_rate: parse_sample_rate(mime_type),
    })
}

pub struct GeminiSpeechClient {
    http: GeminiHttpClient,
}

impl GeminiSpeechClient {
    pub fn new(http: GeminiHttpClient) -> Self {
        Self { http }
    }

    pub fn from_config(config: &Config, client: reqwest::Client) -> Self {
        Self::new(GeminiHttpClient::from_config(config, &config.tts_model, client))
    }

    /// Synthesizes `text` with `voice` and returns a mono 16-bit WAV file.
    pub async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>> {
        if text.trim().is_empty() {
            tracing::error!("TTS request received with empty text.");
            return Err(Error::EmptyInput("some text to speak".to_string()));
        }
        let voice = VoiceCatalog::validate(voice).inspect_err(|_| {
            tracing::error!("Invalid voice_name provided: {}", voice);
        })?;

        let body = self
            .http
            .generate_content(&speech_request(text, voice))
            .await?;
        let payload = decode_speech(&body)?;

        tracing::debug!(
            "TTS returned {} PCM bytes at {} Hz ({})",
            payload.pcm.len(),
            payload.sample_rate,
            payload.mime_type
        );

        Ok(pcm_to_wav(&payload.pcm, payload.sample_rate))
    }
}
