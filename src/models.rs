//! Data models and structures
//!
//! Defines capability requests, the artifacts they produce, and the runtime
//! configuration for the provider client.

use crate::{Error, Result};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.5-flash-preview-05-20";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-3.0-generate-002";
pub const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// A single user request for one of the four capabilities.
#[derive(Debug, Clone, PartialEq)]
pub enum CapabilityRequest {
    Chat { prompt: String },
    ImageGenerate { prompt: String },
    SpeechSynthesize { text: String, voice: String },
    ImageAnalyze { image: Vec<u8>, question: String },
}

impl CapabilityRequest {
    pub fn name(&self) -> &'static str {
        match self {
            CapabilityRequest::Chat { .. } => "chat",
            CapabilityRequest::ImageGenerate { .. } => "image",
            CapabilityRequest::SpeechSynthesize { .. } => "speech",
            CapabilityRequest::ImageAnalyze { .. } => "analyze",
        }
    }
}

/// Successful output of a capability call.
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    Text(String),
    Image { bytes: Vec<u8>, mime_type: String },
    Audio { bytes: Vec<u8>, mime_type: String },
}

impl Artifact {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Artifact::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Raw bytes of a media artifact.
    pub fn media_bytes(&self) -> Option<&[u8]> {
        match self {
            Artifact::Image { bytes, .. } | Artifact::Audio { bytes, .. } => Some(bytes),
            Artifact::Text(_) => None,
        }
    }

    /// File extension matching the artifact's content.
    pub fn file_extension(&self) -> &'static str {
        match self {
            Artifact::Text(_) => "txt",
            Artifact::Audio { .. } => "wav",
            Artifact::Image { mime_type, .. } => match mime_type.as_str() {
                "image/jpeg" => "jpg",
                "image/webp" => "webp",
                _ => "png",
            },
        }
    }
}

/// Backoff tuning for outbound calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 10,
            initial_delay: Duration::from_secs(2),
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub chat_model: String,
    pub image_model: String,
    pub tts_model: String,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Config {
    /// Config with provider defaults and the given credential.
    pub fn with_api_key(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            request_timeout: Duration::from_secs(60),
            retry: RetryPolicy::default(),
        }
    }

    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds config from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("AI_TOKEN"))
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Config("GEMINI_API_KEY not set".to_string()))?;

        let mut config = Self::with_api_key(api_key);

        if let Some(base_url) = lookup("GEMINI_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(model) = lookup("GEMINI_CHAT_MODEL") {
            config.chat_model = model;
        }
        if let Some(model) = lookup("GEMINI_IMAGE_MODEL") {
            config.image_model = model;
        }
        if let Some(model) = lookup("GEMINI_TTS_MODEL") {
            config.tts_model = model;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "AI_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = parse_var::<usize>(&lookup, "AI_MAX_RETRIES")? {
            config.retry.max_retries = retries;
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "AI_INITIAL_BACKOFF_MS")? {
            config.retry.initial_delay = Duration::from_millis(ms);
        }

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} must be a non-negative integer, got '{}'", key, raw))),
    }
}
