//! Resilient multimodal AI client for a chat-bot front end
//!
//! Forwards chat, image generation, text-to-speech and image analysis requests
//! to the Gemini/Imagen REST API with exponential backoff, decodes each
//! endpoint's response envelope into typed artifacts, and wraps synthesized
//! PCM speech in WAV containers.

pub mod ai;
pub mod app;
pub mod audio;
pub mod error;
pub mod models;
pub mod voices;

pub use error::{Error, FailureKind, Result};
