//! AI service integration
//!
//! Exposes the four bot capabilities (chat, image generation, speech synthesis
//! and image analysis) behind [`CapabilityService`], backed by the Gemini and
//! Imagen REST endpoints.

pub mod backoff;
pub mod client;
pub mod gemini;
pub mod mime;
pub mod mock;

pub use backoff::BackoffExecutor;
pub use client::GeminiClient;
pub use mock::MockCapabilityClient;

use crate::models::{Artifact, CapabilityRequest};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CapabilityService: Send + Sync {
    async fn chat(&self, prompt: &str) -> Result<Artifact>;
    async fn generate_image(&self, prompt: &str) -> Result<Artifact>;
    async fn synthesize_speech(&self, text: &str, voice: &str) -> Result<Artifact>;
    async fn analyze_image(&self, image: &[u8], question: &str) -> Result<Artifact>;

    /// Dispatches `request` to the matching capability.
    async fn execute(&self, request: &CapabilityRequest) -> Result<Artifact> {
        match request {
            CapabilityRequest::Chat { prompt } => self.chat(prompt).await,
            CapabilityRequest::ImageGenerate { prompt } => self.generate_image(prompt).await,
            CapabilityRequest::SpeechSynthesize { text, voice } => {
                self.synthesize_speech(text, voice).await
            }
            CapabilityRequest::ImageAnalyze { image, question } => {
                self.analyze_image(image, question).await
            }
        }
    }
}
