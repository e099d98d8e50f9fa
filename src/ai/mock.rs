use super::CapabilityService;
use crate::audio::pcm_to_wav;
use crate::models::Artifact;
use crate::voices::VoiceCatalog;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// In-memory [`CapabilityService`] for tests and offline runs.
///
/// Queued failures are returned first (in order); afterwards each operation
/// answers with a canned artifact. Clones share state so a test can inspect
/// calls made through a boxed copy.
#[derive(Clone, Default)]
pub struct MockCapabilityClient {
    chat_responses: Arc<Mutex<Vec<String>>>,
    image_responses: Arc<Mutex<Vec<Vec<u8>>>>,
    failures: Arc<Mutex<VecDeque<Error>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockCapabilityClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chat_response(self, response: String) -> Self {
        self.chat_responses.lock().unwrap().push(response);
        self
    }

    pub fn with_image_response(self, response: Vec<u8>) -> Self {
        self.image_responses.lock().unwrap().push(response);
        self
    }

    pub fn with_failure(self, error: Error) -> Self {
        self.failures.lock().unwrap().push_back(error);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    fn record_call(&self) -> Result<usize> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;
        match self.failures.lock().unwrap().pop_front() {
            Some(error) => Err(error),
            None => Ok(*count),
        }
    }
}

#[async_trait]
impl CapabilityService for MockCapabilityClient {
    async fn chat(&self, prompt: &str) -> Result<Artifact> {
        let count = self.record_call()?;

        let responses = self.chat_responses.lock().unwrap();
        if responses.is_empty() {
            Ok(Artifact::Text(format!("You said: {}", prompt)))
        } else {
            let index = (count - 1) % responses.len();
            Ok(Artifact::Text(responses[index].clone()))
        }
    }

    async fn generate_image(&self, _prompt: &str) -> Result<Artifact> {
        let count = self.record_call()?;

        let responses = self.image_responses.lock().unwrap();
        let bytes = if responses.is_empty() {
            // PNG signature only
            vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]
        } else {
            responses[(count - 1) % responses.len()].clone()
        };

        Ok(Artifact::Image {
            bytes,
            mime_type: "image/png".to_string(),
        })
    }

    async fn synthesize_speech(&self, text: &str, voice: &str) -> Result<Artifact> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput("some text to speak".to_string()));
        }
        VoiceCatalog::validate(voice)?;
        self.record_call()?;

        // One silent 16-bit sample per input byte.
        let pcm = vec![0u8; text.len() * 2];
        Ok(Artifact::Audio {
            bytes: pcm_to_wav(&pcm, 24_000),
            mime_type: "audio/wav".to_string(),
        })
    }

    async fn analyze_image(&self, image: &[u8], question: &str) -> Result<Artifact> {
        if image.is_empty() {
            return Err(Error::EmptyInput("an image to analyze".to_string()));
        }
        self.record_call()?;
        Ok(Artifact::Text(format!(
            "An image of {} bytes. Question: {}",
            image.len(),
            question
        )))
    }
}
