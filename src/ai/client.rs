use super::gemini::{GeminiChatClient, GeminiImageClient, GeminiSpeechClient, GeminiVisionClient};
use super::CapabilityService;
use crate::models::{Artifact, Config};
use crate::Result;
use async_trait::async_trait;

/// Capability facade over the Gemini chat, Imagen and TTS endpoints.
///
/// Holds no per-request state, so one instance can serve concurrent users.
pub struct GeminiClient {
    chat: GeminiChatClient,
    image: GeminiImageClient,
    speech: GeminiSpeechClient,
    vision: GeminiVisionClient,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Self {
        Self::new_with_client(config, reqwest::Client::new())
    }

    /// Reuses one HTTP connection pool across the capability clients.
    pub fn new_with_client(config: &Config, client: reqwest::Client) -> Self {
        tracing::info!(
            "Gemini client configured (chat: {}, image: {}, tts: {})",
            config.chat_model,
            config.image_model,
            config.tts_model
        );

        Self {
            chat: GeminiChatClient::from_config(config, client.clone()),
            image: GeminiImageClient::from_config(config, client.clone()),
            speech: GeminiSpeechClient::from_config(config, client.clone()),
            vision: GeminiVisionClient::from_config(config, client),
        }
    }
}

#[async_trait]
impl CapabilityService for GeminiClient {
    async fn chat(&self, prompt: &str) -> Result<Artifact> {
        self.chat.chat(prompt).await.map(Artifact::Text)
    }

    async fn generate_image(&self, prompt: &str) -> Result<Artifact> {
        let image = self.image.generate_image(prompt).await?;
        Ok(Artifact::Image {
            bytes: image.bytes,
            mime_type: image.mime_type,
        })
    }

    async fn synthesize_speech(&self, text: &str, voice: &str) -> Result<Artifact> {
        let wav = self.speech.synthesize(text, voice).await?;
        Ok(Artifact::Audio {
            bytes: wav,
            mime_type: "audio/wav".to_string(),
        })
    }

    async fn analyze_image(&self, image: &[u8], question: &str) -> Result<Artifact> {
        self.vision
            .analyze(image, question)
            .await
            .map(Artifact::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::models::{CapabilityRequest, RetryPolicy};
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_client(server: &MockServer) -> GeminiClient {
        let mut config = Config::with_api_key("test-key".to_string());
        config.base_url = server.uri();
        config.retry = RetryPolicy {
            max_retries: 3,
            initial_delay: Duration::from_millis(1),
        };
        GeminiClient::new(&config)
    }

    #[tokio::test]
    async fn test_chat_routes_to_configured_chat_model() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(
                "/v1beta/models/gemini-2.5-flash-preview-05-20:generateContent",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": "pong" }] } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server);
        let reply = client
            .execute(&CapabilityRequest::Chat {
                prompt: "ping".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(reply, Artifact::Text("pong".to_string()));
    }

    #[tokio::test]
    async fn test_chat_without_candidates_is_empty_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let err = make_client(&server).chat("hello").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::EmptyResponse);
    }

    #[tokio::test]
    async fn test_speech_artifact_is_wav() {
        let server = MockServer::start().await;

        use base64::Engine as _;
        let b64 = base64::engine::general_purpose::STANDARD.encode([0u8; 8]);

        Mock::given(method("POST"))
            .and(path(
                "/v1beta/models/gemini-2.5-flash-preview-tts:generateContent",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "content": { "parts": [{
                    "inlineData": { "mimeType": "audio/L16;rate=24000", "data": b64 }
                }] } }]
            })))
            .mount(&server)
            .await;

        let artifact = make_client(&server)
            .synthesize_speech("Hi", "Kore")
            .await
            .unwrap();

        match artifact {
            Artifact::Audio { bytes, mime_type } => {
                assert_eq!(mime_type, "audio/wav");
                assert_eq!(bytes.len(), 44 + 8);
                assert_eq!(&bytes[0..4], b"RIFF");
            }
            other => panic!("unexpected artifact: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_image_artifact_carries_mime_type() {
        let server = MockServer::start().await;

        use base64::Engine as _;
        let b64 = base64::engine::general_purpose::STANDARD.encode([0xFF, 0xD8, 0xFF, 0xE0]);

        Mock::given(method("POST"))
            .and(path("/v1beta/models/imagen-3.0-generate-002:predict"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "predictions": [{ "bytesBase64Encoded": b64 }]
            })))
            .mount(&server)
            .await;

        let artifact = make_client(&server).generate_image("cabin").await.unwrap();
        assert_eq!(
            artifact,
            Artifact::Image {
                bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
                mime_type: "image/jpeg".to_string(),
            }
        );
    }
}
