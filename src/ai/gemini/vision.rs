use super::chat::decode_text;
use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentRequest, InlineData, Part};
use crate::ai::mime::detect_image_mime;
use crate::models::Config;
use crate::{Error, Result};

pub const DEFAULT_QUESTION: &str = "Describe this image in detail.";

/// Builds a question-plus-image body; the image is base64-encoded inline.
pub fn vision_request(question: &str, image_bytes: &[u8]) -> GenerateContentRequest {
    use base64::Engine as _;
    let base64_image = base64::engine::general_purpose::STANDARD.encode(image_bytes);

    let question = if question.trim().is_empty() {
        DEFAULT_QUESTION
    } else {
        question
    };

    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![
                Part::Text {
                    text: question.to_string(),
                },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: detect_image_mime(image_bytes).to_string(),
                        data: base64_image,
                    },
                },
            ],
        }],
    }
}

pub struct GeminiVisionClient {
    http: GeminiHttpClient,
}

impl GeminiVisionClient {
    pub fn new(http: GeminiHttpClient) -> Self {
        Self { http }
    }

    pub fn from_config(config: &Config, client: reqwest::Client) -> Self {
        Self::new(GeminiHttpClient::from_config(config, &config.chat_model, client))
    }

    pub async fn analyze(&self, image_bytes: &[u8], question: &str) -> Result<String> {
        if image_bytes.is_empty() {
            return Err(Error::EmptyInput("an image to analyze".to_string()));
        }

        tracing::debug!(
            "Analyzing image ({} bytes) via Gemini",
            image_bytes.len()
        );

        let body = self
            .http
            .generate_content(&vision_request(question, image_bytes))
            .await?;
        decode_text(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::backoff::BackoffExecutor;
    use crate::error::FailureKind;
    use crate::models::RetryPolicy;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use wiremock::matchers::{body_string_contains, method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_client(server: &MockServer) -> GeminiVisionClient {
        GeminiVisionClient::new(
            GeminiHttpClient::new(
                "key".to_string(),
                "gemini-2.5-flash".to_string(),
                Duration::from_secs(5),
            )
            .with_base_url(server.uri())
            .with_backoff(BackoffExecutor::new(RetryPolicy {
                max_retries: 2,
                initial_delay: Duration::from_millis(1),
            })),
        )
    }

    #[test]
    fn test_vision_request_shape() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        let json = serde_json::to_value(vision_request("What is this?", &png)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        { "text": "What is this?" },
                        { "inlineData": { "mimeType": "image/png", "data": "iVBORw0KGgo=" } }
                    ]
                }]
            })
        );
    }

    #[test]
    fn test_vision_request_defaults() {
        let request = vision_request("", &[0x00, 0x01]);
        let json = serde_json::to_value(request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], DEFAULT_QUESTION);
        assert_eq!(
            json["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/jpeg"
        );
    }

    #[tokio::test]
    async fn test_analyze_returns_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path_regex(r"/v1beta/models/.+:generateContent"))
            .and(body_string_contains("\"inlineData\""))
            .and(body_string_contains("\"image/jpeg\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "A cat on a windowsill." }] }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let answer = make_client(&server)
            .analyze(&[0xFF, 0xD8, 0xFF, 0xE0], "What animal is this?")
            .await
            .unwrap();
        assert_eq!(answer, "A cat on a windowsill.");
    }

    #[tokio::test]
    async fn test_analyze_empty_image_makes_no_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = make_client(&server).analyze(&[], "?").await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::EmptyInput);
    }

    #[tokio::test]
    async fn test_analyze_server_error_is_transport() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let err = make_client(&server)
            .analyze(&[0x89, 0x50], "?")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::Transport);
    }
}
