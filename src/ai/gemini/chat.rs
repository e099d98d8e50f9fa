use super::client::GeminiHttpClient;
use super::types::{parse_body, Content, GenerateContentRequest, GenerateContentResponse, Part};
use crate::models::Config;
use crate::{Error, Result};

/// Reply returned when the user sends an empty chat message.
pub const EMPTY_PROMPT_HINT: &str =
    "Send me a message and I'll answer it. Type /start to see everything I can do.";

pub fn chat_request(prompt: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: None,
            parts: vec![Part::Text {
                text: prompt.to_string(),
            }],
        }],
    }
}

/// Extracts `candidates[0].content.parts[0].text`.
///
/// Shared by chat and vision, which use the same response envelope.
pub fn decode_text(body: &str) -> Result<String> {
    let response: GenerateContentResponse = parse_body(body)?;

    response
        .first_part()
        .and_then(|part| part.text.as_deref())
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::EmptyResponse("No text in Gemini response".to_string()))
}

pub struct GeminiChatClient {
    http: GeminiHttpClient,
}

impl GeminiChatClient {
    pub fn new(http: GeminiHttpClient) -> Self {
        Self { http }
    }

    pub fn from_config(config: &Config, client: reqwest::Client) -> Self {
        Self::new(GeminiHttpClient::from_config(config, &config.chat_model, client))
    }

    /// Sends `prompt` as a single-turn chat.
    ///
    /// An empty prompt is answered locally with [`EMPTY_PROMPT_HINT`].
    pub async fn chat(&self, prompt: &str) -> Result<String> {
        if prompt.trim().is_empty() {
            return Ok(EMPTY_PROMPT_HINT.to_string());
        }

        let body = self.http.generate_content(&chat_request(prompt)).await?;
        decode_text(&body)
    }
}
