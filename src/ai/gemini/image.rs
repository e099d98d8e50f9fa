use super::client::GeminiHttpClient;
use super::types::{
    decode_base64, parse_body, PredictInstance, PredictParameters, PredictRequest, PredictResponse,
};
use crate::models::Config;
use crate::{Error, Result};

pub const DEFAULT_IMAGE_PROMPT: &str = "A serene landscape with a small wooden cabin.";

/// Generated image bytes and their content type.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

pub fn image_request(prompt: &str) -> PredictRequest {
    let prompt = if prompt.trim().is_empty() {
        DEFAULT_IMAGE_PROMPT
    } else {
        prompt
    };

    PredictRequest {
        instances: vec![PredictInstance {
            prompt: prompt.to_string(),
        }],
        parameters: PredictParameters { sample_count: 1 },
    }
}

/// Extracts `predictions[0].bytesBase64Encoded`.
///
/// Falls back to `predictions[0].error.message` as a provider rejection.
pub fn decode_prediction(body: &str) -> Result<GeneratedImage> {
    let response: PredictResponse = parse_body(body)?;
    let prediction = response.predictions.first();

    if let Some(data) = prediction.and_then(|p| p.bytes_base64_encoded.as_deref()) {
        let bytes = decode_base64(data, "image")?;
        let mime_type = prediction
            .and_then(|p| p.mime_type.clone())
            .or_else(|| {
                image::guess_format(&bytes)
                    .ok()
                    .map(|format| format.to_mime_type().to_string())
            })
            .unwrap_or_else(|| "image/png".to_string());
        return Ok(GeneratedImage { bytes, mime_type });
    }

    match prediction
        .and_then(|p| p.error.as_ref())
        .and_then(|e| e.message.clone())
    {
        Some(message) => Err(Error::ProviderRejected(message)),
        None => Err(Error::MalformedResponse(
            "No image data in Imagen response".to_string(),
        )),
    }
}

pub struct GeminiImageClient {
    http: GeminiHttpClient,
}

impl GeminiImageClient {
    pub fn new(http: GeminiHttpClient) -> Self {
        Self { http }
    }

    pub fn from_config(config: &Config, client: reqwest::Client) -> Self {
        Self::new(GeminiHttpClient::from_config(config, &config.image_model, client))
    }

    pub async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage> {
        let request = image_request(prompt);
        let body = self.http.predict(&request).await?;

        decode_prediction(&body).inspect_err(|e| {
            if let Error::ProviderRejected(message) = e {
                tracing::error!(
                    "Image generation failed for prompt '{}'. API returned: {}",
                    request.instances[0].prompt,
                    message
                );
            }
        })
    }
}
