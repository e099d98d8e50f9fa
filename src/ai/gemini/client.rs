use crate::ai::backoff::BackoffExecutor;
use crate::models::{Config, DEFAULT_BASE_URL};
use crate::{Error, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Lightweight Gemini REST client shared by the capability modules.
///
/// Every request goes through the [`BackoffExecutor`]; a response that is still
/// non-2xx once backoff gives up on it is surfaced as [`Error::Status`].
pub struct GeminiHttpClient {
    pub(crate) client: Client,
    pub(crate) api_key: String,
    model: String,
    pub(crate) base_url: String,
    timeout: Duration,
    backoff: BackoffExecutor,
}

impl GeminiHttpClient {
    /// Construct a Gemini client.
    ///
    /// `model` should be the bare model ID (for example `imagen-3.0-generate-002`),
    /// not a `models/...`-prefixed path segment.
    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, model, timeout, Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        timeout: Duration,
        client: Client,
    ) -> Self {
        let model = model.strip_prefix("models/").unwrap_or(&model).to_string();

        Self {
            client,
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
            backoff: BackoffExecutor::default(),
        }
    }

    /// Client for `model` using the endpoint, timeout and retry policy in `config`.
    pub fn from_config(config: &Config, model: &str, client: Client) -> Self {
        Self::new_with_client(
            config.api_key.clone(),
            model.to_string(),
            config.request_timeout,
            client,
        )
        .with_base_url(config.base_url.clone())
        .with_backoff(BackoffExecutor::new(config.retry))
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_backoff(mut self, backoff: BackoffExecutor) -> Self {
        self.backoff = backoff;
        self
    }

    /// Returns the configured model ID without the `models/` prefix.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/v1beta/models/{}:{}", self.base_url, self.model, method)
    }

    /// POSTs `request` and returns the raw 2xx body.
    async fn post_for_body<Req: Serialize>(&self, url: String, request: &Req) -> Result<String> {
        tracing::debug!("Sending request to Gemini model {}", self.model);

        let response = self
            .backoff
            .execute(|| {
                self.client
                    .post(&url)
                    .timeout(self.timeout)
                    .header("x-goog-api-key", &self.api_key)
                    .header("Content-Type", "application/json")
                    .json(request)
                    .send()
            })
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            tracing::error!("Gemini API error (status {}): {}", status, error_text);
            return Err(Error::Status {
                status,
                body: error_text,
            });
        }

        // Only the send is retried; a body read failing after the status
        // arrived surfaces as a transport error.
        Ok(response.text().await?)
    }

    /// Calls Gemini's `generateContent` endpoint for chat/vision/speech requests.
    pub async fn generate_content<Req: Serialize>(&self, request: &Req) -> Result<String> {
        self.post_for_body(self.method_url("generateContent"), request)
            .await
    }

    /// Calls the Imagen `predict` endpoint.
    pub async fn predict<Req: Serialize>(&self, request: &Req) -> Result<String> {
        self.post_for_body(self.method_url("predict"), request).await
    }
}
