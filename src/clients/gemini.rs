use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use super::ChatProvider;
use crate::{
    config::ChatConfig,
    error::{AppError, Result},
    models::gemini::{GenerateContentRequest, GenerateContentResponse},
};

const RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Gemini `generateContent` over HTTPS, with one bounded timeout per attempt.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    max_retries: u32,
}

impl GeminiClient {
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            max_retries: config.max_retries,
        })
    }

    fn endpoint(&self, api_key: &str) -> String {
        format!("{}/models/{}:generateContent?key={}", self.base_url, self.model, api_key)
    }

    async fn read_response(&self, response: reqwest::Response) -> Result<GenerateContentResponse> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(network_error)?;

        debug!(%status, payload = %body, "gemini response");

        match serde_json::from_str::<GenerateContentResponse>(&body) {
            Ok(parsed) if status.is_success() || parsed.error.is_some() => Ok(parsed),
            Ok(_) => Err(AppError::Provider(format!("HTTP {status}"))),
            Err(e) => match plain_error_message(&body) {
                Some(message) => Err(AppError::Provider(message)),
                None if status.is_success() => Err(AppError::Parse(e.to_string())),
                None => Err(AppError::Provider(format!("HTTP {status}"))),
            },
        }
    }
}

#[async_trait]
impl ChatProvider for GeminiClient {
    async fn generate(&self, request: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Config("API key not configured".into()))?;
        let url = self.endpoint(api_key);
        debug!(model = %self.model, turns = request.contents.len(), "calling gemini");

        let mut attempt = 0u32;
        loop {
            let retries_left = attempt < self.max_retries;
            match self.http.post(&url).json(request).send().await {
                Ok(response) if retries_left && is_retryable_status(response.status()) => {
                    let status = response.status();
                    warn!(%status, attempt, "gemini unavailable, retrying");
                }
                Ok(response) => return self.read_response(response).await,
                Err(e) if retries_left && is_transient(&e) => {
                    let e = e.without_url();
                    warn!(error = %e, attempt, "gemini request failed, retrying");
                }
                Err(e) => return Err(network_error(e)),
            }
            attempt += 1;
            tokio::time::sleep(RETRY_BACKOFF * attempt).await;
        }
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
    )
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

/// The request URL carries the key, so it never reaches the message.
fn network_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Network("Gemini request timed out".into())
    } else if err.is_connect() {
        AppError::Network(format!("could not reach Gemini: {}", err.without_url()))
    } else {
        AppError::Network(err.without_url().to_string())
    }
}

/// Proxies in front of Gemini sometimes answer `{"error": "<text>"}`.
fn plain_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("error")?.as_str().map(str::to_string)
}
