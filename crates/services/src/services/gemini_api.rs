//! Gemini API client for the conversational assistant.

use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-1.5-pro";
const FALLBACK_MODEL: &str = "gemini-1.0-pro";

#[derive(Debug, Clone, Error)]
pub enum GeminiApiError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("rate limited")]
    RateLimited,
    #[error("invalid api key")]
    InvalidApiKey,
    #[error("model not available")]
    ModelNotFound,
    #[error("json error: {0}")]
    Serde(String),
    #[error("missing api key: GEMINI_API_KEY environment variable not set")]
    MissingApiKey,
}

impl GeminiApiError {
    /// Returns true if the error is transient and should be retried.
    pub fn should_retry(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout | Self::RateLimited => true,
            Self::Http { status, .. } => (500..=599).contains(status),
            _ => false,
        }
    }
}

/// A piece of content in a request or candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }
}

/// Request body for the generateContent endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

/// Response from the generateContent endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

/// Token usage information
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
}

impl GenerateResponse {
    /// Extract the text of the first candidate, if any
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .and_then(|content| content.parts.first())
            .map(|part| part.text.as_str())
    }
}

/// Gemini API client
#[derive(Debug, Clone)]
pub struct GeminiApiClient {
    http: Client,
    api_key: String,
    model: String,
}

impl GeminiApiClient {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a new client using the GEMINI_API_KEY environment variable
    pub fn from_env() -> Result<Self, GeminiApiError> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| GeminiApiError::MissingApiKey)?;
        Self::new(api_key, None)
    }

    /// Create a new client with the given API key
    pub fn new(api_key: String, model: Option<String>) -> Result<Self, GeminiApiError> {
        let http = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .user_agent(concat!("waterbuddy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GeminiApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    /// Send a generation request, falling back to the older model when the
    /// configured one is not available on this key.
    pub async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<GenerateResponse, GeminiApiError> {
        let request = GenerateRequest {
            contents: vec![Content::user(prompt)],
            generation_config: Some(GenerationConfig {
                max_output_tokens: max_tokens,
            }),
        };

        match self.generate_with_model(&self.model, &request).await {
            Err(GeminiApiError::ModelNotFound) if self.model != FALLBACK_MODEL => {
                warn!(
                    model = %self.model,
                    fallback = FALLBACK_MODEL,
                    "model not available, retrying with fallback"
                );
                self.generate_with_model(FALLBACK_MODEL, &request).await
            }
            other => other,
        }
    }

    async fn generate_with_model(
        &self,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, GeminiApiError> {
        (|| async { self.send_request(model, request).await })
            .retry(
                &ExponentialBuilder::default()
                    .with_min_delay(Duration::from_secs(1))
                    .with_max_delay(Duration::from_secs(10))
                    .with_max_times(2)
                    .with_jitter(),
            )
            .when(|e: &GeminiApiError| e.should_retry())
            .notify(|e, dur| {
                warn!(
                    "Gemini API call failed, retrying after {:.2}s: {}",
                    dur.as_secs_f64(),
                    e
                )
            })
            .await
    }

    async fn send_request(
        &self,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, GeminiApiError> {
        let url = format!("{GEMINI_API_BASE}/{model}:generateContent");
        let res = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        match res.status() {
            s if s.is_success() => res
                .json::<GenerateResponse>()
                .await
                .map_err(|e| GeminiApiError::Serde(e.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(GeminiApiError::InvalidApiKey),
            StatusCode::TOO_MANY_REQUESTS => Err(GeminiApiError::RateLimited),
            StatusCode::NOT_FOUND => Err(GeminiApiError::ModelNotFound),
            StatusCode::BAD_REQUEST => {
                let body = res.text().await.unwrap_or_default();
                // The API reports bad keys as 400 with this reason code
                if body.contains("API_KEY_INVALID") || body.contains("API key not valid") {
                    Err(GeminiApiError::InvalidApiKey)
                } else {
                    Err(GeminiApiError::Http { status: 400, body })
                }
            }
            s => {
                let status = s.as_u16();
                let body = res.text().await.unwrap_or_default();
                Err(GeminiApiError::Http { status, body })
            }
        }
    }

    /// Simple helper to send a prompt and get the reply text
    pub async fn ask(&self, prompt: &str) -> Result<String, GeminiApiError> {
        let response = self.generate(prompt, 256).await?;

        response
            .text()
            .map(|s| s.to_string())
            .ok_or_else(|| GeminiApiError::Serde("no text content in response".to_string()))
    }

    /// Send a minimal one-token request to check that the key is accepted.
    /// No retries; callers want the verdict immediately.
    pub async fn validate_key(&self) -> Result<(), GeminiApiError> {
        let request = GenerateRequest {
            contents: vec![Content::user("ping")],
            generation_config: Some(GenerationConfig {
                max_output_tokens: 1,
            }),
        };

        let result = match self.send_request(&self.model, &request).await {
            Err(GeminiApiError::ModelNotFound) if self.model != FALLBACK_MODEL => {
                self.send_request(FALLBACK_MODEL, &request).await
            }
            other => other,
        };
        result.map(|_| ())
    }
}

fn map_reqwest_error(e: reqwest::Error) -> GeminiApiError {
    if e.is_timeout() {
        GeminiApiError::Timeout
    } else {
        GeminiApiError::Transport(e.to_string())
    }
}
