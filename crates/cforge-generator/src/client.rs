//! HTTP client for an OpenAI-compatible chat-completions and image API.
//!
//! [`GenerationBackend`] is the seam the fan-out and the server talk to;
//! [`OpenAiClient`] is the production implementation. The API key is checked
//! lazily on the first request so the process can start (and serve
//! non-generation routes) without credentials.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use cforge_core::AppConfig;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::GenerationError;
use crate::retry::retry_with_backoff;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TEXT_MODEL: &str = "gpt-4";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

const PLACEHOLDER_API_KEY: &str = "your_openai_api_key_here";
const IMAGE_SIZE: &str = "1024x1024";
const IMAGE_QUALITY: &str = "standard";
const BACKOFF_BASE_MS: u64 = 500;

/// One chat-completion call: a system message plus a single user prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Names the operation and platform in errors and logs.
    pub context: String,
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub context: String,
    pub prompt: String,
}

/// A text and image generation service.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Returns the trimmed completion text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError>;

    /// Returns the URL of one generated image.
    async fn create_image(&self, request: ImageRequest) -> Result<String, GenerationError>;
}

/// Connection settings for [`OpenAiClient`].
#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl OpenAiConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.clone(),
            text_model: config.openai_text_model.clone(),
            image_model: config.openai_image_model.clone(),
            timeout_secs: config.openai_timeout_secs,
            max_retries: config.openai_max_retries,
        }
    }

    /// Defaults pointed at `base_url` (for testing with wiremock).
    #[must_use]
    pub fn with_base_url(api_key: Option<&str>, base_url: &str) -> Self {
        Self {
            api_key: api_key.map(str::to_owned),
            base_url: base_url.to_owned(),
            text_model: DEFAULT_TEXT_MODEL.to_owned(),
            image_model: DEFAULT_IMAGE_MODEL.to_owned(),
            timeout_secs: 60,
            max_retries: 2,
        }
    }
}

/// Client for the OpenAI REST API (or any server speaking the same shape).
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
    resolved_key: OnceLock<Result<String, String>>,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    /// # Errors
    ///
    /// Returns [`GenerationError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: OpenAiConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("cforge/0.1 (content-generation)")
            .build()
            .map_err(|source| GenerationError::Http {
                context: "building HTTP client".to_owned(),
                source,
            })?;

        Ok(Self {
            client,
            config: OpenAiConfig {
                base_url: config.base_url.trim_end_matches('/').to_owned(),
                ..config
            },
            resolved_key: OnceLock::new(),
        })
    }

    /// Validates the configured key once and caches the outcome.
    fn api_key(&self) -> Result<&str, GenerationError> {
        self.resolved_key
            .get_or_init(|| resolve_api_key(self.config.api_key.as_deref()))
            .as_deref()
            .map_err(|msg| GenerationError::Configuration(msg.clone()))
    }

    async fn post_json<B, R>(&self, path: &str, body: &B, context: &str) -> Result<R, GenerationError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned + Send,
    {
        let key = self.api_key()?;
        let url = format!("{}{path}", self.config.base_url);
        let url = url.as_str();
        let client = &self.client;

        retry_with_backoff(self.config.max_retries, BACKOFF_BASE_MS, move || async move {
            let response = client
                .post(url)
                .bearer_auth(key)
                .json(body)
                .send()
                .await
                .map_err(|source| GenerationError::Http {
                    context: context.to_owned(),
                    source,
                })?;

            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|source| GenerationError::Http {
                    context: context.to_owned(),
                    source,
                })?;

            if !status.is_success() {
                return Err(GenerationError::Api {
                    context: context.to_owned(),
                    status: status.as_u16(),
                    body: text,
                });
            }

            serde_json::from_str::<R>(&text).map_err(|e| GenerationError::MalformedResponse {
                context: context.to_owned(),
                reason: e.to_string(),
            })
        })
        .await
    }
}

fn resolve_api_key(raw: Option<&str>) -> Result<String, String> {
    match raw.map(str::trim) {
        Some(key) if !key.is_empty() && key != PLACEHOLDER_API_KEY => Ok(key.to_owned()),
        _ => Err("OpenAI API key not configured; set OPENAI_API_KEY".to_owned()),
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ImageGenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'static str,
    quality: &'static str,
    n: u8,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    #[serde(default)]
    url: Option<String>,
}

#[async_trait]
impl GenerationBackend for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError> {
        let body = ChatRequest {
            model: &self.config.text_model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response: ChatResponse = self
            .post_json("/chat/completions", &body, &request.context)
            .await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_owned())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| GenerationError::MalformedResponse {
                context: request.context.clone(),
                reason: "response contained no completion text".to_owned(),
            })?;

        tracing::debug!(context = %request.context, chars = content.len(), "completion received");
        Ok(content)
    }

    async fn create_image(&self, request: ImageRequest) -> Result<String, GenerationError> {
        let body = ImageGenerationRequest {
            model: &self.config.image_model,
            prompt: &request.prompt,
            size: IMAGE_SIZE,
            quality: IMAGE_QUALITY,
            n: 1,
        };

        let response: ImageGenerationResponse = self
            .post_json("/images/generations", &body, &request.context)
            .await?;

        response
            .data
            .into_iter()
            .find_map(|d| d.url)
            .ok_or_else(|| GenerationError::MalformedResponse {
                context: request.context,
                reason: "response contained no image URL".to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_and_blank_keys_are_rejected() {
        assert!(resolve_api_key(None).is_err());
        assert!(resolve_api_key(Some("   ")).is_err());
        assert!(resolve_api_key(Some(PLACEHOLDER_API_KEY)).is_err());
        assert_eq!(resolve_api_key(Some(" sk-test ")).unwrap(), "sk-test");
    }

    #[test]
    fn api_key_resolution_is_cached() {
        let client = OpenAiClient::new(OpenAiConfig::with_base_url(None, DEFAULT_BASE_URL))
            .expect("client construction should not fail");
        assert!(client.api_key().unwrap_err().is_configuration());
        assert!(client.resolved_key.get().is_some());
    }

    #[test]
    fn trailing_slash_is_stripped_from_base_url() {
        let client = OpenAiClient::new(OpenAiConfig::with_base_url(
            Some("sk-test"),
            "http://localhost:9999/v1/",
        ))
        .expect("client construction should not fail");
        assert_eq!(client.config.base_url, "http://localhost:9999/v1");
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = OpenAiConfig::with_base_url(Some("sk-secret"), DEFAULT_BASE_URL);
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("[redacted]"));
    }
}
