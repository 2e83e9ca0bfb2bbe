use std::time::Duration;

use cforge_core::{AppConfig, ClientProfile, PublishResult};
use reqwest::Client;
use serde::Serialize;
use uuid::Uuid;

use crate::error::DeliveryError;

/// JSON body POSTed to the webhook for one approved draft.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishPayload<'a> {
    pub platform: &'a str,
    pub content: &'a str,
    pub client_id: Uuid,
    pub client_name: &'a str,
    /// Always `null`; the automation side posts immediately.
    pub scheduled_time: Option<&'a str>,
    pub metadata: PublishMetadata<'a>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishMetadata<'a> {
    pub brand_tone: &'a str,
    pub industry: &'a str,
}

impl<'a> PublishPayload<'a> {
    #[must_use]
    pub fn new(platform: &'a str, content: &'a str, profile: &'a ClientProfile) -> Self {
        Self {
            platform,
            content,
            client_id: profile.client_id,
            client_name: &profile.company_name,
            scheduled_time: None,
            metadata: PublishMetadata {
                brand_tone: &profile.brand_tone,
                industry: &profile.industry,
            },
        }
    }
}

/// Client for the publish webhook (an n8n-style automation endpoint).
pub struct WebhookPublisher {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for WebhookPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookPublisher")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .finish_non_exhaustive()
    }
}

impl WebhookPublisher {
    /// # Errors
    ///
    /// Returns [`DeliveryError::Transport`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        url: impl Into<String>,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("cforge/0.1 (publish-webhook)")
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    /// # Errors
    ///
    /// Returns [`DeliveryError::Transport`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, DeliveryError> {
        Self::new(
            config.webhook_url.clone(),
            config.webhook_api_key.clone(),
            config.webhook_timeout_secs,
        )
    }

    /// POST one draft to the webhook.
    ///
    /// Never fails: every outcome, including transport errors, comes back as
    /// a [`PublishResult`] to be stored on the draft.
    pub async fn publish(
        &self,
        platform: &str,
        content: &str,
        profile: &ClientProfile,
    ) -> PublishResult {
        match self.deliver(platform, content, profile).await {
            Ok(data) => {
                tracing::info!(platform, client = %profile.company_name, "content forwarded to webhook");
                PublishResult::ok(format!("Content posted to {platform} successfully"), data)
            }
            Err(e) => {
                tracing::warn!(platform, client = %profile.company_name, error = %e, "webhook delivery failed");
                PublishResult::failed(e.to_string())
            }
        }
    }

    async fn deliver(
        &self,
        platform: &str,
        content: &str,
        profile: &ClientProfile,
    ) -> Result<serde_json::Value, DeliveryError> {
        let payload = PublishPayload::new(platform, content, profile);

        let mut request = self.client.post(&self.url).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(DeliveryError::Rejected {
                platform: platform.to_owned(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
    }
}
