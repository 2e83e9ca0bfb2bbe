use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::ConfigError;

const DEFAULT_MARKETING_GOALS: &str = "Brand awareness";
const DEFAULT_CONTENT_PREFERENCES: &str = "Educational";

/// A stored upload (image or video) attached to a client at onboarding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub filename: String,
    #[serde(default)]
    pub stored_filename: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub url: Option<String>,
}

/// An onboarded client and the brand context used to steer generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub client_id: Uuid,
    pub company_name: String,
    pub industry: String,
    pub brand_tone: String,
    pub target_audience: String,
    pub marketing_goals: Option<String>,
    pub content_preferences: Option<String>,
    pub past_examples: Option<String>,
    pub website_url: Option<String>,
    pub social_media_handles: Option<String>,
    pub budget_range: Option<String>,
    /// Comma-separated platform names, e.g. `"LinkedIn, Twitter"`.
    pub primary_channels: Option<String>,
    pub texts: Option<String>,
    pub generate_images: bool,
    pub images: Vec<MediaRef>,
    pub videos: Vec<MediaRef>,
    pub onboarded_at: DateTime<Utc>,
}

impl ClientProfile {
    #[must_use]
    pub fn marketing_goals_or_default(&self) -> &str {
        self.marketing_goals
            .as_deref()
            .unwrap_or(DEFAULT_MARKETING_GOALS)
    }

    #[must_use]
    pub fn content_preferences_or_default(&self) -> &str {
        self.content_preferences
            .as_deref()
            .unwrap_or(DEFAULT_CONTENT_PREFERENCES)
    }

    /// URLs of uploaded images that are reachable downstream.
    #[must_use]
    pub fn uploaded_image_urls(&self) -> Vec<String> {
        self.images.iter().filter_map(|m| m.url.clone()).collect()
    }
}

/// Onboarding payload as it arrives from the outside world.
///
/// `generate_images` accepts either a JSON boolean or the form-style strings
/// `"true"` / `"on"`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OnboardingRequest {
    pub company_name: String,
    pub industry: String,
    pub brand_tone: String,
    pub target_audience: String,
    #[serde(default)]
    pub marketing_goals: Option<String>,
    #[serde(default)]
    pub content_preferences: Option<String>,
    #[serde(default)]
    pub past_examples: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub social_media_handles: Option<String>,
    #[serde(default)]
    pub budget_range: Option<String>,
    #[serde(default)]
    pub primary_channels: Option<String>,
    #[serde(default)]
    pub texts: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub generate_images: bool,
    #[serde(default)]
    pub images: Vec<MediaRef>,
    #[serde(default)]
    pub videos: Vec<MediaRef>,
}

impl OnboardingRequest {
    /// Validate the request and turn it into a stored profile.
    ///
    /// Required text fields are trimmed and must be non-empty; blank optional
    /// fields are normalised to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first offending field.
    pub fn into_profile(
        self,
        client_id: Uuid,
        onboarded_at: DateTime<Utc>,
    ) -> Result<ClientProfile, ConfigError> {
        let company_name = required("company_name", &self.company_name)?;
        let industry = required("industry", &self.industry)?;
        let brand_tone = required("brand_tone", &self.brand_tone)?;
        let target_audience = required("target_audience", &self.target_audience)?;

        if company_name.chars().count() > 200 {
            return Err(ConfigError::Validation(
                "company_name must be 1-200 characters".to_string(),
            ));
        }

        Ok(ClientProfile {
            client_id,
            company_name,
            industry,
            brand_tone,
            target_audience,
            marketing_goals: non_blank(self.marketing_goals),
            content_preferences: non_blank(self.content_preferences),
            past_examples: non_blank(self.past_examples),
            website_url: non_blank(self.website_url),
            social_media_handles: non_blank(self.social_media_handles),
            budget_range: non_blank(self.budget_range),
            primary_channels: non_blank(self.primary_channels),
            texts: non_blank(self.texts),
            generate_images: self.generate_images,
            images: self.images,
            videos: self.videos,
            onboarded_at,
        })
    }
}

/// Interpret a form-style checkbox value.
#[must_use]
pub fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "true" | "on")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Bool(bool),
    Text(String),
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<FlagRepr>::deserialize(deserializer)? {
        Some(FlagRepr::Bool(b)) => b,
        Some(FlagRepr::Text(s)) => parse_flag(&s),
        None => false,
    })
}

fn required(field: &str, value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{field} must be non-empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Load a client profile from a YAML onboarding file.
///
/// The file has the same shape as the onboarding request. A fresh client id
/// is assigned.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_profile(path: &Path) -> Result<ClientProfile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProfileFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let request: OnboardingRequest = serde_yaml::from_str(&content)?;
    request.into_profile(Uuid::new_v4(), Utc::now())
}
