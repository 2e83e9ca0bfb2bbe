use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::clients::ClientProfile;

/// Returned by `FromStr` impls on the string-backed enums in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Post,
    Blog,
    Newsletter,
    AdCopy,
    VideoScript,
}

impl ContentType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Post => "post",
            ContentType::Blog => "blog",
            ContentType::Newsletter => "newsletter",
            ContentType::AdCopy => "ad_copy",
            ContentType::VideoScript => "video_script",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContentType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "post" => Ok(ContentType::Post),
            "blog" => Ok(ContentType::Blog),
            "newsletter" => Ok(ContentType::Newsletter),
            "ad_copy" => Ok(ContentType::AdCopy),
            "video_script" => Ok(ContentType::VideoScript),
            other => Err(UnknownVariant {
                kind: "content type",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Pending,
    Approved,
    Edited,
    Regenerated,
}

impl ContentStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContentStatus::Pending => "pending",
            ContentStatus::Approved => "approved",
            ContentStatus::Edited => "edited",
            ContentStatus::Regenerated => "regenerated",
        }
    }
}

impl std::fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContentStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ContentStatus::Pending),
            "approved" => Ok(ContentStatus::Approved),
            "edited" => Ok(ContentStatus::Edited),
            "regenerated" => Ok(ContentStatus::Regenerated),
            other => Err(UnknownVariant {
                kind: "content status",
                value: other.to_string(),
            }),
        }
    }
}

/// Outcome of forwarding one approved draft to the publish webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl PublishResult {
    #[must_use]
    pub fn ok(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// A freshly generated draft that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftCandidate {
    pub platform: String,
    pub content_type: ContentType,
    pub content: String,
    pub generated_image_url: Option<String>,
    /// Set when image generation was requested and failed.
    pub image_failed: bool,
    pub uploaded_images: Vec<String>,
}

impl DraftCandidate {
    /// Assign an id and wrap the candidate as a `pending` draft owned by `profile`.
    #[must_use]
    pub fn into_draft(self, profile: &ClientProfile, now: DateTime<Utc>) -> ContentDraft {
        ContentDraft {
            id: Uuid::new_v4(),
            client_id: profile.client_id,
            client_name: profile.company_name.clone(),
            platform: self.platform,
            content_type: self.content_type,
            content: self.content,
            status: ContentStatus::Pending,
            generated_image_url: self.generated_image_url,
            image_failed: self.image_failed,
            uploaded_images: self.uploaded_images,
            regeneration_count: 0,
            created_at: now,
            edited_at: None,
            approved_at: None,
            regenerated_at: None,
            publish_result: None,
        }
    }
}

/// One generated piece of content for one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentDraft {
    pub id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub platform: String,
    pub content_type: ContentType,
    pub content: String,
    pub status: ContentStatus,
    pub generated_image_url: Option<String>,
    pub image_failed: bool,
    pub uploaded_images: Vec<String>,
    pub regeneration_count: u32,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub regenerated_at: Option<DateTime<Utc>>,
    pub publish_result: Option<PublishResult>,
}

impl ContentDraft {
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.generated_image_url.is_some()
    }

    pub fn approve(&mut self, now: DateTime<Utc>) {
        self.status = ContentStatus::Approved;
        self.approved_at = Some(now);
    }

    /// Replace the body. Status is left as-is.
    pub fn apply_edit(&mut self, content: String, now: DateTime<Utc>) {
        self.content = content;
        self.edited_at = Some(now);
    }

    /// Replace the body with a regenerated one and bump the counter.
    pub fn apply_regeneration(&mut self, content: String, now: DateTime<Utc>) {
        self.content = content;
        self.regenerated_at = Some(now);
        self.regeneration_count = self.regeneration_count.saturating_add(1);
    }
}
