//! Single-draft generation and the per-platform fan-out.
//!
//! [`generate_for_all_platforms`] is tolerant: one platform failing is logged
//! and recorded, and the batch moves on. The exception is a configuration
//! error, which would fail every platform identically and ends the batch.

use cforge_core::{ClientProfile, ContentType, DraftCandidate};
use serde::Serialize;

use crate::client::{CompletionRequest, GenerationBackend, ImageRequest};
use crate::error::GenerationError;
use crate::prompts::{build_generation_prompt, build_image_prompt, build_regeneration_prompt};

/// Used when a profile names no platforms.
pub const DEFAULT_PLATFORMS: [&str; 3] = ["LinkedIn", "Twitter", "Instagram"];

const GENERATION_SYSTEM: &str = "You are an expert marketing content writer specializing in \
     creating engaging, brand-aligned content for various platforms.";
const REGENERATION_SYSTEM: &str = "You are an expert marketing content writer specializing in \
     regenerating and improving existing content while maintaining brand consistency and \
     increasing engagement.";

const GENERATION_TEMPERATURE: f32 = 0.7;
const GENERATION_MAX_TOKENS: u32 = 1000;
const REGENERATION_TEMPERATURE: f32 = 0.8;
const REGENERATION_MAX_TOKENS: u32 = 1500;

/// A platform the fan-out could not produce a draft for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformFailure {
    pub platform: String,
    pub message: String,
}

/// Drafts in platform order, plus the platforms that failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FanOutReport {
    pub drafts: Vec<DraftCandidate>,
    pub failures: Vec<PlatformFailure>,
}

/// Split a comma-separated channel list into trimmed platform names.
///
/// Returns [`DEFAULT_PLATFORMS`] when nothing usable remains.
#[must_use]
pub fn resolve_platforms(primary_channels: Option<&str>) -> Vec<String> {
    let platforms: Vec<String> = primary_channels
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_owned)
        .collect();

    if platforms.is_empty() {
        DEFAULT_PLATFORMS.iter().map(|p| (*p).to_owned()).collect()
    } else {
        platforms
    }
}

#[must_use]
pub fn content_type_for(platform: &str) -> ContentType {
    match platform {
        "Email" => ContentType::Newsletter,
        "Website" => ContentType::Blog,
        "YouTube" => ContentType::VideoScript,
        _ => ContentType::Post,
    }
}

/// Generate one draft body for `platform`.
///
/// # Errors
///
/// Returns the backend's [`GenerationError`] unchanged.
pub async fn generate_content(
    backend: &dyn GenerationBackend,
    profile: &ClientProfile,
    platform: &str,
    content_type: ContentType,
    topic: Option<&str>,
) -> Result<String, GenerationError> {
    backend
        .complete(CompletionRequest {
            context: format!("generate {content_type} for {platform}"),
            system: GENERATION_SYSTEM.to_owned(),
            prompt: build_generation_prompt(profile, platform, content_type, topic),
            temperature: GENERATION_TEMPERATURE,
            max_tokens: GENERATION_MAX_TOKENS,
        })
        .await
}

/// Produce an improved rewrite of `existing`.
///
/// # Errors
///
/// Returns the backend's [`GenerationError`] unchanged.
pub async fn regenerate_content(
    backend: &dyn GenerationBackend,
    profile: &ClientProfile,
    platform: &str,
    content_type: ContentType,
    existing: &str,
    focus: Option<&str>,
) -> Result<String, GenerationError> {
    backend
        .complete(CompletionRequest {
            context: format!("regenerate {content_type} for {platform}"),
            system: REGENERATION_SYSTEM.to_owned(),
            prompt: build_regeneration_prompt(profile, platform, content_type, existing, focus),
            temperature: REGENERATION_TEMPERATURE,
            max_tokens: REGENERATION_MAX_TOKENS,
        })
        .await
}

/// Generate one marketing image for `platform` and return its URL.
///
/// # Errors
///
/// Returns the backend's [`GenerationError`] unchanged.
pub async fn generate_image(
    backend: &dyn GenerationBackend,
    profile: &ClientProfile,
    platform: &str,
) -> Result<String, GenerationError> {
    backend
        .create_image(ImageRequest {
            context: format!("image for {platform}"),
            prompt: build_image_prompt(profile, platform),
        })
        .await
}

/// Generate a draft for every platform on the profile, one after another.
///
/// When the profile asks for images, each successful draft also gets an
/// image; any image failure, including a configuration error, sets
/// `image_failed` and keeps the draft. After an image configuration error no
/// further image calls are made for the batch.
///
/// # Errors
///
/// Returns [`GenerationError::Configuration`] when text generation is not
/// configured. Every other text error is recorded in
/// [`FanOutReport::failures`].
pub async fn generate_for_all_platforms(
    backend: &dyn GenerationBackend,
    profile: &ClientProfile,
) -> Result<FanOutReport, GenerationError> {
    let platforms = resolve_platforms(profile.primary_channels.as_deref());
    let uploaded_images = profile.uploaded_image_urls();
    let mut report = FanOutReport::default();
    let mut images_unavailable = false;

    for platform in platforms {
        let content_type = content_type_for(&platform);

        let content = match generate_content(backend, profile, &platform, content_type, None).await
        {
            Ok(content) => content,
            Err(e) if e.is_configuration() => return Err(e),
            Err(e) => {
                tracing::warn!(
                    client = %profile.company_name,
                    platform = %platform,
                    error = %e,
                    "content generation failed; skipping platform"
                );
                report.failures.push(PlatformFailure {
                    platform,
                    message: e.to_string(),
                });
                continue;
            }
        };

        let mut generated_image_url = None;
        let mut image_failed = false;
        if profile.generate_images && images_unavailable {
            image_failed = true;
        } else if profile.generate_images {
            match generate_image(backend, profile, &platform).await {
                Ok(url) => generated_image_url = Some(url),
                Err(e) if e.is_configuration() => {
                    tracing::warn!(
                        client = %profile.company_name,
                        platform = %platform,
                        error = %e,
                        "image generation not configured; skipping images for this batch"
                    );
                    images_unavailable = true;
                    image_failed = true;
                }
                Err(e) => {
                    tracing::warn!(
                        client = %profile.company_name,
                        platform = %platform,
                        error = %e,
                        "image generation failed; keeping text draft"
                    );
                    image_failed = true;
                }
            }
        }

        report.drafts.push(DraftCandidate {
            platform,
            content_type,
            content,
            generated_image_url,
            image_failed,
            uploaded_images: uploaded_images.clone(),
        });
    }

    tracing::info!(
        client = %profile.company_name,
        drafts = report.drafts.len(),
        failures = report.failures.len(),
        "fan-out complete"
    );
    Ok(report)
}

#[cfg(test)]
#[path = "fanout_test.rs"]
mod tests;
