use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use cforge_core::MediaRef;
use uuid::Uuid;

use super::*;

/// Scripted backend: fails completions/images whose context mentions one of
/// the listed platforms, and records every request it sees.
#[derive(Default)]
struct FakeBackend {
    fail_text_for: Vec<&'static str>,
    fail_images_for: Vec<&'static str>,
    unconfigured: bool,
    images_unconfigured: bool,
    completions: Mutex<Vec<CompletionRequest>>,
    images: Mutex<Vec<ImageRequest>>,
}

fn mentions(context: &str, platforms: &[&str]) -> bool {
    platforms.iter().any(|p| context.ends_with(p))
}

#[async_trait]
impl GenerationBackend for FakeBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError> {
        if self.unconfigured {
            return Err(GenerationError::Configuration("no key".to_owned()));
        }
        self.completions.lock().unwrap().push(request.clone());
        if mentions(&request.context, &self.fail_text_for) {
            return Err(GenerationError::Api {
                context: request.context,
                status: 500,
                body: "upstream exploded".to_owned(),
            });
        }
        Ok(format!("copy for {}", request.context))
    }

    async fn create_image(&self, request: ImageRequest) -> Result<String, GenerationError> {
        self.images.lock().unwrap().push(request.clone());
        if self.images_unconfigured {
            return Err(GenerationError::Configuration("no image key".to_owned()));
        }
        if mentions(&request.context, &self.fail_images_for) {
            return Err(GenerationError::MalformedResponse {
                context: request.context,
                reason: "no url".to_owned(),
            });
        }
        Ok(format!("https://images.example/{}.png", self.images.lock().unwrap().len()))
    }
}

fn profile(channels: Option<&str>, generate_images: bool) -> ClientProfile {
    ClientProfile {
        client_id: Uuid::new_v4(),
        company_name: "Acme".to_string(),
        industry: "Retail".to_string(),
        brand_tone: "Playful".to_string(),
        target_audience: "Parents".to_string(),
        marketing_goals: None,
        content_preferences: None,
        past_examples: None,
        website_url: None,
        social_media_handles: None,
        budget_range: None,
        primary_channels: channels.map(str::to_string),
        texts: None,
        generate_images,
        images: vec![MediaRef {
            filename: "logo.png".to_string(),
            stored_filename: Some("1.png".to_string()),
            content_type: Some("image/png".to_string()),
            size: 10,
            url: Some("/uploads/images/1.png".to_string()),
        }],
        videos: vec![],
        onboarded_at: Utc::now(),
    }
}

#[test]
fn resolve_platforms_keeps_order_and_trims() {
    assert_eq!(
        resolve_platforms(Some("LinkedIn, Twitter")),
        vec!["LinkedIn".to_string(), "Twitter".to_string()]
    );
    assert_eq!(
        resolve_platforms(Some(" Email ,,YouTube,")),
        vec!["Email".to_string(), "YouTube".to_string()]
    );
}

#[test]
fn resolve_platforms_defaults_when_empty() {
    for input in [None, Some(""), Some("   "), Some(" , ,")] {
        assert_eq!(resolve_platforms(input), DEFAULT_PLATFORMS, "input {input:?}");
    }
}

#[test]
fn content_type_follows_platform() {
    assert_eq!(content_type_for("LinkedIn"), ContentType::Post);
    assert_eq!(content_type_for("Reddit"), ContentType::Post);
    assert_eq!(content_type_for("Email"), ContentType::Newsletter);
    assert_eq!(content_type_for("Website"), ContentType::Blog);
    assert_eq!(content_type_for("YouTube"), ContentType::VideoScript);
    assert_eq!(content_type_for("Mastodon"), ContentType::Post);
}

#[tokio::test]
async fn one_failing_platform_yields_remaining_drafts() {
    let backend = FakeBackend {
        fail_text_for: vec!["Twitter"],
        ..FakeBackend::default()
    };
    let report = generate_for_all_platforms(&backend, &profile(None, false))
        .await
        .unwrap();

    let platforms: Vec<_> = report.drafts.iter().map(|d| d.platform.as_str()).collect();
    assert_eq!(platforms, ["LinkedIn", "Instagram"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].platform, "Twitter");
    assert!(report.failures[0].message.contains("upstream exploded"));
}

#[tokio::test]
async fn drafts_follow_channel_order_with_mapped_content_types() {
    let backend = FakeBackend::default();
    let report = generate_for_all_platforms(&backend, &profile(Some("Website, Email"), false))
        .await
        .unwrap();

    assert_eq!(report.drafts.len(), 2);
    assert_eq!(report.drafts[0].platform, "Website");
    assert_eq!(report.drafts[0].content_type, ContentType::Blog);
    assert_eq!(report.drafts[1].content_type, ContentType::Newsletter);
    assert!(report.drafts.iter().all(|d| d.generated_image_url.is_none()));
    assert!(backend.images.lock().unwrap().is_empty());
    assert_eq!(
        report.drafts[0].uploaded_images,
        vec!["/uploads/images/1.png".to_string()]
    );
}

#[tokio::test]
async fn image_failure_keeps_text_draft() {
    let backend = FakeBackend {
        fail_images_for: vec!["Instagram"],
        ..FakeBackend::default()
    };
    let report = generate_for_all_platforms(&backend, &profile(Some("LinkedIn, Instagram"), true))
        .await
        .unwrap();

    assert_eq!(report.drafts.len(), 2);
    assert!(report.drafts[0].generated_image_url.is_some());
    assert!(!report.drafts[0].image_failed);
    assert!(report.drafts[1].generated_image_url.is_none());
    assert!(report.drafts[1].image_failed);
    assert!(report.failures.is_empty());
}

#[tokio::test]
async fn unconfigured_images_keep_every_text_draft() {
    let backend = FakeBackend {
        images_unconfigured: true,
        ..FakeBackend::default()
    };
    let report = generate_for_all_platforms(&backend, &profile(Some("LinkedIn, Twitter"), true))
        .await
        .expect("text drafts survive image configuration errors");

    let platforms: Vec<_> = report.drafts.iter().map(|d| d.platform.as_str()).collect();
    assert_eq!(platforms, ["LinkedIn", "Twitter"]);
    assert!(report.drafts.iter().all(|d| d.image_failed && d.generated_image_url.is_none()));
    assert!(report.failures.is_empty());
    assert_eq!(backend.images.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn configuration_error_ends_the_batch() {
    let backend = FakeBackend {
        unconfigured: true,
        ..FakeBackend::default()
    };
    let err = generate_for_all_platforms(&backend, &profile(None, false))
        .await
        .unwrap_err();
    assert!(err.is_configuration());
}

#[tokio::test]
async fn generation_uses_fixed_sampling_parameters() {
    let backend = FakeBackend::default();
    let p = profile(None, false);
    generate_content(&backend, &p, "LinkedIn", ContentType::Post, Some("Launch"))
        .await
        .unwrap();
    regenerate_content(&backend, &p, "LinkedIn", ContentType::Post, "old", None)
        .await
        .unwrap();

    let calls = backend.completions.lock().unwrap();
    assert!((calls[0].temperature - 0.7).abs() < f32::EPSILON);
    assert_eq!(calls[0].max_tokens, 1000);
    assert!(calls[0].prompt.contains("- Topic: Launch"));
    assert!((calls[1].temperature - 0.8).abs() < f32::EPSILON);
    assert_eq!(calls[1].max_tokens, 1500);
    assert!(calls[1].system.contains("regenerating and improving"));
}
