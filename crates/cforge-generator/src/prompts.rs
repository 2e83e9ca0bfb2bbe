//! Prompt text for generation, regeneration, and image requests.
//!
//! Everything here is pure: the same profile and arguments always produce the
//! same string. Platform names are matched exactly (`"LinkedIn"`, not
//! `"linkedin"`); anything unrecognised falls back to generic wording.

use std::fmt::Write as _;

use cforge_core::{ClientProfile, ContentType};

/// Static per-platform style/length/format descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformGuideline {
    pub max_length: &'static str,
    pub style: &'static str,
    pub format: &'static str,
}

const FALLBACK_GUIDELINE: PlatformGuideline = PlatformGuideline {
    max_length: "appropriate length",
    style: "engaging and professional",
    format: "well-structured",
};

const FALLBACK_OPENING: &str = "Create marketing content";
const FALLBACK_IMAGE_STYLE: &str = "professional and engaging";

const GENERIC_IMPROVEMENT: &str = "Improve the content while maintaining brand consistency - \
     make it more engaging, compelling, and aligned with the brand voice.";

/// Platforms with dedicated prompt wording.
pub const KNOWN_PLATFORMS: [&str; 8] = [
    "LinkedIn",
    "Twitter",
    "Instagram",
    "Facebook",
    "Reddit",
    "Email",
    "Website",
    "YouTube",
];

#[must_use]
pub fn platform_opening(platform: &str) -> &'static str {
    match platform {
        "LinkedIn" => "Create a professional LinkedIn post",
        "Twitter" => "Create an engaging Twitter post (280 characters max)",
        "Instagram" => "Create an Instagram post with engaging copy",
        "Facebook" => "Create a Facebook post that encourages engagement",
        "Reddit" => {
            "Create a Reddit post that follows community guidelines and encourages discussion"
        }
        "Email" => "Create an email newsletter content",
        "Website" => "Create a blog post or website content",
        "YouTube" => "Create a video script for YouTube",
        _ => FALLBACK_OPENING,
    }
}

/// Descriptor used after "as a" in the generation prompt.
///
/// Unknown names never reach here; they are rejected when `ContentType` is
/// parsed.
#[must_use]
pub fn content_type_descriptor(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Post => "social media post",
        ContentType::Blog => "blog post (500-800 words)",
        ContentType::Newsletter => "email newsletter content",
        ContentType::AdCopy => "advertising copy",
        ContentType::VideoScript => "video script with scene descriptions",
    }
}

#[must_use]
pub fn platform_guideline(platform: &str) -> PlatformGuideline {
    match platform {
        "LinkedIn" => PlatformGuideline {
            max_length: "1300 characters",
            style: "professional, thought-provoking, industry insights",
            format: "paragraphs with clear structure",
        },
        "Twitter" => PlatformGuideline {
            max_length: "280 characters",
            style: "concise, engaging, hashtag-friendly",
            format: "short sentences, can include hashtags",
        },
        "Instagram" => PlatformGuideline {
            max_length: "2200 characters",
            style: "visual, engaging, authentic, emoji-friendly",
            format: "short paragraphs, can include emojis and line breaks",
        },
        "Facebook" => PlatformGuideline {
            max_length: "5000 characters",
            style: "conversational, community-focused, engaging",
            format: "paragraphs with questions to encourage engagement",
        },
        "Reddit" => PlatformGuideline {
            max_length: "40000 characters",
            style: "informative, authentic, discussion-provoking, follows Reddit etiquette",
            format: "well-structured post with engaging body text, clear formatting, \
                     and questions to spark conversation",
        },
        "Email" => PlatformGuideline {
            max_length: "2000 characters",
            style: "clear, actionable, value-driven",
            format: "structured with clear sections and CTA",
        },
        "Website" => PlatformGuideline {
            max_length: "2000 words",
            style: "informative, SEO-friendly, comprehensive",
            format: "structured with headings and subheadings",
        },
        "YouTube" => PlatformGuideline {
            max_length: "5000 words",
            style: "conversational, engaging, storytelling",
            format: "script format with scene descriptions and dialogue",
        },
        _ => FALLBACK_GUIDELINE,
    }
}

#[must_use]
pub fn image_style(platform: &str) -> &'static str {
    match platform {
        "LinkedIn" => "professional, corporate, business-focused",
        "Twitter" => "vibrant, engaging, social media optimized",
        "Instagram" => "aesthetic, visually appealing, modern design",
        "Facebook" => "friendly, community-oriented, engaging",
        "Reddit" => "authentic, community-focused, discussion-worthy",
        "Email" => "clean, professional, email-friendly format",
        "Website" => "professional, brand-aligned, web-optimized",
        "YouTube" => "eye-catching thumbnail style, video-friendly",
        _ => FALLBACK_IMAGE_STYLE,
    }
}

/// Prompt for a first draft on `platform`.
///
/// Past examples and topic lines are only emitted when present.
#[must_use]
pub fn build_generation_prompt(
    profile: &ClientProfile,
    platform: &str,
    content_type: ContentType,
    topic: Option<&str>,
) -> String {
    let goals = profile.marketing_goals_or_default();
    let preferences = profile.content_preferences_or_default();

    let mut prompt = format!(
        "You are an expert marketing content writer. {opening} as a {descriptor}.\n\
         \n\
         Client Information:\n\
         - Company: {company}\n\
         - Industry: {industry}\n\
         - Brand Tone: {tone}\n\
         - Target Audience: {audience}\n\
         - Marketing Goals: {goals}\n\
         - Content Preferences: {preferences}\n",
        opening = platform_opening(platform),
        descriptor = content_type_descriptor(content_type),
        company = profile.company_name,
        industry = profile.industry,
        tone = profile.brand_tone,
        audience = profile.target_audience,
    );
    if let Some(examples) = profile.past_examples.as_deref() {
        let _ = writeln!(prompt, "- Past Examples: {examples}");
    }
    if let Some(topic) = topic.map(str::trim).filter(|t| !t.is_empty()) {
        let _ = writeln!(prompt, "- Topic: {topic}");
    }
    let _ = write!(
        prompt,
        "\n\
         Requirements:\n\
         - Match the brand tone: {tone}\n\
         - Appeal to target audience: {audience}\n\
         - Align with marketing goals: {goals}\n\
         - Follow content preferences: {preferences}\n\
         - Be engaging and professional\n\
         - Include a clear call-to-action if appropriate\n\
         \n\
         Generate the content now:",
        tone = profile.brand_tone,
        audience = profile.target_audience,
    );
    prompt
}

/// Prompt asking for an improved rewrite of `existing`.
///
/// `existing` is embedded verbatim between `---` fences. A blank `focus`
/// is treated as absent.
#[must_use]
pub fn build_regeneration_prompt(
    profile: &ClientProfile,
    platform: &str,
    content_type: ContentType,
    existing: &str,
    focus: Option<&str>,
) -> String {
    let guideline = platform_guideline(platform);
    let goals = profile.marketing_goals_or_default();
    let preferences = profile.content_preferences_or_default();
    let tone = &profile.brand_tone;
    let audience = &profile.target_audience;
    let improvement = match focus.map(str::trim).filter(|f| !f.is_empty()) {
        Some(focus) => format!("IMPORTANT: Focus on improving: {focus}"),
        None => format!("IMPORTANT: {GENERIC_IMPROVEMENT}"),
    };

    format!(
        "You are an expert marketing content writer. Your task is to REGENERATE and IMPROVE \
         the following content for {platform}.\n\
         \n\
         CURRENT CONTENT TO REGENERATE:\n\
         ---\n\
         {existing}\n\
         ---\n\
         \n\
         CLIENT BRAND CONTEXT:\n\
         - Company: {company}\n\
         - Industry: {industry}\n\
         - Brand Tone: {tone}\n\
         - Target Audience: {audience}\n\
         - Marketing Goals: {goals}\n\
         - Content Preferences: {preferences}\n\
         \n\
         PLATFORM REQUIREMENTS:\n\
         - Platform: {platform}\n\
         - Content Type: {content_type}\n\
         - Maximum Length: {max_length}\n\
         - Style: {style}\n\
         - Format: {format}\n\
         \n\
         {improvement}\n\
         \n\
         REGENERATION GUIDELINES:\n\
         1. Maintain the core message and intent of the original content\n\
         2. Keep the brand tone consistent: {tone}\n\
         3. Ensure it appeals to: {audience}\n\
         4. Align with marketing goals: {goals}\n\
         5. Follow content preferences: {preferences}\n\
         6. Improve engagement, clarity, and impact\n\
         7. Make it more compelling while staying authentic to the brand\n\
         8. Ensure it fits the {platform} platform format and best practices\n\
         9. Include a strong call-to-action if appropriate for the platform\n\
         10. Optimize for the target audience's interests and pain points\n\
         \n\
         Generate the REGENERATED and IMPROVED content now. Make it better than the original \
         while maintaining brand consistency:",
        company = profile.company_name,
        industry = profile.industry,
        max_length = guideline.max_length,
        style = guideline.style,
        format = guideline.format,
    )
}

/// Prompt for a single marketing image for `platform`.
#[must_use]
pub fn build_image_prompt(profile: &ClientProfile, platform: &str) -> String {
    let company = &profile.company_name;
    let audience = &profile.target_audience;
    format!(
        "Create a high-quality marketing image for {company}, a {industry} company.\n\
         \n\
         Brand Details:\n\
         - Brand Tone: {tone}\n\
         - Target Audience: {audience}\n\
         - Marketing Goal: {goals}\n\
         - Platform: {platform}\n\
         \n\
         Image Requirements:\n\
         - Style: {style}\n\
         - Professional quality, suitable for {platform} marketing\n\
         - Visually appealing and brand-appropriate\n\
         - No text overlays (text will be added separately)\n\
         - High resolution, modern design aesthetic\n\
         \n\
         Create an image that represents {company}'s brand identity and appeals to {audience}.",
        industry = profile.industry,
        tone = profile.brand_tone,
        goals = profile.marketing_goals_or_default(),
        style = image_style(platform),
    )
}

#[cfg(test)]
#[path = "prompts_test.rs"]
mod tests;
