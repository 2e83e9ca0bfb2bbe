//! Prompt building, the generation client, and the per-platform fan-out.

pub mod client;
pub mod error;
pub mod fanout;
pub mod prompts;
mod retry;

pub use client::{
    CompletionRequest, GenerationBackend, ImageRequest, OpenAiClient, OpenAiConfig,
};
pub use error::GenerationError;
pub use fanout::{
    content_type_for, generate_content, generate_for_all_platforms, generate_image,
    regenerate_content, resolve_platforms, FanOutReport, PlatformFailure, DEFAULT_PLATFORMS,
};
