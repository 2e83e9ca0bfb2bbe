//! Command handlers for the CLI.
//!
//! Output meant for piping (prompts, JSON reports) goes to stdout; logs go to
//! stderr.

use std::path::Path;

use cforge_core::{AppConfig, ContentType};
use cforge_generator::{
    content_type_for, generate_for_all_platforms, prompts::build_generation_prompt, OpenAiClient,
    OpenAiConfig,
};

pub(crate) async fn run_migrate(config: &AppConfig) -> anyhow::Result<()> {
    let url = config
        .database_url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set to run migrations"))?;

    let pool = cforge_db::connect_pool(url, cforge_db::PoolConfig::from_app_config(config)).await?;
    cforge_db::ping(&pool).await?;
    let applied = cforge_db::run_migrations(&pool).await?;
    println!("applied {applied} migration(s)");
    Ok(())
}

/// Render the prompt that onboarding would send for `platform`.
pub(crate) fn run_prompt(
    profile_path: &Path,
    platform: &str,
    content_type: Option<ContentType>,
    topic: Option<&str>,
) -> anyhow::Result<()> {
    let profile = cforge_core::load_profile(profile_path)?;
    let content_type = content_type.unwrap_or_else(|| content_type_for(platform));
    println!(
        "{}",
        build_generation_prompt(&profile, platform, content_type, topic)
    );
    Ok(())
}

/// Run the fan-out for a profile file. Nothing is persisted.
pub(crate) async fn run_generate(config: &AppConfig, profile_path: &Path) -> anyhow::Result<()> {
    let profile = cforge_core::load_profile(profile_path)?;
    let client = OpenAiClient::new(OpenAiConfig::from_app_config(config))?;

    let report = generate_for_all_platforms(&client, &profile).await?;
    if !report.failures.is_empty() {
        tracing::warn!(
            failed = report.failures.len(),
            generated = report.drafts.len(),
            "some platforms failed"
        );
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
