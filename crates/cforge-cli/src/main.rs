mod generate;

use std::path::PathBuf;

use cforge_core::ContentType;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "cforge-cli")]
#[command(about = "CampaignForge command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations (requires `DATABASE_URL`)
    Migrate,
    /// Print the generation prompt for one platform without calling the API
    Prompt {
        /// YAML file in the onboarding request shape
        #[arg(long)]
        profile: PathBuf,
        /// Target platform (e.g., `LinkedIn`)
        #[arg(long)]
        platform: String,
        /// Content type; defaults to the platform's usual type
        #[arg(long)]
        content_type: Option<ContentType>,
        /// Optional topic to steer the draft
        #[arg(long)]
        topic: Option<String>,
    },
    /// Generate drafts for every target platform and print the report as JSON
    Generate {
        /// YAML file in the onboarding request shape
        #[arg(long)]
        profile: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("cforge-cli: run with --help to list commands");
        return Ok(());
    };

    let config = cforge_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Migrate => generate::run_migrate(&config).await,
        Commands::Prompt {
            profile,
            platform,
            content_type,
            topic,
        } => generate::run_prompt(&profile, &platform, content_type, topic.as_deref()),
        Commands::Generate { profile } => generate::run_generate(&config, &profile).await,
    }
}
