//! Shared records and configuration for the `CampaignForge` workspace.

pub mod app_config;
pub mod campaigns;
pub mod clients;
pub mod config;
pub mod content;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use campaigns::{Campaign, CampaignStatus, CampaignUpdate, DashboardStats, NewCampaign};
pub use clients::{load_profile, ClientProfile, MediaRef, OnboardingRequest};
pub use config::{load_app_config, load_app_config_from_env};
pub use content::{
    ContentDraft, ContentStatus, ContentType, DraftCandidate, PublishResult, UnknownVariant,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read profile file {path}: {source}")]
    ProfileFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse profile file: {0}")]
    ProfileFileParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}
