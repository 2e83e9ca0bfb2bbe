//! Database operations for the `clients` table.

use chrono::{DateTime, Utc};
use cforge_core::{ClientProfile, MediaRef};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `clients` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClientRow {
    pub id: i64,
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
    pub primary_channels: Option<String>,
    pub texts: Option<String>,
    pub generate_images: bool,
    pub images: Json<Vec<MediaRef>>,
    pub videos: Json<Vec<MediaRef>>,
    pub onboarded_at: DateTime<Utc>,
}

impl From<ClientRow> for ClientProfile {
    fn from(row: ClientRow) -> Self {
        Self {
            client_id: row.client_id,
            company_name: row.company_name,
            industry: row.industry,
            brand_tone: row.brand_tone,
            target_audience: row.target_audience,
            marketing_goals: row.marketing_goals,
            content_preferences: row.content_preferences,
            past_examples: row.past_examples,
            website_url: row.website_url,
            social_media_handles: row.social_media_handles,
            budget_range: row.budget_range,
            primary_channels: row.primary_channels,
            texts: row.texts,
            generate_images: row.generate_images,
            images: row.images.0,
            videos: row.videos.0,
            onboarded_at: row.onboarded_at,
        }
    }
}

const CLIENT_COLUMNS: &str = "id, client_id, company_name, industry, brand_tone, target_audience, \
     marketing_goals, content_preferences, past_examples, website_url, social_media_handles, \
     budget_range, primary_channels, texts, generate_images, images, videos, onboarded_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Inserts a newly onboarded client.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (including a duplicate `client_id`).
pub async fn insert_client(pool: &PgPool, profile: &ClientProfile) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO clients \
             (client_id, company_name, industry, brand_tone, target_audience, \
              marketing_goals, content_preferences, past_examples, website_url, \
              social_media_handles, budget_range, primary_channels, texts, \
              generate_images, images, videos, onboarded_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)",
    )
    .bind(profile.client_id)
    .bind(&profile.company_name)
    .bind(&profile.industry)
    .bind(&profile.brand_tone)
    .bind(&profile.target_audience)
    .bind(profile.marketing_goals.as_deref())
    .bind(profile.content_preferences.as_deref())
    .bind(profile.past_examples.as_deref())
    .bind(profile.website_url.as_deref())
    .bind(profile.social_media_handles.as_deref())
    .bind(profile.budget_range.as_deref())
    .bind(profile.primary_channels.as_deref())
    .bind(profile.texts.as_deref())
    .bind(profile.generate_images)
    .bind(Json(&profile.images))
    .bind(Json(&profile.videos))
    .bind(profile.onboarded_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Returns every client, oldest onboarding first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_clients(pool: &PgPool) -> Result<Vec<ClientProfile>, DbError> {
    let rows = sqlx::query_as::<_, ClientRow>(&format!(
        "SELECT {CLIENT_COLUMNS} FROM clients ORDER BY onboarded_at, id"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(ClientProfile::from).collect())
}

/// Returns one client by its public id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_client(pool: &PgPool, client_id: Uuid) -> Result<Option<ClientProfile>, DbError> {
    let row = sqlx::query_as::<_, ClientRow>(&format!(
        "SELECT {CLIENT_COLUMNS} FROM clients WHERE client_id = $1"
    ))
    .bind(client_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(ClientProfile::from))
}

/// Total number of onboarded clients.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_clients(pool: &PgPool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clients")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
