//! Database operations for the `campaigns` table.

use chrono::{DateTime, NaiveDate, Utc};
use cforge_core::{Campaign, CampaignStatus};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `campaigns` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CampaignRow {
    pub id: i64,
    pub public_id: Uuid,
    pub name: String,
    pub client_id: Option<Uuid>,
    pub client_name: String,
    pub platform: Option<String>,
    pub budget: Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub target_audience: Option<String>,
    pub ad_type: String,
    pub status: String,
    pub impressions: i64,
    pub clicks: i64,
    pub ctr: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<CampaignRow> for Campaign {
    type Error = DbError;

    fn try_from(row: CampaignRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<CampaignStatus>()
            .map_err(|e| DbError::InvalidValue {
                column: "status",
                reason: e.to_string(),
            })?;

        Ok(Self {
            id: row.public_id,
            name: row.name,
            client_id: row.client_id,
            client_name: row.client_name,
            platform: row.platform,
            budget: row.budget,
            start_date: row.start_date,
            end_date: row.end_date,
            target_audience: row.target_audience,
            ad_type: row.ad_type,
            status,
            impressions: row.impressions,
            clicks: row.clicks,
            ctr: row.ctr,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const CAMPAIGN_COLUMNS: &str = "id, public_id, name, client_id, client_name, platform, budget, \
     start_date, end_date, target_audience, ad_type, status, impressions, clicks, ctr, \
     created_at, updated_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Inserts a new campaign.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_campaign(pool: &PgPool, campaign: &Campaign) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO campaigns \
             (public_id, name, client_id, client_name, platform, budget, start_date, end_date, \
              target_audience, ad_type, status, impressions, clicks, ctr, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
    )
    .bind(campaign.id)
    .bind(&campaign.name)
    .bind(campaign.client_id)
    .bind(&campaign.client_name)
    .bind(campaign.platform.as_deref())
    .bind(campaign.budget)
    .bind(campaign.start_date)
    .bind(campaign.end_date)
    .bind(campaign.target_audience.as_deref())
    .bind(&campaign.ad_type)
    .bind(campaign.status.as_str())
    .bind(campaign.impressions)
    .bind(campaign.clicks)
    .bind(campaign.ctr)
    .bind(campaign.created_at)
    .bind(campaign.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Returns all campaigns, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidValue`]
/// if a stored row holds an unknown status.
pub async fn list_campaigns(pool: &PgPool) -> Result<Vec<Campaign>, DbError> {
    let rows = sqlx::query_as::<_, CampaignRow>(&format!(
        "SELECT {CAMPAIGN_COLUMNS} FROM campaigns ORDER BY created_at, id"
    ))
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Campaign::try_from).collect()
}

/// Returns one campaign by public id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidValue`]
/// if the stored row holds an unknown status.
pub async fn get_campaign(pool: &PgPool, id: Uuid) -> Result<Option<Campaign>, DbError> {
    let row = sqlx::query_as::<_, CampaignRow>(&format!(
        "SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE public_id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(Campaign::try_from).transpose()
}

/// Overwrites the mutable columns of a stored campaign.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no campaign has this id, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_campaign(pool: &PgPool, campaign: &Campaign) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE campaigns \
         SET name = $2, platform = $3, budget = $4, start_date = $5, end_date = $6, \
             target_audience = $7, ad_type = $8, status = $9, impressions = $10, \
             clicks = $11, ctr = $12, updated_at = $13 \
         WHERE public_id = $1",
    )
    .bind(campaign.id)
    .bind(&campaign.name)
    .bind(campaign.platform.as_deref())
    .bind(campaign.budget)
    .bind(campaign.start_date)
    .bind(campaign.end_date)
    .bind(campaign.target_audience.as_deref())
    .bind(&campaign.ad_type)
    .bind(campaign.status.as_str())
    .bind(campaign.impressions)
    .bind(campaign.clicks)
    .bind(campaign.ctr)
    .bind(campaign.updated_at)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Deletes a campaign. Returns `true` if a row was removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_campaign(pool: &PgPool, id: Uuid) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM campaigns WHERE public_id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Number of campaigns in the `active` state.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_active_campaigns(pool: &PgPool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM campaigns WHERE status = $1")
        .bind(CampaignStatus::Active.as_str())
        .fetch_one(pool)
        .await?;
    Ok(count)
}
