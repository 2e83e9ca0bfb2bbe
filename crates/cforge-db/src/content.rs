//! Database operations for the `content_drafts` table.

use chrono::{DateTime, Utc};
use cforge_core::{ContentDraft, ContentStatus, ContentType, PublishResult};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `content_drafts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DraftRow {
    pub id: i64,
    pub public_id: Uuid,
    pub client_id: Uuid,
    pub client_name: String,
    pub platform: String,
    pub content_type: String,
    pub content: String,
    pub status: String,
    pub generated_image_url: Option<String>,
    pub image_failed: bool,
    pub uploaded_images: Json<Vec<String>>,
    pub regeneration_count: i32,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub regenerated_at: Option<DateTime<Utc>>,
    pub publish_result: Option<Json<PublishResult>>,
}

impl TryFrom<DraftRow> for ContentDraft {
    type Error = DbError;

    fn try_from(row: DraftRow) -> Result<Self, Self::Error> {
        let content_type =
            row.content_type
                .parse::<ContentType>()
                .map_err(|e| DbError::InvalidValue {
                    column: "content_type",
                    reason: e.to_string(),
                })?;
        let status = row
            .status
            .parse::<ContentStatus>()
            .map_err(|e| DbError::InvalidValue {
                column: "status",
                reason: e.to_string(),
            })?;
        let regeneration_count =
            u32::try_from(row.regeneration_count).map_err(|e| DbError::InvalidValue {
                column: "regeneration_count",
                reason: e.to_string(),
            })?;

        Ok(Self {
            id: row.public_id,
            client_id: row.client_id,
            client_name: row.client_name,
            platform: row.platform,
            content_type,
            content: row.content,
            status,
            generated_image_url: row.generated_image_url,
            image_failed: row.image_failed,
            uploaded_images: row.uploaded_images.0,
            regeneration_count,
            created_at: row.created_at,
            edited_at: row.edited_at,
            approved_at: row.approved_at,
            regenerated_at: row.regenerated_at,
            publish_result: row.publish_result.map(|j| j.0),
        })
    }
}

const DRAFT_COLUMNS: &str = "id, public_id, client_id, client_name, platform, content_type, \
     content, status, generated_image_url, image_failed, uploaded_images, regeneration_count, \
     created_at, edited_at, approved_at, regenerated_at, publish_result";

fn regeneration_count_i32(draft: &ContentDraft) -> i32 {
    i32::try_from(draft.regeneration_count).unwrap_or(i32::MAX)
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Inserts a new draft.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails, e.g. when the owning
/// client does not exist.
pub async fn insert_draft(pool: &PgPool, draft: &ContentDraft) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO content_drafts \
             (public_id, client_id, client_name, platform, content_type, content, status, \
              generated_image_url, image_failed, uploaded_images, regeneration_count, \
              created_at, edited_at, approved_at, regenerated_at, publish_result) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
    )
    .bind(draft.id)
    .bind(draft.client_id)
    .bind(&draft.client_name)
    .bind(&draft.platform)
    .bind(draft.content_type.as_str())
    .bind(&draft.content)
    .bind(draft.status.as_str())
    .bind(draft.generated_image_url.as_deref())
    .bind(draft.image_failed)
    .bind(Json(&draft.uploaded_images))
    .bind(regeneration_count_i32(draft))
    .bind(draft.created_at)
    .bind(draft.edited_at)
    .bind(draft.approved_at)
    .bind(draft.regenerated_at)
    .bind(draft.publish_result.as_ref().map(Json))
    .execute(pool)
    .await?;
    Ok(())
}

/// Returns one draft by public id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidValue`]
/// if the stored row holds an unknown enum value.
pub async fn get_draft(pool: &PgPool, id: Uuid) -> Result<Option<ContentDraft>, DbError> {
    let row = sqlx::query_as::<_, DraftRow>(&format!(
        "SELECT {DRAFT_COLUMNS} FROM content_drafts WHERE public_id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(ContentDraft::try_from).transpose()
}

/// Returns drafts with the given status, oldest first, optionally scoped to
/// one client.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidValue`]
/// if a stored row holds an unknown enum value.
pub async fn list_drafts(
    pool: &PgPool,
    status: ContentStatus,
    client_id: Option<Uuid>,
) -> Result<Vec<ContentDraft>, DbError> {
    let rows = sqlx::query_as::<_, DraftRow>(&format!(
        "SELECT {DRAFT_COLUMNS} FROM content_drafts \
         WHERE status = $1 AND ($2::uuid IS NULL OR client_id = $2) \
         ORDER BY created_at, id"
    ))
    .bind(status.as_str())
    .bind(client_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(ContentDraft::try_from).collect()
}

/// Overwrites the mutable columns of a stored draft.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no draft has this id, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_draft(pool: &PgPool, draft: &ContentDraft) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE content_drafts \
         SET platform = $2, content_type = $3, content = $4, status = $5, \
             generated_image_url = $6, image_failed = $7, uploaded_images = $8, \
             regeneration_count = $9, edited_at = $10, approved_at = $11, \
             regenerated_at = $12, publish_result = $13 \
         WHERE public_id = $1",
    )
    .bind(draft.id)
    .bind(&draft.platform)
    .bind(draft.content_type.as_str())
    .bind(&draft.content)
    .bind(draft.status.as_str())
    .bind(draft.generated_image_url.as_deref())
    .bind(draft.image_failed)
    .bind(Json(&draft.uploaded_images))
    .bind(regeneration_count_i32(draft))
    .bind(draft.edited_at)
    .bind(draft.approved_at)
    .bind(draft.regenerated_at)
    .bind(draft.publish_result.as_ref().map(Json))
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Deletes a draft. Returns `true` if a row was removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_draft(pool: &PgPool, id: Uuid) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM content_drafts WHERE public_id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Number of drafts currently in `status`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_drafts_with_status(
    pool: &PgPool,
    status: ContentStatus,
) -> Result<i64, DbError> {
    let count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM content_drafts WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(pool)
            .await?;
    Ok(count)
}
