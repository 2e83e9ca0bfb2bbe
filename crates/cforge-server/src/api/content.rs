//! Draft review handlers.
//!
//! - `GET    /api/v1/content/pending?client_id=`  pending drafts
//! - `POST   /api/v1/content/:id/approve`         approve + publish
//! - `PUT    /api/v1/content/:id`                 edit body
//! - `DELETE /api/v1/content/:id`                 delete
//! - `POST   /api/v1/content/:id/regenerate`      rewrite with optional focus

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use cforge_core::{ContentDraft, ContentStatus, PublishResult};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::clients::resolve_client;
use super::{map_db_error, map_generation_error, parse_id, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct PendingQuery {
    pub client_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct EditContentRequest {
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RegenerateRequest {
    #[serde(default)]
    pub improvement_focus: Option<String>,
}

/// `None` for an absent, blank, or `all` filter.
fn parse_client_filter(request_id: &str, raw: Option<&str>) -> Result<Option<Uuid>, ApiError> {
    match raw.map(str::trim) {
        None | Some("" | "all") => Ok(None),
        Some(value) => Uuid::parse_str(value).map(Some).map_err(|_| {
            ApiError::new(
                request_id,
                "validation_error",
                format!("client_id must be a UUID or 'all', got '{value}'"),
            )
        }),
    }
}

async fn resolve_draft(state: &AppState, raw_id: &str, request_id: &str) -> Result<ContentDraft, ApiError> {
    let id = parse_id(request_id, "content", raw_id)?;
    state
        .store
        .get_draft(id)
        .await
        .map_err(|e| map_db_error(request_id.to_owned(), &e))?
        .ok_or_else(|| ApiError::new(request_id, "not_found", format!("content '{id}' not found")))
}

async fn save_draft(state: &AppState, draft: &ContentDraft, request_id: &str) -> Result<(), ApiError> {
    state
        .store
        .update_draft(draft)
        .await
        .map_err(|e| map_db_error(request_id.to_owned(), &e))
}

/// GET /api/v1/content/pending
pub(super) async fn list_pending(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<PendingQuery>,
) -> Result<Json<ApiResponse<Vec<ContentDraft>>>, ApiError> {
    let rid = &req_id.0;
    let client_id = parse_client_filter(rid, query.client_id.as_deref())?;

    let drafts = state
        .store
        .list_drafts(ContentStatus::Pending, client_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    Ok(Json(ApiResponse::new(drafts, req_id.0)))
}

/// POST /api/v1/content/:id/approve: approve, forward to the webhook, and
/// store the outcome on the draft.
///
/// A webhook failure does not undo the approval; it is reported in
/// `publish_result`.
pub(super) async fn approve_content(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ContentDraft>>, ApiError> {
    let rid = &req_id.0;
    let mut draft = resolve_draft(&state, &id, rid).await?;

    let profile = state
        .store
        .get_client(draft.client_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    draft.approve(Utc::now());
    let result = match profile {
        Some(profile) => {
            state
                .publisher
                .publish(&draft.platform, &draft.content, &profile)
                .await
        }
        None => {
            tracing::warn!(draft_id = %draft.id, client_id = %draft.client_id, "approved draft has no stored client");
            PublishResult::failed(format!(
                "Client {} not found; content was not published",
                draft.client_id
            ))
        }
    };
    draft.publish_result = Some(result);

    save_draft(&state, &draft, rid).await?;
    Ok(Json(ApiResponse::new(draft, req_id.0)))
}

/// PUT /api/v1/content/:id: replace the draft body. Status is unchanged.
pub(super) async fn edit_content(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Json(body): Json<EditContentRequest>,
) -> Result<Json<ApiResponse<ContentDraft>>, ApiError> {
    let rid = &req_id.0;
    if body.content.trim().is_empty() {
        return Err(ApiError::new(rid, "validation_error", "content must be non-empty"));
    }

    let mut draft = resolve_draft(&state, &id, rid).await?;
    draft.apply_edit(body.content, Utc::now());
    save_draft(&state, &draft, rid).await?;
    Ok(Json(ApiResponse::new(draft, req_id.0)))
}

/// DELETE /api/v1/content/:id
pub(super) async fn delete_content(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let rid = &req_id.0;
    let draft_id = parse_id(rid, "content", &id)?;

    let deleted = state
        .store
        .delete_draft(draft_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    if !deleted {
        return Err(ApiError::new(rid, "not_found", format!("content '{draft_id}' not found")));
    }

    Ok(Json(ApiResponse::new(
        serde_json::json!({ "deleted": true }),
        req_id.0,
    )))
}

/// POST /api/v1/content/:id/regenerate: rewrite the body in place, keeping
/// the draft's id, platform, and content type.
pub(super) async fn regenerate_content(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Json(body): Json<RegenerateRequest>,
) -> Result<Json<ApiResponse<ContentDraft>>, ApiError> {
    let rid = &req_id.0;
    let mut draft = resolve_draft(&state, &id, rid).await?;
    let profile = resolve_client(&state, draft.client_id, rid).await?;

    let content = cforge_generator::regenerate_content(
        state.generator.as_ref(),
        &profile,
        &draft.platform,
        draft.content_type,
        &draft.content,
        body.improvement_focus.as_deref(),
    )
    .await
    .map_err(|e| map_generation_error(rid, &e))?;

    draft.apply_regeneration(content, Utc::now());
    save_draft(&state, &draft, rid).await?;
    tracing::info!(
        draft_id = %draft.id,
        regeneration_count = draft.regeneration_count,
        "draft regenerated"
    );
    Ok(Json(ApiResponse::new(draft, req_id.0)))
}
