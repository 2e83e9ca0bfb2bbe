//! Campaign write and list handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use cforge_core::{Campaign, CampaignUpdate, NewCampaign};
use chrono::Utc;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, parse_id, ApiError, ApiResponse, AppState};

const UNKNOWN_CLIENT: &str = "Unknown";

/// GET /api/v1/campaigns
pub(super) async fn list_campaigns(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<Campaign>>>, ApiError> {
    let campaigns = state
        .store
        .list_campaigns()
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(campaigns, req_id.0)))
}

/// POST /api/v1/campaigns
pub(super) async fn create_campaign(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<NewCampaign>,
) -> Result<(StatusCode, Json<ApiResponse<Campaign>>), ApiError> {
    let rid = &req_id.0;

    let client_name = match body.client_id {
        Some(client_id) => state
            .store
            .get_client(client_id)
            .await
            .map_err(|e| map_db_error(rid.clone(), &e))?
            .map_or_else(|| UNKNOWN_CLIENT.to_owned(), |c| c.company_name),
        None => UNKNOWN_CLIENT.to_owned(),
    };

    let campaign = body
        .into_campaign(client_name, Uuid::new_v4(), Utc::now())
        .map_err(|e| ApiError::new(rid, "validation_error", e.to_string()))?;

    state
        .store
        .insert_campaign(&campaign)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(campaign, req_id.0)),
    ))
}

/// PATCH /api/v1/campaigns/:id: sparse update; CTR is recomputed.
pub(super) async fn update_campaign(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Json(body): Json<CampaignUpdate>,
) -> Result<Json<ApiResponse<Campaign>>, ApiError> {
    let rid = &req_id.0;
    let campaign_id = parse_id(rid, "campaign", &id)?;

    let mut campaign = state
        .store
        .get_campaign(campaign_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(rid, "not_found", format!("campaign '{campaign_id}' not found"))
        })?;

    body.apply(&mut campaign, Utc::now())
        .map_err(|e| ApiError::new(rid, "validation_error", e.to_string()))?;

    state
        .store
        .update_campaign(&campaign)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse::new(campaign, req_id.0)))
}

/// DELETE /api/v1/campaigns/:id
pub(super) async fn delete_campaign(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let rid = &req_id.0;
    let campaign_id = parse_id(rid, "campaign", &id)?;

    let deleted = state
        .store
        .delete_campaign(campaign_id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    if !deleted {
        return Err(ApiError::new(
            rid,
            "not_found",
            format!("campaign '{campaign_id}' not found"),
        ));
    }

    Ok(Json(ApiResponse::new(
        serde_json::json!({ "deleted": true }),
        req_id.0,
    )))
}
