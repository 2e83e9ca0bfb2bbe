//! Client onboarding and per-client generation.
//!
//! - `POST /api/v1/clients`                      onboard + fan-out
//! - `GET  /api/v1/clients`                      list clients
//! - `GET  /api/v1/clients/:client_id`           one client
//! - `POST /api/v1/clients/:client_id/content`   one extra draft

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use cforge_core::{ClientProfile, ContentDraft, ContentType, DraftCandidate, OnboardingRequest};
use cforge_generator::{
    content_type_for, generate_content, generate_for_all_platforms, generate_image,
    PlatformFailure,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, map_generation_error, parse_id, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct OnboardResponse {
    pub client: ClientProfile,
    pub drafts: Vec<ContentDraft>,
    pub failures: Vec<PlatformFailure>,
    /// Set when generation could not run at all (e.g. no API key).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GenerateContentRequest {
    pub platform: String,
    #[serde(default)]
    pub content_type: Option<ContentType>,
    #[serde(default)]
    pub topic: Option<String>,
}

/// Resolve a client id to its profile, returning 404 if not found.
pub(super) async fn resolve_client(
    state: &AppState,
    client_id: Uuid,
    request_id: &str,
) -> Result<ClientProfile, ApiError> {
    state
        .store
        .get_client(client_id)
        .await
        .map_err(|e| map_db_error(request_id.to_owned(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                request_id,
                "not_found",
                format!("client '{client_id}' not found"),
            )
        })
}

async fn persist_drafts(
    state: &AppState,
    profile: &ClientProfile,
    candidates: Vec<DraftCandidate>,
    request_id: &str,
) -> Result<Vec<ContentDraft>, ApiError> {
    let now = Utc::now();
    let mut drafts = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let draft = candidate.into_draft(profile, now);
        state
            .store
            .insert_draft(&draft)
            .await
            .map_err(|e| map_db_error(request_id.to_owned(), &e))?;
        drafts.push(draft);
    }
    Ok(drafts)
}

/// POST /api/v1/clients: validate, store, and generate the first drafts.
///
/// The client is stored even when generation cannot run; the response then
/// carries `generation_error` and no drafts.
pub(super) async fn onboard_client(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<OnboardingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<OnboardResponse>>), ApiError> {
    let rid = &req_id.0;

    let profile = body
        .into_profile(Uuid::new_v4(), Utc::now())
        .map_err(|e| ApiError::new(rid, "validation_error", e.to_string()))?;

    state
        .store
        .insert_client(&profile)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    tracing::info!(client_id = %profile.client_id, company = %profile.company_name, "client onboarded");

    let (candidates, failures, generation_error) =
        match generate_for_all_platforms(state.generator.as_ref(), &profile).await {
            Ok(report) => (report.drafts, report.failures, None),
            Err(e) => {
                tracing::warn!(
                    client_id = %profile.client_id,
                    error = %e,
                    "onboarding generation skipped"
                );
                (Vec::new(), Vec::new(), Some(e.to_string()))
            }
        };

    let drafts = persist_drafts(&state, &profile, candidates, rid).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            OnboardResponse {
                client: profile,
                drafts,
                failures,
                generation_error,
            },
            req_id.0,
        )),
    ))
}

/// GET /api/v1/clients
pub(super) async fn list_clients(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<ClientProfile>>>, ApiError> {
    let clients = state
        .store
        .list_clients()
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(clients, req_id.0)))
}

/// GET /api/v1/clients/:client_id
pub(super) async fn get_client(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(client_id): Path<String>,
) -> Result<Json<ApiResponse<ClientProfile>>, ApiError> {
    let rid = &req_id.0;
    let client_id = parse_id(rid, "client", &client_id)?;
    let profile = resolve_client(&state, client_id, rid).await?;
    Ok(Json(ApiResponse::new(profile, req_id.0)))
}

/// POST /api/v1/clients/:client_id/content: generate one draft for a platform.
pub(super) async fn generate_for_client(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(client_id): Path<String>,
    Json(body): Json<GenerateContentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ContentDraft>>), ApiError> {
    let rid = &req_id.0;
    let client_id = parse_id(rid, "client", &client_id)?;
    let profile = resolve_client(&state, client_id, rid).await?;

    let platform = body.platform.trim().to_owned();
    if platform.is_empty() {
        return Err(ApiError::new(rid, "validation_error", "platform must be non-empty"));
    }
    let content_type = body.content_type.unwrap_or_else(|| content_type_for(&platform));
    let generator = state.generator.as_ref();

    let content = generate_content(
        generator,
        &profile,
        &platform,
        content_type,
        body.topic.as_deref(),
    )
    .await
    .map_err(|e| map_generation_error(rid, &e))?;

    let mut candidate = DraftCandidate {
        platform,
        content_type,
        content,
        generated_image_url: None,
        image_failed: false,
        uploaded_images: profile.uploaded_image_urls(),
    };
    if profile.generate_images {
        match generate_image(generator, &profile, &candidate.platform).await {
            Ok(url) => candidate.generated_image_url = Some(url),
            Err(e) => {
                tracing::warn!(platform = %candidate.platform, error = %e, "image generation failed");
                candidate.image_failed = true;
            }
        }
    }

    let mut drafts = persist_drafts(&state, &profile, vec![candidate], rid).await?;
    let draft = drafts
        .pop()
        .ok_or_else(|| ApiError::new(rid, "internal_error", "draft was not stored"))?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(draft, req_id.0))))
}
