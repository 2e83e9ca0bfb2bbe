use axum::{extract::State, Extension, Json};
use cforge_core::DashboardStats;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState};

/// GET /api/v1/dashboard/stats
pub(super) async fn stats(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<DashboardStats>>, ApiError> {
    let stats = state
        .store
        .dashboard_stats()
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(stats, req_id.0)))
}
