//! Admin-only handlers for deciding walker applications.

use axum::extract::{Path, Query, State};
use axum::Json;
use petfy_core::types::DbId;
use petfy_db::models::walker::{Walker, WalkerSummary};
use petfy_db::repositories::WalkerRepo;

use crate::engine::walkers;
use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::query::ApprovalStatusParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/walkers[?status=pending|approved|rejected]
pub async fn list_walkers(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<ApprovalStatusParams>,
) -> AppResult<Json<DataResponse<Vec<WalkerSummary>>>> {
    let status = params.parse()?;
    let walkers = WalkerRepo::list_by_approval(&state.pool, status).await?;
    Ok(Json(DataResponse { data: walkers }))
}

/// POST /api/v1/admin/walkers/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Walker>>> {
    let walker = walkers::approve(&state.pool, id).await?;
    tracing::info!(walker_id = id, admin_id = admin.user_id, "Admin approved walker");
    Ok(Json(DataResponse { data: walker }))
}

/// POST /api/v1/admin/walkers/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Walker>>> {
    let walker = walkers::reject(&state.pool, id).await?;
    tracing::info!(walker_id = id, admin_id = admin.user_id, "Admin rejected walker");
    Ok(Json(DataResponse { data: walker }))
}
