//! Handlers for the `/ratings` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use petfy_core::types::DbId;
use petfy_db::models::rating::Rating;
use petfy_db::repositories::RatingRepo;
use serde::Deserialize;
use validator::Validate;

use crate::engine::ratings::{self, Receipt, Submission};
use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /ratings`.
///
/// The score range is checked by the rating rules so an out-of-range score
/// is rejected the same way whichever surface submits it.
#[derive(Debug, Deserialize, Validate)]
pub struct RatingRequest {
    pub score: i32,
    #[serde(alias = "type")]
    pub kind: Option<String>,
    pub walk_id: Option<DbId>,
    #[validate(length(max = 1000, message = "Comment must be at most 1000 characters"))]
    pub comment: Option<String>,
}

/// POST /api/v1/ratings
pub async fn submit(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<RatingRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Receipt>>)> {
    input.validate()?;
    let receipt = ratings::submit(
        &state.pool,
        user.user_id,
        Submission {
            score: input.score,
            kind: input.kind,
            walk_id: input.walk_id,
            comment: input.comment,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: receipt })))
}

/// GET /api/v1/ratings/mine
pub async fn list_mine(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<Rating>>>> {
    let ratings = RatingRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: ratings }))
}
