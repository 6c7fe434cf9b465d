//! Handlers for the `/walks` resource.
//!
//! Ownership is enforced by the engine on the locked row: clients may only
//! change their own walks, walkers may only start and finish walks assigned
//! to them.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use petfy_core::error::CoreError;
use petfy_core::status::ApprovalStatus;
use petfy_core::types::DbId;
use petfy_core::walk::WalkerSelector;
use petfy_db::models::walk::{WalkDetail, WalkResponse};
use petfy_db::repositories::{WalkRepo, WalkerRepo};
use petfy_db::DbPool;
use serde::Deserialize;
use validator::Validate;

use crate::engine::walks::{self, NewWalk, WalkEdit};
use crate::error::AppResult;
use crate::middleware::rbac::{CurrentWalker, RequireAuth};
use crate::query::{DateRangeParams, WalkStatusParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /walks` and `PUT /walks/{id}`.
///
/// `walker` is a walker's username or `"random"`. On create a missing value
/// means `"random"`; on update it means "keep the current walker".
#[derive(Debug, Deserialize, Validate)]
pub struct WalkRequest {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[validate(length(min = 1, max = 255, message = "Address must be 1 to 255 characters"))]
    pub address: String,
    pub walker: Option<String>,
}

type WalkJson = Json<DataResponse<WalkResponse>>;
type WalkListJson = Json<DataResponse<Vec<WalkResponse>>>;

/// POST /api/v1/walks
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<WalkRequest>,
) -> AppResult<(StatusCode, WalkJson)> {
    input.validate()?;
    let walk = walks::create(
        &state.pool,
        user.user_id,
        NewWalk {
            walk_date: input.date,
            start_time: input.start_time,
            end_time: input.end_time,
            walker: WalkerSelector::parse(input.walker.as_deref()),
            address: input.address,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, detail_json(&state.pool, walk.id).await?))
}

/// PUT /api/v1/walks/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<WalkRequest>,
) -> AppResult<WalkJson> {
    input.validate()?;
    walks::update(
        &state.pool,
        id,
        user.user_id,
        WalkEdit {
            walk_date: input.date,
            start_time: input.start_time,
            end_time: input.end_time,
            walker: WalkerSelector::parse_update(input.walker.as_deref()),
            address: input.address,
        },
    )
    .await?;

    detail_json(&state.pool, id).await
}

/// DELETE /api/v1/walks/{id}
///
/// Cancels the walk; walks are never removed.
pub async fn cancel(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<WalkJson> {
    walks::cancel(&state.pool, id, user.user_id).await?;
    detail_json(&state.pool, id).await
}

/// POST /api/v1/walks/{id}/accept
pub async fn accept(
    State(state): State<AppState>,
    current: CurrentWalker,
    Path(id): Path<DbId>,
) -> AppResult<WalkJson> {
    walks::accept(&state.pool, id, current.walker.id).await?;
    detail_json(&state.pool, id).await
}

/// POST /api/v1/walks/{id}/start
pub async fn start(
    State(state): State<AppState>,
    current: CurrentWalker,
    Path(id): Path<DbId>,
) -> AppResult<WalkJson> {
    walks::start(&state.pool, id, current.walker.id).await?;
    detail_json(&state.pool, id).await
}

/// POST /api/v1/walks/{id}/finish
pub async fn finish(
    State(state): State<AppState>,
    current: CurrentWalker,
    Path(id): Path<DbId>,
) -> AppResult<WalkJson> {
    walks::finish(&state.pool, id, current.walker.id).await?;
    detail_json(&state.pool, id).await
}

/// GET /api/v1/walks/{id}
///
/// Visible to the client, the assigned walker, and approved walkers while
/// the walk sits in the open pool.
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<WalkJson> {
    let detail = find_detail(&state.pool, id).await?;

    if detail.client_id != user.user_id {
        let walker = WalkerRepo::find_by_user(&state.pool, user.user_id).await?;
        let visible = walker
            .is_some_and(|w| walks::is_visible_to_walker(&detail, w.id, w.approval()));
        if !visible {
            return Err(CoreError::Forbidden("You cannot view this walk".into()).into());
        }
    }

    Ok(Json(DataResponse {
        data: WalkResponse::from(detail),
    }))
}

/// GET /api/v1/walks/mine[?status=]
pub async fn list_mine(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<WalkStatusParams>,
) -> AppResult<WalkListJson> {
    let status = params.parse()?;
    let walks = walks::list_for_client(&state.pool, user.user_id, status).await?;
    Ok(list_json(walks))
}

/// GET /api/v1/walks/assigned[?status=]
pub async fn list_assigned(
    State(state): State<AppState>,
    current: CurrentWalker,
    Query(params): Query<WalkStatusParams>,
) -> AppResult<WalkListJson> {
    let status = params.parse()?;
    let walks = walks::list_for_walker(&state.pool, current.walker.id, status).await?;
    Ok(list_json(walks))
}

/// GET /api/v1/walks/pending
///
/// Open offers for an approved walker.
pub async fn list_pending(
    State(state): State<AppState>,
    current: CurrentWalker,
) -> AppResult<WalkListJson> {
    if current.walker.approval() != ApprovalStatus::Approved {
        return Err(CoreError::Forbidden("Walker is not approved".into()).into());
    }
    let walks = walks::open_offers(&state.pool, current.walker.id).await?;
    Ok(list_json(walks))
}

/// GET /api/v1/walks/history[?start=&end=]
///
/// The caller's completed walks, newest first. Both bounds are inclusive.
pub async fn history(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<DateRangeParams>,
) -> AppResult<WalkListJson> {
    params.validate()?;
    let walks = walks::history(&state.pool, user.user_id, params.start, params.end).await?;
    Ok(list_json(walks))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_detail(pool: &DbPool, id: DbId) -> AppResult<WalkDetail> {
    Ok(WalkRepo::find_detail(pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Walk", id })?)
}

async fn detail_json(pool: &DbPool, id: DbId) -> AppResult<WalkJson> {
    let detail = find_detail(pool, id).await?;
    Ok(Json(DataResponse {
        data: WalkResponse::from(detail),
    }))
}

fn list_json(walks: Vec<WalkDetail>) -> WalkListJson {
    Json(DataResponse {
        data: walks.into_iter().map(WalkResponse::from).collect(),
    })
}
