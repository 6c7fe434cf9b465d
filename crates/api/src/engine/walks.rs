//! Walk lifecycle engine.
//!
//! Every transition locks the walk row with `SELECT ... FOR UPDATE` before
//! checking its status, so concurrent transitions on one walk run one after
//! the other. For `accept` this means at most one walker wins; the others
//! wait on the lock and then fail with `NotPending`.

use chrono::{NaiveDate, NaiveTime};
use petfy_core::error::CoreError;
use petfy_core::status::{ApprovalStatus, WalkStatus};
use petfy_core::types::DbId;
use petfy_core::walk::{self as rules, WalkerCandidate, WalkerSelector};
use petfy_db::models::walk::{CreateWalk, UpdateWalk, Walk, WalkDetail};
use petfy_db::repositories::{WalkRepo, WalkerRepo};
use petfy_db::DbPool;
use sqlx::PgConnection;

use crate::error::AppResult;

/// A new walk request.
#[derive(Debug, Clone)]
pub struct NewWalk {
    pub walk_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub address: String,
    pub walker: WalkerSelector,
}

/// An edit of an existing walk. `walker: None` keeps the current assignment.
#[derive(Debug, Clone)]
pub struct WalkEdit {
    pub walk_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub address: String,
    pub walker: Option<WalkerSelector>,
}

/// Create a PENDING walk for `client_id`.
///
/// A named walker must exist and be approved; the walk stays PENDING until
/// that walker accepts it.
pub async fn create(pool: &DbPool, client_id: DbId, input: NewWalk) -> AppResult<Walk> {
    rules::validate_schedule(input.start_time, input.end_time, &input.address)?;
    let walker_id = resolve_selector(pool, &input.walker).await?;

    let walk = WalkRepo::create(
        pool,
        &CreateWalk {
            client_id,
            walker_id,
            walk_date: input.walk_date,
            start_time: input.start_time,
            end_time: input.end_time,
            address: input.address.trim().to_string(),
        },
    )
    .await?;

    tracing::info!(walk_id = walk.id, client_id, ?walker_id, "Walk requested");
    Ok(walk)
}

/// Edit a walk owned by `client_id`.
///
/// Editing a CONFIRMED walk sends it back to PENDING. Only PENDING and
/// CONFIRMED walks can be edited. The walk is checked before the walker
/// selector is resolved.
pub async fn update(
    pool: &DbPool,
    walk_id: DbId,
    client_id: DbId,
    edit: WalkEdit,
) -> AppResult<Walk> {
    rules::validate_schedule(edit.start_time, edit.end_time, &edit.address)?;

    let mut tx = pool.begin().await?;
    let walk = lock_walk(&mut *tx, walk_id).await?;
    ensure_client(&walk, client_id)?;
    let status = rules::status_after_edit(status_of(&walk)?)?;
    let selected = match &edit.walker {
        Some(selector) => Some(resolve_selector(pool, selector).await?),
        None => None,
    };

    let updated = WalkRepo::update_schedule(
        &mut *tx,
        walk_id,
        &UpdateWalk {
            walker_id: selected.unwrap_or(walk.walker_id),
            walk_date: edit.walk_date,
            start_time: edit.start_time,
            end_time: edit.end_time,
            address: edit.address.trim().to_string(),
            status,
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(walk_id, client_id, status = %status, "Walk edited");
    Ok(updated)
}

/// PENDING -> CONFIRMED by `walker_id`.
pub async fn accept(pool: &DbPool, walk_id: DbId, walker_id: DbId) -> AppResult<Walk> {
    let mut tx = pool.begin().await?;
    let walk = lock_walk(&mut *tx, walk_id).await?;
    let walker = WalkerRepo::find_by_id_in(&mut *tx, walker_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Walker",
            id: walker_id,
        })?;

    rules::check_accept(
        status_of(&walk)?,
        walk.walker_id,
        WalkerCandidate {
            walker_id: walker.id,
            approval: walker.approval(),
        },
    )?;

    let accepted = WalkRepo::mark_confirmed(&mut *tx, walk_id, walker_id).await?;
    tx.commit().await?;

    tracing::info!(walk_id, walker_id, "Walk accepted");
    Ok(accepted)
}

/// CONFIRMED -> IN_PROGRESS, by the assigned walker.
pub async fn start(pool: &DbPool, walk_id: DbId, walker_id: DbId) -> AppResult<Walk> {
    let mut tx = pool.begin().await?;
    let walk = lock_walk(&mut *tx, walk_id).await?;
    ensure_assigned(&walk, walker_id)?;
    rules::check_start(status_of(&walk)?)?;

    let started = WalkRepo::mark_started(&mut *tx, walk_id).await?;
    tx.commit().await?;

    tracing::info!(walk_id, walker_id, "Walk started");
    Ok(started)
}

/// IN_PROGRESS -> FINISHED, by the assigned walker. Sets the completion flag.
pub async fn finish(pool: &DbPool, walk_id: DbId, walker_id: DbId) -> AppResult<Walk> {
    let mut tx = pool.begin().await?;
    let walk = lock_walk(&mut *tx, walk_id).await?;
    ensure_assigned(&walk, walker_id)?;
    rules::check_finish(status_of(&walk)?)?;

    let finished = WalkRepo::mark_finished(&mut *tx, walk_id).await?;
    tx.commit().await?;

    tracing::info!(walk_id, walker_id, "Walk finished");
    Ok(finished)
}

/// Cancel a walk owned by `client_id` that has not started yet.
pub async fn cancel(pool: &DbPool, walk_id: DbId, client_id: DbId) -> AppResult<Walk> {
    let mut tx = pool.begin().await?;
    let walk = lock_walk(&mut *tx, walk_id).await?;
    ensure_client(&walk, client_id)?;
    rules::check_cancel(status_of(&walk)?)?;

    let cancelled = WalkRepo::mark_cancelled(&mut *tx, walk_id).await?;
    tx.commit().await?;

    tracing::info!(walk_id, client_id, "Walk cancelled");
    Ok(cancelled)
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Walks requested by a client.
pub async fn list_for_client(
    pool: &DbPool,
    client_id: DbId,
    status: Option<WalkStatus>,
) -> AppResult<Vec<WalkDetail>> {
    Ok(WalkRepo::list_by_client(pool, client_id, status).await?)
}

/// Walks assigned to a walker.
pub async fn list_for_walker(
    pool: &DbPool,
    walker_id: DbId,
    status: Option<WalkStatus>,
) -> AppResult<Vec<WalkDetail>> {
    Ok(WalkRepo::list_by_walker(pool, walker_id, status).await?)
}

/// PENDING walks a walker may accept: the open pool plus walks preassigned
/// to that walker.
pub async fn open_offers(pool: &DbPool, walker_id: DbId) -> AppResult<Vec<WalkDetail>> {
    let pending = WalkRepo::list_by_status(pool, WalkStatus::Pending).await?;
    Ok(pending
        .into_iter()
        .filter(|w| w.walker_id.map_or(true, |assigned| assigned == walker_id))
        .collect())
}

/// A client's completed walks, optionally within an inclusive date range.
pub async fn history(
    pool: &DbPool,
    client_id: DbId,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> AppResult<Vec<WalkDetail>> {
    Ok(WalkRepo::list_completed_by_client(pool, client_id, from, to).await?)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve a selector to the walker to preassign (`None` for the open pool).
async fn resolve_selector(pool: &DbPool, selector: &WalkerSelector) -> AppResult<Option<DbId>> {
    match selector {
        WalkerSelector::Random => Ok(None),
        WalkerSelector::Named(username) => {
            let candidate = WalkerRepo::find_by_username(pool, username)
                .await?
                .map(|w| WalkerCandidate {
                    walker_id: w.id,
                    approval: w.approval(),
                });
            Ok(Some(rules::resolve_named_walker(username, candidate)?))
        }
    }
}

async fn lock_walk(conn: &mut PgConnection, walk_id: DbId) -> AppResult<Walk> {
    Ok(WalkRepo::lock_by_id(conn, walk_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Walk",
            id: walk_id,
        })?)
}

fn status_of(walk: &Walk) -> Result<WalkStatus, CoreError> {
    walk.status().ok_or_else(|| {
        CoreError::Internal(format!(
            "Walk {} has unknown status id {}",
            walk.id, walk.status_id
        ))
    })
}

fn ensure_client(walk: &Walk, client_id: DbId) -> Result<(), CoreError> {
    if walk.client_id == client_id {
        Ok(())
    } else {
        Err(CoreError::Forbidden("Only the client of this walk can change it".into()))
    }
}

fn ensure_assigned(walk: &Walk, walker_id: DbId) -> Result<(), CoreError> {
    if walk.walker_id == Some(walker_id) {
        Ok(())
    } else {
        Err(CoreError::Forbidden("Only the assigned walker can do this".into()))
    }
}

/// Whether a walker may view a walk's details.
pub fn is_visible_to_walker(walk: &WalkDetail, walker_id: DbId, approval: ApprovalStatus) -> bool {
    walk.walker_id == Some(walker_id)
        || (walk.walker_id.is_none()
            && approval == ApprovalStatus::Approved
            && WalkStatus::from_id(walk.status_id) == Some(WalkStatus::Pending))
}
