//! Rating aggregator.
//!
//! Input checks (score, comment, kind) run before any storage access. A walk
//! rating is inserted and the walker's aggregate recomputed from all of its
//! walk ratings in one transaction; the walker row is locked for the
//! recompute so two ratings for the same walker cannot interleave.

use petfy_core::error::{CoreError, StateViolation};
use petfy_core::rating::{
    check_walk_rateable, confirmation_message, resolve_kind, validate_comment, validate_score,
    RateableWalk, RatingAggregate, RatingKind,
};
use petfy_core::types::DbId;
use petfy_db::models::rating::{CreateRating, Rating};
use petfy_db::repositories::{RatingRepo, WalkRepo, WalkerRepo};
use petfy_db::DbPool;
use serde::Serialize;
use sqlx::PgConnection;

use crate::error::{is_unique_violation, AppError, AppResult};

/// A rating as submitted by a user.
#[derive(Debug, Clone)]
pub struct Submission {
    pub score: i32,
    pub kind: Option<String>,
    pub walk_id: Option<DbId>,
    pub comment: Option<String>,
}

/// Result of a successful submission.
#[derive(Debug, Serialize)]
pub struct Receipt {
    pub rating: Rating,
    pub message: String,
}

/// Submit a rating of the app or of a finished walk.
pub async fn submit(pool: &DbPool, rater_id: DbId, submission: Submission) -> AppResult<Receipt> {
    let score = validate_score(submission.score)?;
    let comment = submission
        .comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    validate_comment(comment.as_deref())?;
    let kind = resolve_kind(submission.kind.as_deref(), submission.walk_id)?;

    let rating = match kind {
        RatingKind::App => {
            let mut conn = pool.acquire().await?;
            RatingRepo::create(
                &mut *conn,
                &CreateRating {
                    user_id: rater_id,
                    walk_id: None,
                    score,
                    kind: kind.as_str().to_string(),
                    comment,
                },
            )
            .await?
        }
        RatingKind::Walk => {
            let walk_id = submission
                .walk_id
                .ok_or(StateViolation::MissingWalkReference)?;
            rate_walk(pool, rater_id, walk_id, score, comment).await?
        }
    };

    tracing::info!(
        rating_id = rating.id,
        rater_id,
        kind = kind.as_str(),
        score,
        "Rating recorded"
    );
    Ok(Receipt {
        message: confirmation_message(kind, score),
        rating,
    })
}

async fn rate_walk(
    pool: &DbPool,
    rater_id: DbId,
    walk_id: DbId,
    score: i16,
    comment: Option<String>,
) -> AppResult<Rating> {
    let mut tx = pool.begin().await?;

    let walk = WalkRepo::lock_by_id(&mut *tx, walk_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Walk",
            id: walk_id,
        })?;
    let status = walk.status().ok_or_else(|| {
        CoreError::Internal(format!("Walk {walk_id} has unknown status id {}", walk.status_id))
    })?;
    let already_rated = RatingRepo::exists_for_walk(&mut *tx, walk_id).await?;
    check_walk_rateable(
        rater_id,
        RateableWalk {
            client_id: walk.client_id,
            status,
            is_completed: walk.is_completed,
            already_rated,
        },
    )?;

    let rating = RatingRepo::create(
        &mut *tx,
        &CreateRating {
            user_id: rater_id,
            walk_id: Some(walk_id),
            score,
            kind: RatingKind::Walk.as_str().to_string(),
            comment,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e, "uq_ratings_walk_id") {
            AppError::from(StateViolation::AlreadyRated)
        } else {
            AppError::from(e)
        }
    })?;

    if let Some(walker_id) = walk.walker_id {
        let aggregate = recompute_aggregate(&mut *tx, walker_id).await?;
        tracing::debug!(
            walker_id,
            average = aggregate.average,
            count = aggregate.count,
            "Walker rating aggregate updated"
        );
    }

    tx.commit().await?;
    Ok(rating)
}

/// Recompute a walker's aggregate from every walk rating it has received.
/// Locks the walker row until the caller's transaction ends.
async fn recompute_aggregate(
    conn: &mut PgConnection,
    walker_id: DbId,
) -> AppResult<RatingAggregate> {
    WalkerRepo::lock_by_id(conn, walker_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Walker",
            id: walker_id,
        })?;
    let scores = RatingRepo::walk_scores_for_walker(conn, walker_id).await?;
    let aggregate = RatingAggregate::from_scores(&scores);
    WalkerRepo::record_rating_aggregate(conn, walker_id, aggregate.average, aggregate.count)
        .await?;
    Ok(aggregate)
}
