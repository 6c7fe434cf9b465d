//! Repository for the `ratings` table.

use petfy_core::rating::KIND_WALK;
use petfy_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::rating::{CreateRating, Rating};

/// Column list for `ratings` queries.
const COLUMNS: &str = "id, user_id, walk_id, score, kind, comment, created_at";

/// Provides insert and aggregate queries for ratings.
pub struct RatingRepo;

impl RatingRepo {
    /// Insert a rating inside the caller's transaction.
    ///
    /// A second rating for the same walk violates `uq_ratings_walk_id`.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateRating,
    ) -> Result<Rating, sqlx::Error> {
        let query = format!(
            "INSERT INTO ratings (user_id, walk_id, score, kind, comment)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Rating>(&query)
            .bind(input.user_id)
            .bind(input.walk_id)
            .bind(input.score)
            .bind(&input.kind)
            .bind(&input.comment)
            .fetch_one(conn)
            .await
    }

    /// Whether the walk already has a rating.
    pub async fn exists_for_walk(
        conn: &mut PgConnection,
        walk_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM ratings WHERE walk_id = $1)")
                .bind(walk_id)
                .fetch_one(conn)
                .await?;
        Ok(row.0)
    }

    /// Every walk score received by a walker, across all of its walks.
    pub async fn walk_scores_for_walker(
        conn: &mut PgConnection,
        walker_id: DbId,
    ) -> Result<Vec<i16>, sqlx::Error> {
        let rows: Vec<(i16,)> = sqlx::query_as(
            "SELECT r.score FROM ratings r
             JOIN walks w ON w.id = r.walk_id
             WHERE w.walker_id = $1 AND r.kind = $2
             ORDER BY r.id ASC",
        )
        .bind(walker_id)
        .bind(KIND_WALK)
        .fetch_all(conn)
        .await?;
        Ok(rows.into_iter().map(|(score,)| score).collect())
    }

    /// List the ratings a user has submitted, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Rating>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ratings WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Rating>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
