//! Repository for the `walkers` table.

use petfy_core::status::ApprovalStatus;
use petfy_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::walker::{CreateWalker, Walker, WalkerSummary};

/// Column list for `walkers` queries.
const COLUMNS: &str = "id, user_id, phone, description, document_path, approval_status_id, \
    rating_average, rating_count, applied_at, decided_at, created_at, updated_at";

/// Same columns, qualified with the `w` alias for joins.
const QUALIFIED_COLUMNS: &str = "w.id, w.user_id, w.phone, w.description, w.document_path, \
    w.approval_status_id, w.rating_average, w.rating_count, w.applied_at, w.decided_at, \
    w.created_at, w.updated_at";

/// Column list for [`WalkerSummary`] queries.
const SUMMARY_COLUMNS: &str = "w.id, w.user_id, u.username, w.description, \
    w.approval_status_id, w.rating_average, w.rating_count, w.applied_at";

/// Provides CRUD operations for walker profiles.
pub struct WalkerRepo;

impl WalkerRepo {
    /// Insert a new application in PENDING status, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateWalker) -> Result<Walker, sqlx::Error> {
        let query = format!(
            "INSERT INTO walkers (user_id, phone, description, document_path, approval_status_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Walker>(&query)
            .bind(input.user_id)
            .bind(&input.phone)
            .bind(&input.description)
            .bind(&input.document_path)
            .bind(ApprovalStatus::Pending.id())
            .fetch_one(pool)
            .await
    }

    /// Find a walker profile by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Walker>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM walkers WHERE id = $1");
        sqlx::query_as::<_, Walker>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the walker profile owned by a user.
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Walker>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM walkers WHERE user_id = $1");
        sqlx::query_as::<_, Walker>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a walker profile by its owner's username.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Walker>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED_COLUMNS} FROM walkers w
             JOIN users u ON u.id = w.user_id
             WHERE u.username = $1"
        );
        sqlx::query_as::<_, Walker>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// List walker profiles in the given approval status.
    ///
    /// Ordered by application time; callers must not rely on it.
    pub async fn list_by_approval(
        pool: &PgPool,
        status: ApprovalStatus,
    ) -> Result<Vec<WalkerSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM walkers w
             JOIN users u ON u.id = w.user_id
             WHERE w.approval_status_id = $1
             ORDER BY w.applied_at ASC"
        );
        sqlx::query_as::<_, WalkerSummary>(&query)
            .bind(status.id())
            .fetch_all(pool)
            .await
    }

    /// Fetch a walker profile and lock its row until the transaction ends.
    pub async fn lock_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Walker>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM walkers WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Walker>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Find a walker profile inside a transaction, without locking it.
    pub async fn find_by_id_in(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Walker>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM walkers WHERE id = $1");
        sqlx::query_as::<_, Walker>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Record an approval decision.
    pub async fn set_approval(
        conn: &mut PgConnection,
        id: DbId,
        status: ApprovalStatus,
    ) -> Result<Walker, sqlx::Error> {
        let query = format!(
            "UPDATE walkers SET approval_status_id = $2, decided_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Walker>(&query)
            .bind(id)
            .bind(status.id())
            .fetch_one(conn)
            .await
    }

    /// Overwrite the rating aggregate. The caller holds the walker row lock.
    pub async fn record_rating_aggregate(
        conn: &mut PgConnection,
        id: DbId,
        average: f64,
        count: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE walkers SET rating_average = $2, rating_count = $3 WHERE id = $1")
            .bind(id)
            .bind(average)
            .bind(count)
            .execute(conn)
            .await?;
        Ok(())
    }
}
