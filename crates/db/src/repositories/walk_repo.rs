//! Repository for the `walks` table.
//!
//! Uses the `WalkStatus` enum for every status literal. Transition writes
//! always set `status_id` and `is_completed` together so the two columns
//! cannot diverge (the table also carries a CHECK constraint).

use chrono::NaiveDate;
use petfy_core::status::WalkStatus;
use petfy_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::walk::{CreateWalk, UpdateWalk, Walk, WalkDetail};

/// Column list for `walks` queries.
const COLUMNS: &str = "\
    id, client_id, walker_id, walk_date, start_time, end_time, address, \
    status_id, is_completed, confirmed_at, started_at, ended_at, created_at, updated_at";

/// Column list and joins for [`WalkDetail`] queries.
const DETAIL_SELECT: &str = "\
    SELECT w.id, w.client_id, c.username AS client_username, \
           w.walker_id, wu.username AS walker_username, \
           w.walk_date, w.start_time, w.end_time, w.address, \
           w.status_id, w.is_completed, w.confirmed_at, w.started_at, w.ended_at, w.created_at \
    FROM walks w \
    JOIN users c ON c.id = w.client_id \
    LEFT JOIN walkers wk ON wk.id = w.walker_id \
    LEFT JOIN users wu ON wu.id = wk.user_id";

/// Default ordering for walk listings: upcoming schedule first.
const ORDER: &str = "ORDER BY w.walk_date ASC, w.start_time ASC, w.id ASC";

/// Provides CRUD and transition operations for walks.
pub struct WalkRepo;

impl WalkRepo {
    /// Insert a new PENDING walk, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateWalk) -> Result<Walk, sqlx::Error> {
        let query = format!(
            "INSERT INTO walks
                (client_id, walker_id, walk_date, start_time, end_time, address, status_id, is_completed)
             VALUES ($1, $2, $3, $4, $5, $6, $7, false)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Walk>(&query)
            .bind(input.client_id)
            .bind(input.walker_id)
            .bind(input.walk_date)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(&input.address)
            .bind(WalkStatus::Pending.id())
            .fetch_one(pool)
            .await
    }

    /// Find a walk by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Walk>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM walks WHERE id = $1");
        sqlx::query_as::<_, Walk>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a walk with client and walker usernames resolved.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<WalkDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE w.id = $1");
        sqlx::query_as::<_, WalkDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch a walk and lock its row until the transaction ends.
    ///
    /// Concurrent transitions on the same walk queue on this lock and then
    /// see the committed status of whoever went first.
    pub async fn lock_by_id(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Walk>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM walks WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Walk>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Rewrite schedule, address, walker and status after an edit.
    ///
    /// The confirmation timestamp is cleared whenever the walk lands in
    /// PENDING.
    pub async fn update_schedule(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateWalk,
    ) -> Result<Walk, sqlx::Error> {
        let query = format!(
            "UPDATE walks SET
                walker_id = $2,
                walk_date = $3,
                start_time = $4,
                end_time = $5,
                address = $6,
                status_id = $7,
                confirmed_at = CASE WHEN $7 = $8 THEN NULL ELSE confirmed_at END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Walk>(&query)
            .bind(id)
            .bind(input.walker_id)
            .bind(input.walk_date)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(&input.address)
            .bind(input.status.id())
            .bind(WalkStatus::Pending.id())
            .fetch_one(conn)
            .await
    }

    /// PENDING -> CONFIRMED: assign the walker and stamp `confirmed_at`.
    pub async fn mark_confirmed(
        conn: &mut PgConnection,
        id: DbId,
        walker_id: DbId,
    ) -> Result<Walk, sqlx::Error> {
        let query = format!(
            "UPDATE walks SET walker_id = $2, status_id = $3, confirmed_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Walk>(&query)
            .bind(id)
            .bind(walker_id)
            .bind(WalkStatus::Confirmed.id())
            .fetch_one(conn)
            .await
    }

    /// CONFIRMED -> IN_PROGRESS: stamp `started_at`.
    pub async fn mark_started(conn: &mut PgConnection, id: DbId) -> Result<Walk, sqlx::Error> {
        let query = format!(
            "UPDATE walks SET status_id = $2, started_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Walk>(&query)
            .bind(id)
            .bind(WalkStatus::InProgress.id())
            .fetch_one(conn)
            .await
    }

    /// IN_PROGRESS -> FINISHED: set the completion flag and stamp `ended_at`.
    pub async fn mark_finished(conn: &mut PgConnection, id: DbId) -> Result<Walk, sqlx::Error> {
        let query = format!(
            "UPDATE walks SET status_id = $2, is_completed = true, ended_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Walk>(&query)
            .bind(id)
            .bind(WalkStatus::Finished.id())
            .fetch_one(conn)
            .await
    }

    /// Move a walk to CANCELLED.
    pub async fn mark_cancelled(conn: &mut PgConnection, id: DbId) -> Result<Walk, sqlx::Error> {
        let query = format!(
            "UPDATE walks SET status_id = $2, is_completed = false
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Walk>(&query)
            .bind(id)
            .bind(WalkStatus::Cancelled.id())
            .fetch_one(conn)
            .await
    }

    /// List a client's walks, optionally filtered by status.
    pub async fn list_by_client(
        pool: &PgPool,
        client_id: DbId,
        status: Option<WalkStatus>,
    ) -> Result<Vec<WalkDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE w.client_id = $1 AND ($2::SMALLINT IS NULL OR w.status_id = $2)
             {ORDER}"
        );
        sqlx::query_as::<_, WalkDetail>(&query)
            .bind(client_id)
            .bind(status.map(WalkStatus::id))
            .fetch_all(pool)
            .await
    }

    /// List walks assigned to a walker, optionally filtered by status.
    pub async fn list_by_walker(
        pool: &PgPool,
        walker_id: DbId,
        status: Option<WalkStatus>,
    ) -> Result<Vec<WalkDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE w.walker_id = $1 AND ($2::SMALLINT IS NULL OR w.status_id = $2)
             {ORDER}"
        );
        sqlx::query_as::<_, WalkDetail>(&query)
            .bind(walker_id)
            .bind(status.map(WalkStatus::id))
            .fetch_all(pool)
            .await
    }

    /// List every walk in a status.
    pub async fn list_by_status(
        pool: &PgPool,
        status: WalkStatus,
    ) -> Result<Vec<WalkDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE w.status_id = $1 {ORDER}");
        sqlx::query_as::<_, WalkDetail>(&query)
            .bind(status.id())
            .fetch_all(pool)
            .await
    }

    /// List a client's completed walks, optionally within an inclusive date
    /// range. Either bound may be omitted.
    pub async fn list_completed_by_client(
        pool: &PgPool,
        client_id: DbId,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<WalkDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE w.client_id = $1 AND w.is_completed = true
               AND ($2::DATE IS NULL OR w.walk_date >= $2)
               AND ($3::DATE IS NULL OR w.walk_date <= $3)
             ORDER BY w.walk_date DESC, w.start_time DESC, w.id DESC"
        );
        sqlx::query_as::<_, WalkDetail>(&query)
            .bind(client_id)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }
}
