//! Walk entity model and DTOs.

use chrono::{NaiveDate, NaiveTime};
use petfy_core::status::{StatusId, WalkStatus};
use petfy_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `walks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Walk {
    pub id: DbId,
    pub client_id: DbId,
    pub walker_id: Option<DbId>,
    pub walk_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub address: String,
    pub status_id: StatusId,
    pub is_completed: bool,
    pub confirmed_at: Option<Timestamp>,
    pub started_at: Option<Timestamp>,
    pub ended_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Walk {
    /// Decoded lifecycle status.
    ///
    /// The `status_id` column references `walk_statuses`, so an unknown ID
    /// means the lookup table and the enum have drifted apart.
    pub fn status(&self) -> Option<WalkStatus> {
        WalkStatus::from_id(self.status_id)
    }
}

/// Walk joined with the client and walker usernames, for API responses.
#[derive(Debug, Clone, FromRow)]
pub struct WalkDetail {
    pub id: DbId,
    pub client_id: DbId,
    pub client_username: String,
    pub walker_id: Option<DbId>,
    pub walker_username: Option<String>,
    pub walk_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub address: String,
    pub status_id: StatusId,
    pub is_completed: bool,
    pub confirmed_at: Option<Timestamp>,
    pub started_at: Option<Timestamp>,
    pub ended_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// External walk representation with the status as a lowercase label.
#[derive(Debug, Clone, Serialize)]
pub struct WalkResponse {
    pub id: DbId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub address: String,
    pub client_id: DbId,
    pub client: String,
    pub walker_id: Option<DbId>,
    pub walker: Option<String>,
    pub status: Option<WalkStatus>,
    pub is_completed: bool,
    pub confirmed_at: Option<Timestamp>,
    pub started_at: Option<Timestamp>,
    pub ended_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<WalkDetail> for WalkResponse {
    fn from(d: WalkDetail) -> Self {
        Self {
            id: d.id,
            date: d.walk_date,
            start_time: d.start_time,
            end_time: d.end_time,
            address: d.address,
            client_id: d.client_id,
            client: d.client_username,
            walker_id: d.walker_id,
            walker: d.walker_username,
            status: WalkStatus::from_id(d.status_id),
            is_completed: d.is_completed,
            confirmed_at: d.confirmed_at,
            started_at: d.started_at,
            ended_at: d.ended_at,
            created_at: d.created_at,
        }
    }
}

/// DTO for inserting a new walk. Walks always start pending.
#[derive(Debug, Clone)]
pub struct CreateWalk {
    pub client_id: DbId,
    pub walker_id: Option<DbId>,
    pub walk_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub address: String,
}

/// DTO for rewriting a walk's schedule after an edit.
#[derive(Debug, Clone)]
pub struct UpdateWalk {
    pub walker_id: Option<DbId>,
    pub walk_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub address: String,
    pub status: WalkStatus,
}
