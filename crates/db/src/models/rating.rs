//! Rating model and DTOs.

use petfy_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `ratings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Rating {
    pub id: DbId,
    pub user_id: DbId,
    pub walk_id: Option<DbId>,
    pub score: i16,
    pub kind: String,
    pub comment: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for inserting a rating.
#[derive(Debug, Clone)]
pub struct CreateRating {
    pub user_id: DbId,
    pub walk_id: Option<DbId>,
    pub score: i16,
    pub kind: String,
    pub comment: Option<String>,
}
