//! Walker profile model and DTOs.

use petfy_core::status::{ApprovalStatus, StatusId};
use petfy_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `walkers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Walker {
    pub id: DbId,
    pub user_id: DbId,
    pub phone: String,
    pub description: String,
    pub document_path: Option<String>,
    pub approval_status_id: StatusId,
    pub rating_average: f64,
    pub rating_count: i32,
    pub applied_at: Timestamp,
    pub decided_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Walker {
    /// Decoded approval status. Unknown IDs are treated as pending.
    pub fn approval(&self) -> ApprovalStatus {
        ApprovalStatus::from_id(self.approval_status_id).unwrap_or(ApprovalStatus::Pending)
    }
}

/// Walker profile joined with its owner's username, for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WalkerSummary {
    pub id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub description: String,
    pub approval_status_id: StatusId,
    pub rating_average: f64,
    pub rating_count: i32,
    pub applied_at: Timestamp,
}

/// DTO for a new walker application.
#[derive(Debug, Clone)]
pub struct CreateWalker {
    pub user_id: DbId,
    pub phone: String,
    pub description: String,
    pub document_path: Option<String>,
}
