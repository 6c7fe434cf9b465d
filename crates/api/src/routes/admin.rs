//! Route definitions for `/admin`. Every handler requires the admin role.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET  /walkers                -> list_walkers
/// POST /walkers/{id}/approve   -> approve
/// POST /walkers/{id}/reject    -> reject
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/walkers", get(admin::list_walkers))
        .route("/walkers/{id}/approve", post(admin::approve))
        .route("/walkers/{id}/reject", post(admin::reject))
}
