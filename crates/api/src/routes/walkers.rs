//! Route definitions for the `/walkers` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::walkers;
use crate::state::AppState;

/// Routes mounted at `/walkers`.
///
/// ```text
/// GET  /       -> list_approved
/// POST /apply  -> apply (multipart)
/// GET  /me     -> me
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(walkers::list_approved))
        .route("/apply", post(walkers::apply))
        .route("/me", get(walkers::me))
}
