//! Route definitions for the `/ratings` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::ratings;
use crate::state::AppState;

/// Routes mounted at `/ratings`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(ratings::submit))
        .route("/mine", get(ratings::list_mine))
}
