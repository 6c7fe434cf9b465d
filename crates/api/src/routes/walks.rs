//! Route definitions for the `/walks` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::walks;
use crate::state::AppState;

/// Routes mounted at `/walks`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(walks::create))
        .route("/mine", get(walks::list_mine))
        .route("/assigned", get(walks::list_assigned))
        .route("/pending", get(walks::list_pending))
        .route("/history", get(walks::history))
        .route(
            "/{id}",
            get(walks::get_by_id)
                .put(walks::update)
                .delete(walks::cancel),
        )
        .route("/{id}/accept", post(walks::accept))
        .route("/{id}/start", post(walks::start))
        .route("/{id}/finish", post(walks::finish))
}
