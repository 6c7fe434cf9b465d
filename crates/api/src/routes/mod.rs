pub mod admin;
pub mod auth;
pub mod health;
pub mod ratings;
pub mod walkers;
pub mod walks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                      register (public)
/// /auth/login                         login (public)
/// /auth/me                            current user, rename (GET, PUT)
/// /auth/logout                        logout (no-op)
///
/// /walks                              request a walk (POST)
/// /walks/mine                         caller's walks as client
/// /walks/assigned                     caller's walks as walker
/// /walks/pending                      open offers for an approved walker
/// /walks/history                      completed walks, optional date range
/// /walks/{id}                         get, edit, cancel (GET, PUT, DELETE)
/// /walks/{id}/accept                  accept (walker)
/// /walks/{id}/start                   start (assigned walker)
/// /walks/{id}/finish                  finish (assigned walker)
///
/// /walkers                            approved walkers
/// /walkers/apply                      submit an application (multipart)
/// /walkers/me                         caller's walker profile
///
/// /ratings                            rate a walk or the app (POST)
/// /ratings/mine                       caller's ratings
///
/// /admin/walkers                      applications by status (admin only)
/// /admin/walkers/{id}/approve         approve (admin only)
/// /admin/walkers/{id}/reject          reject or revoke (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/walks", walks::router())
        .nest("/walkers", walkers::router())
        .nest("/ratings", ratings::router())
        .nest("/admin", admin::router())
}
