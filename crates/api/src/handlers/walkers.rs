//! Handlers for the `/walkers` resource (applications and public listing).

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use petfy_core::error::CoreError;
use petfy_core::status::ApprovalStatus;
use petfy_db::models::walker::{Walker, WalkerSummary};
use petfy_db::repositories::WalkerRepo;

use crate::engine::walkers::{self, Application, Document};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/walkers/apply
///
/// Accepts a multipart form with `phone` and `description` text fields and
/// an optional `document` file. The application starts pending until an
/// admin decides on it.
pub async fn apply(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Walker>>)> {
    let mut phone: Option<String> = None;
    let mut description: Option<String> = None;
    let mut document: Option<Document> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "phone" => {
                phone = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            "description" => {
                description = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            "document" => {
                let file_name = field.file_name().unwrap_or("document").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                // An empty file input is submitted as a zero-length part.
                if !data.is_empty() {
                    document = Some(Document {
                        file_name,
                        data: data.to_vec(),
                    });
                }
            }
            _ => {} // ignore unknown fields
        }
    }

    let application = Application {
        phone: phone.ok_or_else(|| AppError::BadRequest("Missing required 'phone' field".into()))?,
        description: description
            .ok_or_else(|| AppError::BadRequest("Missing required 'description' field".into()))?,
        document,
    };

    let walker = walkers::apply(
        &state.pool,
        state.blob_store.as_ref(),
        user.user_id,
        application,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: walker })))
}

/// GET /api/v1/walkers
///
/// Approved walkers a client can pick by username.
pub async fn list_approved(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<WalkerSummary>>>> {
    let walkers = WalkerRepo::list_by_approval(&state.pool, ApprovalStatus::Approved).await?;
    Ok(Json(DataResponse { data: walkers }))
}

/// GET /api/v1/walkers/me
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<Walker>>> {
    let walker = WalkerRepo::find_by_user(&state.pool, user.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Walker profile for user",
            id: user.user_id,
        })?;
    Ok(Json(DataResponse { data: walker }))
}
