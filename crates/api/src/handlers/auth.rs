//! Handlers for the `/auth` resource (register, login, profile, logout).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use petfy_core::account::normalize_username;
use petfy_core::error::CoreError;
use petfy_core::roles::ROLE_CUSTOMER;
use petfy_db::models::user::{CreateUser, UserResponse};
use petfy_db::models::walker::Walker;
use petfy_db::repositories::{UserRepo, WalkerRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{check_new_password, hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    pub username: String,
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for `PUT /auth/me`.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// The current user plus its walker profile, if it has applied.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
    pub walker: Option<Walker>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a customer account. Returns 201 with the new user.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    input.validate()?;
    let username = normalize_username(&input.username)?;
    check_new_password(
        &input.password,
        &input.confirm_password,
        state.config.min_password_length,
    )?;

    let email = input.email.trim().to_lowercase();
    if UserRepo::exists_by_email(&state.pool, &email).await? {
        return Err(CoreError::Conflict("Email is already registered".into()).into());
    }
    if UserRepo::exists_by_username(&state.pool, &username).await? {
        return Err(CoreError::Conflict("Username is already taken".into()).into());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username,
            email,
            password_hash,
            role: ROLE_CUSTOMER.to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(user),
        }),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    input.validate()?;

    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = UserRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid());
    }

    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(AuthResponse {
        access_token,
        expires_in: state.config.jwt.expires_in_secs(),
        user: UserResponse::from(user),
    }))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<MeResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth_user.user_id,
        })?;
    let walker = WalkerRepo::find_by_user(&state.pool, user.id).await?;

    Ok(Json(DataResponse {
        data: MeResponse {
            user: UserResponse::from(user),
            walker,
        },
    }))
}

/// PUT /api/v1/auth/me
///
/// Change the caller's username. A taken username returns 409; a reserved
/// or badly sized one returns 400.
pub async fn update_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let username = normalize_username(&input.username)?;

    if let Some(existing) = UserRepo::find_by_username(&state.pool, &username).await? {
        if existing.id != auth_user.user_id {
            return Err(CoreError::Conflict("Username is already taken".into()).into());
        }
    }

    let user = UserRepo::update_username(&state.pool, auth_user.user_id, &username)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth_user.user_id,
        })?;

    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// POST /api/v1/auth/logout
///
/// Tokens are stateless, so there is nothing to revoke. Returns 204.
pub async fn logout(auth_user: AuthUser) -> StatusCode {
    tracing::debug!(user_id = auth_user.user_id, "User logged out");
    StatusCode::NO_CONTENT
}
