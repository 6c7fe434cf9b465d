//! Shared helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use petfy_api::auth::jwt::{generate_access_token, JwtConfig};
use petfy_api::auth::password::hash_password;
use petfy_api::config::ServerConfig;
use petfy_api::router::build_app_router;
use petfy_api::state::AppState;
use petfy_api::storage::LocalBlobStore;
use petfy_core::roles::ROLE_CUSTOMER;
use petfy_core::status::ApprovalStatus;
use petfy_db::models::user::{CreateUser, User};
use petfy_db::models::walker::{CreateWalker, Walker};
use petfy_db::repositories::{UserRepo, WalkerRepo};
use sqlx::PgPool;
use tower::ServiceExt;

/// Password given to every user created by [`create_user`].
pub const TEST_PASSWORD: &str = "walkies123";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:4200".to_string()],
        request_timeout_secs: 30,
        upload_dir: std::env::temp_dir().join(format!("petfy-test-{}", uuid::Uuid::new_v4())),
        max_upload_bytes: 1024 * 1024,
        min_password_length: 6,
        jwt: JwtConfig {
            secret: "petfy-integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router (same middleware stack as production)
/// on top of the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        blob_store: Arc::new(LocalBlobStore::new(config.upload_dir.clone())),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with the given role directly and return it with a valid
/// access token.
pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> (User, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@petfy.test"),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            role: role.to_string(),
        },
    )
    .await
    .unwrap();
    let token = token_for(&user);
    (user, token)
}

/// Insert a customer and return it with a token.
pub async fn create_customer(pool: &PgPool, username: &str) -> (User, String) {
    create_user(pool, username, ROLE_CUSTOMER).await
}

/// Insert a user with a walker profile in the given approval status.
pub async fn create_walker(
    pool: &PgPool,
    username: &str,
    approval: ApprovalStatus,
) -> (Walker, String) {
    let (user, token) = create_customer(pool, username).await;
    let walker = WalkerRepo::create(
        pool,
        &CreateWalker {
            user_id: user.id,
            phone: "+56 9 1234 5678".to_string(),
            description: "Happy to walk any dog".to_string(),
            document_path: None,
        },
    )
    .await
    .unwrap();

    let walker = if approval == ApprovalStatus::Pending {
        walker
    } else {
        let mut tx = pool.begin().await.unwrap();
        let walker = WalkerRepo::set_approval(&mut *tx, walker.id, approval)
            .await
            .unwrap();
        tx.commit().await.unwrap();
        walker
    };
    (walker, token)
}

/// Insert an approved walker.
pub async fn create_approved_walker(pool: &PgPool, username: &str) -> (Walker, String) {
    create_walker(pool, username, ApprovalStatus::Approved).await
}

pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.role, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, None, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, Some(token), None)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, request(Method::POST, uri, None, Some(body))).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, request(Method::POST, uri, Some(token), Some(body))).await
}

/// POST with no body, for transition endpoints.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::POST, uri, Some(token), None)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, request(Method::PUT, uri, Some(token), Some(body))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::DELETE, uri, Some(token), None)).await
}

/// Send a raw request, for bodies the JSON helpers cannot build.
pub async fn send_request(app: Router, request: Request<Body>) -> Response<Body> {
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
