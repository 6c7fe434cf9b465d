mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_approved_walker, create_customer, get, get_auth, post_auth,
    post_json, put_json_auth, TEST_PASSWORD,
};
use serde_json::json;
use sqlx::PgPool;

fn registration(username: &str, email: &str) -> serde_json::Value {
    json!({
        "username": username,
        "email": email,
        "password": "s3cret-pass",
        "confirm_password": "s3cret-pass",
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_then_login(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/v1/auth/register",
        registration("ana", "Ana@Example.com"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "ana");
    assert_eq!(json["data"]["email"], "ana@example.com");
    assert_eq!(json["data"]["role"], "customer");
    assert!(json["data"].get("password_hash").is_none());

    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "email": "ANA@example.com", "password": "s3cret-pass" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["expires_in"], 3600);
    assert_eq!(json["user"]["username"], "ana");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_email_or_username_conflicts(pool: PgPool) {
    let app = build_test_app(pool.clone());
    create_customer(&pool, "ana").await;

    let response = post_json(
        app.clone(),
        "/api/v1/auth/register",
        registration("other", "ana@petfy.test"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_json(
        app,
        "/api/v1/auth/register",
        registration("ana", "new@petfy.test"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn registration_input_is_validated(pool: PgPool) {
    let app = build_test_app(pool);

    let mismatch = json!({
        "username": "ana",
        "email": "ana@example.com",
        "password": "s3cret-pass",
        "confirm_password": "different",
    });
    let response = post_json(app.clone(), "/api/v1/auth/register", mismatch).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = post_json(
        app,
        "/api/v1/auth/register",
        registration("ana", "not-an-email"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn registration_username_is_trimmed_and_checked(pool: PgPool) {
    let app = build_test_app(pool);

    // Padding does not count towards the minimum length.
    let response = post_json(
        app.clone(),
        "/api/v1/auth/register",
        registration("  ab  ", "ab@example.com"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    // The open-pool selector cannot be taken as a username.
    for username in ["random", "Random"] {
        let response = post_json(
            app.clone(),
            "/api/v1/auth/register",
            registration(username, "random@example.com"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    let response = post_json(
        app,
        "/api/v1/auth/register",
        registration("  ana  ", "ana@example.com"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["username"], "ana");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_password_is_unauthorized(pool: PgPool) {
    let app = build_test_app(pool.clone());
    create_customer(&pool, "ana").await;

    let response = post_json(
        app.clone(),
        "/api/v1/auth/login",
        json!({ "email": "ana@petfy.test", "password": "nope-nope" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "email": "ana@petfy.test", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_requires_a_token(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/api/v1/auth/me").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_includes_walker_profile(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, customer_token) = create_customer(&pool, "ana").await;
    let (walker, walker_token) = create_approved_walker(&pool, "luna").await;

    let json = body_json(get_auth(app.clone(), "/api/v1/auth/me", &customer_token).await).await;
    assert_eq!(json["data"]["user"]["username"], "ana");
    assert!(json["data"]["walker"].is_null());

    let json = body_json(get_auth(app, "/api/v1/auth/me", &walker_token).await).await;
    assert_eq!(json["data"]["walker"]["id"], walker.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn username_change_rejects_taken_names(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, token) = create_customer(&pool, "ana").await;
    create_customer(&pool, "bob").await;

    let response = put_json_auth(
        app.clone(),
        "/api/v1/auth/me",
        json!({ "username": "bob" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = put_json_auth(
        app,
        "/api/v1/auth/me",
        json!({ "username": "ana_walks" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["username"], "ana_walks");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn username_change_applies_registration_rules(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, token) = create_customer(&pool, "ana").await;

    for username in ["  ab  ", "RANDOM", " random "] {
        let response = put_json_auth(
            app.clone(),
            "/api/v1/auth/me",
            json!({ "username": username }),
            &token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    let response = put_json_auth(
        app,
        "/api/v1/auth/me",
        json!({ "username": "  ana_2  " }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["username"], "ana_2");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn logout_returns_no_content(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, token) = create_customer(&pool, "ana").await;

    let response = post_auth(app, "/api/v1/auth/logout", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
