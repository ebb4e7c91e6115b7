//! API integration tests.
//!
//! These tests drive the router end to end against a mock database; they
//! pin the permission and error surface of the public API.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use critika_api::{middleware::AppState, router as api_router};
use critika_common::config::AuthConfig;
use critika_core::{
    AuthService, CatalogService, CommentService, EmailService, ReviewService, UserService,
};
use critika_db::entities::{category, title};
use critika_db::repositories::{
    CategoryRepository, CommentRepository, GenreRepository, ReviewRepository, TitleRepository,
    UserCodeRepository, UserRepository,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use std::sync::Arc;
use tower::ServiceExt;

fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret".to_string(),
        access_ttl_minutes: 5,
        refresh_ttl_days: 1,
        code_ttl_minutes: 720,
    }
}

/// Create test app state around a mock connection.
fn create_test_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);

    let user_repo = UserRepository::new(Arc::clone(&db));
    let code_repo = UserCodeRepository::new(Arc::clone(&db));
    let category_repo = CategoryRepository::new(Arc::clone(&db));
    let genre_repo = GenreRepository::new(Arc::clone(&db));
    let title_repo = TitleRepository::new(Arc::clone(&db));
    let review_repo = ReviewRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));

    let email_service = EmailService::new(None, "Critika").unwrap();

    AppState {
        auth_service: AuthService::new(
            user_repo.clone(),
            code_repo,
            email_service,
            test_auth_config(),
        ),
        catalog_service: CatalogService::new(
            category_repo,
            genre_repo,
            title_repo.clone(),
            review_repo.clone(),
        ),
        review_service: ReviewService::new(review_repo.clone(), title_repo, user_repo.clone()),
        comment_service: CommentService::new(comment_repo, review_repo, user_repo.clone()),
        user_service: UserService::new(user_repo),
    }
}

fn create_test_router(db: DatabaseConnection) -> Router {
    Router::new()
        .nest("/v1", api_router())
        .with_state(create_test_state(db))
}

fn empty_mock() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

#[tokio::test]
async fn test_anonymous_title_list_returns_ok() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<title::Model>::new()])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/titles/")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_anonymous_title_create_is_unauthorized() {
    let app = create_test_router(empty_mock());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/titles/")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"name":"Alien","year":1979}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_anonymous_category_list_returns_ok() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<category::Model>::new()])
        .into_connection();
    let app = create_test_router(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/categories/")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_anonymous_category_create_is_unauthorized() {
    let app = create_test_router(empty_mock());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/categories/")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"name":"Films","slug":"films"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_exchange_with_missing_fields_is_bad_request() {
    let app = create_test_router(empty_mock());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/auth/token/")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_token_exchange_with_missing_code_is_bad_request() {
    let app = create_test_router(empty_mock());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/auth/token/")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"email":"a@example.com"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_request_code_with_malformed_email_is_bad_request() {
    let app = create_test_router(empty_mock());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/auth/email/")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"email":"not-an-email"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_anonymous_review_patch_is_unauthorized() {
    let app = create_test_router(empty_mock());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/titles/t1/reviews/r1/")
                .method("PATCH")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"text":"edited"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_anonymous_me_is_unauthorized() {
    let app = create_test_router(empty_mock());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/users/me/")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_test_router(empty_mock());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/nonexistent/")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_json_is_rejected() {
    let app = create_test_router(empty_mock());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/auth/email/")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from("invalid json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
    );
}
