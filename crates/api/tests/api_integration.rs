//! API integration tests.
//!
//! These tests verify the API endpoints work correctly together.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use stayhub_api::{ChatStreamState, middleware::AppState, router as api_router};
use stayhub_common::config::{AuthConfig, Config, DatabaseConfig, ServerConfig};
use stayhub_core::{
    AccountService, AdminService, BookingService, ChatService, EmailService, HotelService,
    NoopMediaHost, OAuthService, PasswordResetService, ReviewService, RoomService,
};
use stayhub_db::repositories::{
    AccountRepository, BookingRepository, ChatMessageRepository, HotelRepository,
    ReviewRepository, RoomRepository,
};
use tower::ServiceExt;

/// Create a test configuration.
fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            url: "https://example.com".to_string(),
            frontend_url: None,
        },
        database: DatabaseConfig {
            url: "postgres://localhost/test".to_string(),
            max_connections: 10,
            min_connections: 1,
        },
        auth: AuthConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_expiry_secs: 3600,
        },
        smtp: None,
        ai: None,
        geocoding: None,
    }
}

/// Create test app state over a mock database.
fn create_test_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);
    let config = create_test_config();

    let account_repo = AccountRepository::new(Arc::clone(&db));
    let hotel_repo = HotelRepository::new(Arc::clone(&db));
    let room_repo = RoomRepository::new(Arc::clone(&db));
    let booking_repo = BookingRepository::new(Arc::clone(&db));
    let review_repo = ReviewRepository::new(Arc::clone(&db));
    let chat_repo = ChatMessageRepository::new(Arc::clone(&db));

    let email_service = EmailService::new(None).unwrap();
    let media_host = Arc::new(NoopMediaHost);
    let streaming = ChatStreamState::new();

    AppState {
        account_service: AccountService::new(account_repo.clone(), &config),
        oauth_service: OAuthService::new(account_repo.clone(), &config),
        password_reset_service: PasswordResetService::new(
            account_repo.clone(),
            email_service,
            &config,
        ),
        hotel_service: HotelService::new(hotel_repo.clone(), media_host.clone(), None),
        room_service: RoomService::new(room_repo.clone(), hotel_repo.clone(), media_host),
        booking_service: BookingService::new(
            Arc::clone(&db),
            booking_repo.clone(),
            room_repo,
            hotel_repo.clone(),
        ),
        review_service: ReviewService::new(review_repo, booking_repo.clone(), hotel_repo.clone()),
        chat_service: ChatService::new(
            chat_repo,
            None,
            Arc::new(streaming.clone()),
            Duration::from_millis(100),
        ),
        admin_service: AdminService::new(account_repo, hotel_repo, booking_repo),
        ai_service: None,
        streaming,
    }
}

fn router_with(db: DatabaseConnection) -> Router {
    api_router().with_state(create_test_state(db))
}

fn empty_mock() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection()
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = router_with(empty_mock());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent/endpoint")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_with_unknown_email_is_unauthorized() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<stayhub_db::entities::account::Model>::new()])
        .into_connection();
    let app = router_with(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/login")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    r#"{"email":"nobody@example.com","password":"wrongpassword"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_with_invalid_json_returns_error() {
    let app = router_with(empty_mock());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/register")
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

#[tokio::test]
async fn test_list_hotels_returns_ok_with_empty_result() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<stayhub_db::entities::hotel::Model>::new()])
        .into_connection();
    let app = router_with(db);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/hotels")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_bookings_require_auth() {
    let app = router_with(empty_mock());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/bookings")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_analytics_requires_auth() {
    let app = router_with(empty_mock());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/analytics")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_chat_history_requires_auth() {
    let app = router_with(empty_mock());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/chat/history")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
