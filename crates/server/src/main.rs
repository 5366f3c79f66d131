//! Stayhub-rs server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, middleware, routing::get};
use stayhub_api::{
    ChatStreamState, chat_ws_handler, middleware::AppState, rate_limit::RateLimiterState,
    router as api_router,
};
use stayhub_common::Config;
use stayhub_core::{
    AccountService, AdminService, AiService, BookingService, ChatService, EmailService,
    GeocodingService, HotelService, NoopMediaHost, OAuthService, PasswordResetService,
    ReviewService, RoomService,
};
use stayhub_db::repositories::{
    AccountRepository, BookingRepository, ChatMessageRepository, HotelRepository,
    ReviewRepository, RoomRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stayhub=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting stayhub-rs server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database and run migrations
    let db = stayhub_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    stayhub_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let account_repo = AccountRepository::new(Arc::clone(&db));
    let hotel_repo = HotelRepository::new(Arc::clone(&db));
    let room_repo = RoomRepository::new(Arc::clone(&db));
    let booking_repo = BookingRepository::new(Arc::clone(&db));
    let review_repo = ReviewRepository::new(Arc::clone(&db));
    let chat_repo = ChatMessageRepository::new(Arc::clone(&db));

    // External collaborators
    let email_service = EmailService::new(config.smtp.as_ref())?;
    if !email_service.is_enabled() {
        info!("SMTP not configured, outbound mail disabled");
    }

    let ai_service = config.ai.clone().map(AiService::new);
    if ai_service.is_none() {
        info!("AI provider not configured, text generation disabled");
    }
    let smart_reply_timeout = Duration::from_millis(
        config
            .ai
            .as_ref()
            .map_or(5000, |ai| ai.smart_reply_timeout_ms),
    );

    // Geocoding is disabled unless configured; addresses are stored
    // without coordinates in that case.
    let geocoder = config.geocoding.clone().map(GeocodingService::new);
    let media_host = Arc::new(NoopMediaHost);

    // Chat fan-out hub doubles as the core event publisher
    let streaming = ChatStreamState::new();

    // Initialize services
    let account_service = AccountService::new(account_repo.clone(), &config);
    let oauth_service = OAuthService::new(account_repo.clone(), &config);
    let password_reset_service =
        PasswordResetService::new(account_repo.clone(), email_service, &config);
    let hotel_service = HotelService::new(hotel_repo.clone(), media_host.clone(), geocoder);
    let room_service = RoomService::new(room_repo.clone(), hotel_repo.clone(), media_host);
    let booking_service = BookingService::new(
        Arc::clone(&db),
        booking_repo.clone(),
        room_repo.clone(),
        hotel_repo.clone(),
    );
    let review_service =
        ReviewService::new(review_repo, booking_repo.clone(), hotel_repo.clone());
    let chat_service = ChatService::new(
        chat_repo,
        ai_service.clone(),
        Arc::new(streaming.clone()),
        smart_reply_timeout,
    );
    let admin_service = AdminService::new(account_repo, hotel_repo, booking_repo);

    // Initialize API rate limiter
    let rate_limiter = RateLimiterState::new();

    // Create app state
    let state = AppState {
        account_service,
        oauth_service,
        password_reset_service,
        hotel_service,
        room_service,
        booking_service,
        review_service,
        chat_service,
        admin_service,
        ai_service,
        streaming,
    };

    // Build router
    let app = Router::new()
        .route("/chat/ws", get(chat_ws_handler))
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            stayhub_api::rate_limit::rate_limit_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            stayhub_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
