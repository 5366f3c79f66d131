//! API endpoints.

mod admin;
mod ai;
mod auth;
mod bookings;
mod chat;
mod hotels;
mod reviews;
mod rooms;

use axum::Router;

use crate::middleware::AppState;

pub use auth::AccountResponse;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/hotels", hotels::router())
        .nest("/rooms", rooms::router())
        .nest("/bookings", bookings::router())
        .nest("/reviews", reviews::router())
        .nest("/chat", chat::router())
        .nest("/ai", ai::router())
        .nest("/admin", admin::router())
}
