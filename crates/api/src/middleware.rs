//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use stayhub_core::{
    AccountService, AdminService, AiService, BookingService, ChatService, HotelService,
    OAuthService, PasswordResetService, ReviewService, RoomService,
};

use crate::streaming::ChatStreamState;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub oauth_service: OAuthService,
    pub password_reset_service: PasswordResetService,
    pub hotel_service: HotelService,
    pub room_service: RoomService,
    pub booking_service: BookingService,
    pub review_service: ReviewService,
    pub chat_service: ChatService,
    pub admin_service: AdminService,
    pub ai_service: Option<AiService>,
    pub streaming: ChatStreamState,
}

/// Authentication middleware.
///
/// Verifies a bearer JWT and stashes the account in request extensions;
/// endpoints that require auth pull it out via the `AuthAccount` extractor.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(account) = state.account_service.authenticate_token(token).await
    {
        req.extensions_mut().insert(account);
    }

    next.run(req).await
}
