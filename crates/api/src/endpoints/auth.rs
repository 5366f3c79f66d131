//! Authentication endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch, post, put},
};
use serde::{Deserialize, Serialize};
use stayhub_common::AppResult;
use stayhub_core::{AuthOutcome, OAuthCallbackInput, RegisterInput, UpdateProfileInput};
use stayhub_db::entities::account;

use crate::{extractors::AuthAccount, middleware::AppState, response::ApiResponse};

/// Create the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/profile", patch(update_profile))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password/{token}", put(reset_password))
        .route("/oauth/callback", post(oauth_callback))
}

/// Public account representation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: account::Role,
    pub is_approved: bool,
    pub is_verified: bool,
    pub profile_image: Option<String>,
    pub phone: Option<String>,
}

impl From<account::Model> for AccountResponse {
    fn from(account: account::Model) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
            role: account.role,
            is_approved: account.is_approved,
            is_verified: account.is_verified,
            profile_image: account.profile_image_url,
            phone: account.phone,
        }
    }
}

/// Auth response carrying a token and approval state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: AccountResponse,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub requires_approval: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<AuthOutcome> for AuthResponse {
    fn from(outcome: AuthOutcome) -> Self {
        let message = outcome
            .approval_pending
            .then(|| "Your account is pending admin approval.".to_string());
        Self {
            token: outcome.token,
            user: outcome.account.into(),
            requires_approval: outcome.approval_pending,
            message,
        }
    }
}

/// Register a new account.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterInput>,
) -> AppResult<ApiResponse<AuthResponse>> {
    let outcome = state.account_service.register(req).await?;
    Ok(ApiResponse::ok(outcome.into()))
}

/// Login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Sign in to an existing account.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<AuthResponse>> {
    let outcome = state.account_service.login(&req.email, &req.password).await?;
    Ok(ApiResponse::ok(outcome.into()))
}

/// Logout response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub message: String,
}

/// Sign out. Tokens are stateless, so this is an acknowledgement only.
async fn logout(AuthAccount(_account): AuthAccount) -> AppResult<ApiResponse<LogoutResponse>> {
    Ok(ApiResponse::ok(LogoutResponse {
        message: "Logged out successfully".to_string(),
    }))
}

/// Current account.
async fn me(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<AccountResponse>> {
    let account = state.account_service.get(&account.id).await?;
    Ok(ApiResponse::ok(account.into()))
}

/// Update the current account's profile.
async fn update_profile(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<AccountResponse>> {
    let updated = state.account_service.update_profile(&account.id, req).await?;
    Ok(ApiResponse::ok(updated.into()))
}

/// Forgot-password request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Forgot-password acknowledgement; identical whether or not the email
/// exists.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordResponse {
    pub message: String,
}

/// Start a password reset.
async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> AppResult<ApiResponse<ForgotPasswordResponse>> {
    state.password_reset_service.forgot_password(&req.email).await?;
    Ok(ApiResponse::ok(ForgotPasswordResponse {
        message: "If an account exists with that email, a password reset link has been sent."
            .to_string(),
    }))
}

/// Reset-password request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub password: String,
}

/// Reset-password acknowledgement.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordResponse {
    pub message: String,
}

/// Redeem a reset token.
async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(req): Json<ResetPasswordRequest>,
) -> AppResult<ApiResponse<ResetPasswordResponse>> {
    state
        .password_reset_service
        .reset_password(&token, &req.password)
        .await?;
    Ok(ApiResponse::ok(ResetPasswordResponse {
        message: "Password reset successful".to_string(),
    }))
}

/// Handle an OAuth provider callback.
async fn oauth_callback(
    State(state): State<AppState>,
    Json(req): Json<OAuthCallbackInput>,
) -> AppResult<ApiResponse<AuthResponse>> {
    let outcome = state.oauth_service.callback(req).await?;
    Ok(ApiResponse::ok(outcome.into()))
}
