//! Admin endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use stayhub_common::AppResult;
use stayhub_core::PlatformAnalytics;
use stayhub_db::{entities::account, repositories::AccountFilter};

use crate::{
    endpoints::AccountResponse,
    endpoints::hotels::HotelResponse,
    extractors::AuthAccount,
    middleware::AppState,
    response::ApiResponse,
};

/// Create the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pending-approvals", get(pending_approvals))
        .route("/hotels/{id}/approve", put(approve_hotel))
        .route("/users/{id}/approve", put(approve_account))
        .route("/analytics", get(analytics))
        .route("/users", get(list_accounts))
}

/// Pending approvals response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingApprovalsResponse {
    pub hotels: Vec<PendingHotelResponse>,
    pub owners: Vec<AccountResponse>,
}

/// A hotel awaiting approval, with its owner joined.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingHotelResponse {
    #[serde(flatten)]
    pub hotel: HotelResponse,
    pub owner: Option<AccountResponse>,
}

/// Hotels and owner accounts awaiting approval.
async fn pending_approvals(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<PendingApprovalsResponse>> {
    let pending = state.admin_service.pending_approvals(&account).await?;

    Ok(ApiResponse::ok(PendingApprovalsResponse {
        hotels: pending
            .hotels
            .into_iter()
            .map(|(hotel, owner)| PendingHotelResponse {
                hotel: hotel.into(),
                owner: owner.map(AccountResponse::from),
            })
            .collect(),
        owners: pending.owners.into_iter().map(AccountResponse::from).collect(),
    }))
}

/// Approve a hotel. Idempotent.
async fn approve_hotel(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<HotelResponse>> {
    let hotel = state.hotel_service.approve(&account, &id).await?;
    Ok(ApiResponse::ok(hotel.into()))
}

/// Approve an account. Idempotent.
async fn approve_account(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<AccountResponse>> {
    let approved = state.account_service.approve(&account, &id).await?;
    Ok(ApiResponse::ok(approved.into()))
}

/// Platform analytics.
async fn analytics(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<PlatformAnalytics>> {
    let stats = state.admin_service.analytics(&account).await?;
    Ok(ApiResponse::ok(stats))
}

/// Account listing query; optional fields become explicit filter
/// conditions.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAccountsQuery {
    pub role: Option<account::Role>,
    pub is_approved: Option<bool>,
    pub is_verified: Option<bool>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    50
}

/// Accounts list response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountListResponse {
    pub count: usize,
    pub users: Vec<AccountResponse>,
}

/// List accounts behind a typed filter.
async fn list_accounts(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Query(query): Query<ListAccountsQuery>,
) -> AppResult<ApiResponse<AccountListResponse>> {
    let filter = AccountFilter {
        role: query.role,
        is_approved: query.is_approved,
        is_verified: query.is_verified,
    };

    let accounts = state
        .admin_service
        .list_accounts(&account, filter, query.limit, query.offset)
        .await?;

    let users: Vec<AccountResponse> = accounts.into_iter().map(AccountResponse::from).collect();
    Ok(ApiResponse::ok(AccountListResponse {
        count: users.len(),
        users,
    }))
}
