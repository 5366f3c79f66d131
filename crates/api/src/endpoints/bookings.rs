//! Booking endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use stayhub_common::AppResult;
use stayhub_core::{CreateBookingInput, UpdateBookingInput};
use stayhub_db::entities::booking;

use crate::{extractors::AuthAccount, middleware::AppState, response::ApiResponse};

/// Create the bookings router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bookings))
        .route("/", post(create_booking))
        .route("/my-bookings", get(my_bookings))
        .route("/{id}", get(get_booking))
        .route("/{id}", put(update_booking))
        .route("/{id}/cancel", put(cancel_booking))
}

/// Booking representation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: String,
    pub customer_id: String,
    pub hotel_id: String,
    pub room_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: GuestsResponse,
    /// Snapshotted total in minor units.
    pub total_amount: i64,
    pub currency: String,
    pub status: booking::BookingStatus,
    pub payment_status: booking::PaymentStatus,
    pub payment_method: Option<booking::PaymentMethod>,
    pub special_requests: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Guest counts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestsResponse {
    pub adults: i32,
    pub children: i32,
}

impl From<booking::Model> for BookingResponse {
    fn from(booking: booking::Model) -> Self {
        Self {
            id: booking.id,
            customer_id: booking.customer_id,
            hotel_id: booking.hotel_id,
            room_id: booking.room_id,
            check_in: booking.check_in,
            check_out: booking.check_out,
            guests: GuestsResponse {
                adults: booking.guests_adults,
                children: booking.guests_children,
            },
            total_amount: booking.total_amount,
            currency: booking.currency,
            status: booking.status,
            payment_status: booking.payment_status,
            payment_method: booking.payment_method,
            special_requests: booking.special_requests,
            cancellation_reason: booking.cancellation_reason,
            created_at: booking.created_at.into(),
        }
    }
}

/// Listing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListResponse {
    pub count: usize,
    pub bookings: Vec<BookingResponse>,
}

/// Bookings visible to the actor: own bookings for customers, their hotels'
/// bookings for owners, everything for admins.
async fn list_bookings(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<BookingListResponse>> {
    let bookings = state.booking_service.list_for(&account).await?;
    Ok(list_response(bookings))
}

/// The actor's own bookings.
async fn my_bookings(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<BookingListResponse>> {
    let bookings = state.booking_service.list_own(&account.id).await?;
    Ok(list_response(bookings))
}

/// A single booking.
async fn get_booking(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<BookingResponse>> {
    let booking = state.booking_service.get(&account, &id).await?;
    Ok(ApiResponse::ok(booking.into()))
}

/// Create a booking.
async fn create_booking(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Json(req): Json<CreateBookingInput>,
) -> AppResult<ApiResponse<BookingResponse>> {
    let booking = state.booking_service.create(&account, req).await?;
    Ok(ApiResponse::ok(booking.into()))
}

/// Patch status and payment fields.
async fn update_booking(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateBookingInput>,
) -> AppResult<ApiResponse<BookingResponse>> {
    let booking = state.booking_service.update(&account, &id, req).await?;
    Ok(ApiResponse::ok(booking.into()))
}

/// Cancel request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingRequest {
    pub reason: Option<String>,
}

/// Cancel a booking. Idempotent.
async fn cancel_booking(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CancelBookingRequest>,
) -> AppResult<ApiResponse<BookingResponse>> {
    let booking = state.booking_service.cancel(&account, &id, req.reason).await?;
    Ok(ApiResponse::ok(booking.into()))
}

fn list_response(bookings: Vec<booking::Model>) -> ApiResponse<BookingListResponse> {
    let bookings: Vec<BookingResponse> = bookings.into_iter().map(BookingResponse::from).collect();
    ApiResponse::ok(BookingListResponse {
        count: bookings.len(),
        bookings,
    })
}
