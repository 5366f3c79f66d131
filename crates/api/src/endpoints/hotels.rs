//! Hotel catalog endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use stayhub_common::AppResult;
use stayhub_core::{CreateHotelInput, SearchHotelsInput, UpdateHotelInput, parse_media_refs};
use stayhub_db::entities::{account, hotel};

use crate::{extractors::AuthAccount, middleware::AppState, response::ApiResponse};

/// Create the hotels router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_hotels))
        .route("/", post(create_hotel))
        .route("/search", get(search_hotels))
        .route("/my-hotels", get(my_hotels))
        .route("/{id}", get(get_hotel))
        .route("/{id}", put(update_hotel))
        .route("/{id}", delete(delete_hotel))
}

/// Hotel representation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelResponse {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: String,
    pub category: hotel::Category,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub images: Vec<stayhub_core::MediaReference>,
    pub amenities: serde_json::Value,
    pub rating: RatingResponse,
    pub is_approved: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Cached rating aggregate.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    pub average: f64,
    pub count: i32,
}

impl From<hotel::Model> for HotelResponse {
    fn from(hotel: hotel::Model) -> Self {
        Self {
            images: parse_media_refs(&hotel.images),
            id: hotel.id,
            owner_id: hotel.owner_id,
            name: hotel.name,
            description: hotel.description,
            category: hotel.category,
            address: hotel.address,
            city: hotel.city,
            state: hotel.state,
            country: hotel.country,
            zip_code: hotel.zip_code,
            latitude: hotel.latitude,
            longitude: hotel.longitude,
            amenities: hotel.amenities,
            rating: RatingResponse {
                average: hotel.rating_average,
                count: hotel.rating_count,
            },
            is_approved: hotel.is_approved,
            is_active: hotel.is_active,
            created_at: hotel.created_at.into(),
        }
    }
}

/// Hotel with owner contact details joined.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelDetailResponse {
    #[serde(flatten)]
    pub hotel: HotelResponse,
    pub owner: Option<OwnerSummary>,
}

/// Owner summary for hotel detail views.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<account::Model> for OwnerSummary {
    fn from(account: account::Model) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
        }
    }
}

/// Listing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelListResponse {
    pub count: usize,
    pub hotels: Vec<HotelResponse>,
}

/// Publicly visible hotels.
async fn list_hotels(State(state): State<AppState>) -> AppResult<ApiResponse<HotelListResponse>> {
    let hotels = state.hotel_service.list_public().await?;
    Ok(list_response(hotels))
}

/// Search publicly visible hotels.
async fn search_hotels(
    State(state): State<AppState>,
    Query(query): Query<SearchHotelsInput>,
) -> AppResult<ApiResponse<HotelListResponse>> {
    let hotels = state.hotel_service.search(query).await?;
    Ok(list_response(hotels))
}

/// The authenticated owner's hotels.
async fn my_hotels(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<HotelListResponse>> {
    let hotels = state.hotel_service.list_owned(&account.id).await?;
    Ok(list_response(hotels))
}

/// A single hotel with its owner.
async fn get_hotel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<HotelDetailResponse>> {
    let (hotel, owner) = state.hotel_service.get_with_owner(&id).await?;
    Ok(ApiResponse::ok(HotelDetailResponse {
        hotel: hotel.into(),
        owner: owner.map(OwnerSummary::from),
    }))
}

/// Create a hotel.
async fn create_hotel(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Json(req): Json<CreateHotelInput>,
) -> AppResult<ApiResponse<HotelResponse>> {
    let hotel = state.hotel_service.create(&account, req).await?;
    Ok(ApiResponse::ok(hotel.into()))
}

/// Update a hotel.
async fn update_hotel(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateHotelInput>,
) -> AppResult<ApiResponse<HotelResponse>> {
    let hotel = state.hotel_service.update(&account, &id, req).await?;
    Ok(ApiResponse::ok(hotel.into()))
}

/// Delete response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub message: String,
}

/// Delete a hotel.
async fn delete_hotel(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<DeletedResponse>> {
    state.hotel_service.delete(&account, &id).await?;
    Ok(ApiResponse::ok(DeletedResponse {
        message: "Hotel deleted".to_string(),
    }))
}

fn list_response(hotels: Vec<hotel::Model>) -> ApiResponse<HotelListResponse> {
    let hotels: Vec<HotelResponse> = hotels.into_iter().map(HotelResponse::from).collect();
    ApiResponse::ok(HotelListResponse {
        count: hotels.len(),
        hotels,
    })
}
