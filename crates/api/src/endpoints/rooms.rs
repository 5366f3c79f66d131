//! Room catalog endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post, put},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use stayhub_common::AppResult;
use stayhub_core::{CreateRoomInput, UpdateRoomInput, parse_media_refs};
use stayhub_db::entities::room;

use crate::{extractors::AuthAccount, middleware::AppState, response::ApiResponse};

/// Create the rooms router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rooms))
        .route("/", post(create_room))
        .route("/hotel/{hotel_id}", get(rooms_by_hotel))
        .route("/{id}", get(get_room))
        .route("/{id}", put(update_room))
        .route("/{id}", delete(delete_room))
}

/// Room representation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub id: String,
    pub hotel_id: String,
    pub name: String,
    pub description: String,
    pub room_type: room::RoomType,
    pub price: PriceResponse,
    pub capacity: CapacityResponse,
    pub images: Vec<stayhub_core::MediaReference>,
    pub amenities: serde_json::Value,
    pub quantity: i32,
    pub available: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Nightly price.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceResponse {
    /// Minor currency units.
    pub base: i64,
    pub currency: String,
}

/// Guest capacity.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityResponse {
    pub adults: i32,
    pub children: i32,
}

impl From<room::Model> for RoomResponse {
    fn from(room: room::Model) -> Self {
        Self {
            images: parse_media_refs(&room.images),
            id: room.id,
            hotel_id: room.hotel_id,
            name: room.name,
            description: room.description,
            room_type: room.room_type,
            price: PriceResponse {
                base: room.price_base,
                currency: room.price_currency,
            },
            capacity: CapacityResponse {
                adults: room.capacity_adults,
                children: room.capacity_children,
            },
            amenities: room.amenities,
            quantity: room.quantity,
            available: room.available,
            is_active: room.is_active,
            created_at: room.created_at.into(),
        }
    }
}

/// Listing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomListResponse {
    pub count: usize,
    pub rooms: Vec<RoomResponse>,
}

/// All active rooms.
async fn list_rooms(State(state): State<AppState>) -> AppResult<ApiResponse<RoomListResponse>> {
    let rooms = state.room_service.list_active().await?;
    Ok(list_response(rooms))
}

/// Active rooms for a hotel.
async fn rooms_by_hotel(
    State(state): State<AppState>,
    Path(hotel_id): Path<String>,
) -> AppResult<ApiResponse<RoomListResponse>> {
    let rooms = state.room_service.list_by_hotel(&hotel_id).await?;
    Ok(list_response(rooms))
}

/// A single room.
async fn get_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<RoomResponse>> {
    let room = state.room_service.get(&id).await?;
    Ok(ApiResponse::ok(room.into()))
}

/// Create a room.
async fn create_room(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Json(req): Json<CreateRoomInput>,
) -> AppResult<ApiResponse<RoomResponse>> {
    let room = state.room_service.create(&account, req).await?;
    Ok(ApiResponse::ok(room.into()))
}

/// Update a room.
async fn update_room(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateRoomInput>,
) -> AppResult<ApiResponse<RoomResponse>> {
    let room = state.room_service.update(&account, &id, req).await?;
    Ok(ApiResponse::ok(room.into()))
}

/// Delete response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub message: String,
}

/// Delete a room.
async fn delete_room(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<DeletedResponse>> {
    state.room_service.delete(&account, &id).await?;
    Ok(ApiResponse::ok(DeletedResponse {
        message: "Room deleted".to_string(),
    }))
}

fn list_response(rooms: Vec<room::Model>) -> ApiResponse<RoomListResponse> {
    let rooms: Vec<RoomResponse> = rooms.into_iter().map(RoomResponse::from).collect();
    ApiResponse::ok(RoomListResponse {
        count: rooms.len(),
        rooms,
    })
}
