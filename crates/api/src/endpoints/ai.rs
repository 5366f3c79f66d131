//! AI text-generation endpoints.
//!
//! Unlike chat smart replies, these surface provider failures to the caller.

use axum::{
    Json, Router,
    extract::State,
    routing::post,
};
use serde::{Deserialize, Serialize};
use stayhub_common::{AppError, AppResult};
use stayhub_core::{
    AiService, MarketingContentInput, PricingSuggestionInput, RoomDescriptionInput,
};
use validator::Validate;

use crate::{extractors::AuthAccount, middleware::AppState, response::ApiResponse};

/// Create the AI router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/room-description", post(room_description))
        .route("/review-response", post(review_response))
        .route("/pricing-suggestion", post(pricing_suggestion))
        .route("/marketing-content", post(marketing_content))
        .route("/smart-replies", post(smart_replies))
}

fn require_ai(state: &AppState) -> AppResult<&AiService> {
    state.ai_service.as_ref().ok_or_else(|| {
        AppError::ExternalService("AI text generation is not configured".to_string())
    })
}

/// Generated text response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTextResponse {
    pub text: String,
}

/// Draft a room description.
async fn room_description(
    AuthAccount(_account): AuthAccount,
    State(state): State<AppState>,
    Json(req): Json<RoomDescriptionInput>,
) -> AppResult<ApiResponse<GeneratedTextResponse>> {
    req.validate()?;
    let text = require_ai(&state)?.room_description(&req).await?;
    Ok(ApiResponse::ok(GeneratedTextResponse { text }))
}

/// Review response request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponseRequest {
    pub review_id: String,
    #[serde(default = "default_tone")]
    pub tone: String,
}

fn default_tone() -> String {
    "professional".to_string()
}

/// Draft a response to a review.
async fn review_response(
    AuthAccount(_account): AuthAccount,
    State(state): State<AppState>,
    Json(req): Json<ReviewResponseRequest>,
) -> AppResult<ApiResponse<GeneratedTextResponse>> {
    let review = state.review_service.get(&req.review_id).await?;
    let text = require_ai(&state)?.review_response(&review, &req.tone).await?;
    Ok(ApiResponse::ok(GeneratedTextResponse { text }))
}

/// Suggest a pricing strategy for a room.
async fn pricing_suggestion(
    AuthAccount(_account): AuthAccount,
    State(state): State<AppState>,
    Json(req): Json<PricingSuggestionInput>,
) -> AppResult<ApiResponse<GeneratedTextResponse>> {
    req.validate()?;
    let room = state.room_service.get(&req.room_id).await?;
    let hotel = state.hotel_service.get(&room.hotel_id).await?;
    let text = require_ai(&state)?
        .pricing_suggestion(&room, &hotel, &req.season, req.current_price)
        .await?;
    Ok(ApiResponse::ok(GeneratedTextResponse { text }))
}

/// Draft marketing copy for a hotel.
async fn marketing_content(
    AuthAccount(_account): AuthAccount,
    State(state): State<AppState>,
    Json(req): Json<MarketingContentInput>,
) -> AppResult<ApiResponse<GeneratedTextResponse>> {
    req.validate()?;
    let hotel = state.hotel_service.get(&req.hotel_id).await?;
    let text = require_ai(&state)?
        .marketing_content(&hotel, &req.content_type, req.theme.as_deref())
        .await?;
    Ok(ApiResponse::ok(GeneratedTextResponse { text }))
}

/// Smart replies request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartRepliesRequest {
    pub message: String,
}

/// Smart replies response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartRepliesResponse {
    pub replies: Vec<String>,
}

/// Up to three short reply suggestions for a guest message.
async fn smart_replies(
    AuthAccount(_account): AuthAccount,
    State(state): State<AppState>,
    Json(req): Json<SmartRepliesRequest>,
) -> AppResult<ApiResponse<SmartRepliesResponse>> {
    let replies = require_ai(&state)?.smart_replies(&req.message).await?;
    Ok(ApiResponse::ok(SmartRepliesResponse { replies }))
}
