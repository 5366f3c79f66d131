//! Review endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use stayhub_common::AppResult;
use stayhub_core::{CreateReviewInput, RespondToReviewInput, UpdateReviewInput};
use stayhub_db::entities::{account, review};

use crate::{extractors::AuthAccount, middleware::AppState, response::ApiResponse};

/// Create the reviews router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_review))
        .route("/hotel/{hotel_id}", get(reviews_for_hotel))
        .route("/{id}", get(get_review))
        .route("/{id}", put(update_review))
        .route("/{id}/respond", post(respond_to_review))
}

/// Review representation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: String,
    pub hotel_id: String,
    pub booking_id: String,
    pub rating: RatingBreakdown,
    pub comment: String,
    pub customer: Option<ReviewerSummary>,
    pub owner_response: Option<OwnerResponseBody>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Per-dimension scores.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingBreakdown {
    pub overall: i16,
    pub cleanliness: Option<i16>,
    pub service: Option<i16>,
    pub value: Option<i16>,
    pub location: Option<i16>,
}

/// Reviewer summary joined onto listings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerSummary {
    pub id: String,
    pub name: String,
    pub profile_image: Option<String>,
}

/// Owner response attached to a review.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerResponseBody {
    pub text: String,
    pub tone: Option<review::ResponseTone>,
    pub generated_by_ai: bool,
    pub responded_at: Option<DateTime<Utc>>,
}

impl ReviewResponse {
    fn from_parts(review: review::Model, customer: Option<account::Model>) -> Self {
        let owner_response = review.response_text.clone().map(|text| OwnerResponseBody {
            text,
            tone: review.response_tone,
            generated_by_ai: review.response_generated_by_ai,
            responded_at: review.responded_at.map(Into::into),
        });

        Self {
            id: review.id,
            hotel_id: review.hotel_id,
            booking_id: review.booking_id,
            rating: RatingBreakdown {
                overall: review.rating_overall,
                cleanliness: review.rating_cleanliness,
                service: review.rating_service,
                value: review.rating_value,
                location: review.rating_location,
            },
            comment: review.comment,
            customer: customer.map(|c| ReviewerSummary {
                id: c.id,
                name: c.name,
                profile_image: c.profile_image_url,
            }),
            owner_response,
            is_verified: review.is_verified,
            created_at: review.created_at.into(),
        }
    }
}

impl From<review::Model> for ReviewResponse {
    fn from(review: review::Model) -> Self {
        Self::from_parts(review, None)
    }
}

/// Listing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListResponse {
    pub count: usize,
    pub reviews: Vec<ReviewResponse>,
}

/// Published reviews for a hotel, with reviewers joined.
async fn reviews_for_hotel(
    State(state): State<AppState>,
    Path(hotel_id): Path<String>,
) -> AppResult<ApiResponse<ReviewListResponse>> {
    let reviews = state.review_service.list_for_hotel(&hotel_id).await?;
    let reviews: Vec<ReviewResponse> = reviews
        .into_iter()
        .map(|(review, customer)| ReviewResponse::from_parts(review, customer))
        .collect();

    Ok(ApiResponse::ok(ReviewListResponse {
        count: reviews.len(),
        reviews,
    }))
}

/// A single review.
async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ReviewResponse>> {
    let review = state.review_service.get(&id).await?;
    Ok(ApiResponse::ok(review.into()))
}

/// Create a review for a booking the actor owns.
async fn create_review(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Json(req): Json<CreateReviewInput>,
) -> AppResult<ApiResponse<ReviewResponse>> {
    let review = state.review_service.create(&account, req).await?;
    Ok(ApiResponse::ok(review.into()))
}

/// Update a review (authoring customer only).
async fn update_review(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateReviewInput>,
) -> AppResult<ApiResponse<ReviewResponse>> {
    let review = state.review_service.update(&account, &id, req).await?;
    Ok(ApiResponse::ok(review.into()))
}

/// Attach an owner response (hotel owner or admin).
async fn respond_to_review(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RespondToReviewInput>,
) -> AppResult<ApiResponse<ReviewResponse>> {
    let review = state.review_service.respond(&account, &id, req).await?;
    Ok(ApiResponse::ok(review.into()))
}
