//! Review service and rating aggregation.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use stayhub_common::{AppError, AppResult, IdGenerator};
use stayhub_db::{
    entities::{
        account::{self, Role},
        review::{self, ResponseTone},
    },
    repositories::{BookingRepository, HotelRepository, ReviewRepository},
};
use validator::Validate;

/// Input for creating a review.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewInput {
    pub booking_id: String,

    #[validate(range(min = 1, max = 5))]
    pub rating_overall: i16,

    #[validate(range(min = 1, max = 5))]
    pub rating_cleanliness: Option<i16>,

    #[validate(range(min = 1, max = 5))]
    pub rating_service: Option<i16>,

    #[validate(range(min = 1, max = 5))]
    pub rating_value: Option<i16>,

    #[validate(range(min = 1, max = 5))]
    pub rating_location: Option<i16>,

    #[validate(length(min = 1, max = 4096))]
    pub comment: String,
}

/// Input for updating a review. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewInput {
    #[validate(range(min = 1, max = 5))]
    pub rating_overall: Option<i16>,

    #[validate(range(min = 1, max = 5))]
    pub rating_cleanliness: Option<i16>,

    #[validate(range(min = 1, max = 5))]
    pub rating_service: Option<i16>,

    #[validate(range(min = 1, max = 5))]
    pub rating_value: Option<i16>,

    #[validate(range(min = 1, max = 5))]
    pub rating_location: Option<i16>,

    #[validate(length(min = 1, max = 4096))]
    pub comment: Option<String>,
}

/// Input for an owner response.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RespondToReviewInput {
    #[validate(length(min = 1, max = 4096))]
    pub text: String,

    pub tone: Option<ResponseTone>,

    /// Set when the response text came from the AI draft endpoint.
    #[serde(default)]
    pub generated_by_ai: bool,
}

/// Review service.
#[derive(Clone)]
pub struct ReviewService {
    review_repo: ReviewRepository,
    booking_repo: BookingRepository,
    hotel_repo: HotelRepository,
    id_gen: IdGenerator,
}

impl ReviewService {
    /// Create a new review service.
    #[must_use]
    pub fn new(
        review_repo: ReviewRepository,
        booking_repo: BookingRepository,
        hotel_repo: HotelRepository,
    ) -> Self {
        Self {
            review_repo,
            booking_repo,
            hotel_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Published reviews for a hotel with the reviewer joined.
    pub async fn list_for_hotel(
        &self,
        hotel_id: &str,
    ) -> AppResult<Vec<(review::Model, Option<account::Model>)>> {
        self.review_repo.find_published_for_hotel(hotel_id).await
    }

    /// Get a review by ID.
    pub async fn get(&self, id: &str) -> AppResult<review::Model> {
        self.review_repo.get_by_id(id).await
    }

    /// Create a review for a booking the customer owns.
    ///
    /// At most one review may exist per booking; a duplicate is a conflict
    /// no matter who submits it.
    pub async fn create(
        &self,
        customer: &account::Model,
        input: CreateReviewInput,
    ) -> AppResult<review::Model> {
        input.validate()?;

        let booking = self.booking_repo.get_by_id(&input.booking_id).await?;
        if booking.customer_id != customer.id {
            return Err(AppError::Forbidden(
                "Not authorized to review this booking".to_string(),
            ));
        }

        if self
            .review_repo
            .find_by_booking(&input.booking_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Review already exists for this booking".to_string(),
            ));
        }

        let model = review::ActiveModel {
            id: Set(self.id_gen.generate()),
            customer_id: Set(customer.id.clone()),
            hotel_id: Set(booking.hotel_id.clone()),
            booking_id: Set(input.booking_id),
            rating_overall: Set(input.rating_overall),
            rating_cleanliness: Set(input.rating_cleanliness),
            rating_service: Set(input.rating_service),
            rating_value: Set(input.rating_value),
            rating_location: Set(input.rating_location),
            comment: Set(input.comment),
            is_verified: Set(true),
            is_published: Set(true),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let review = self.review_repo.create(model).await?;
        self.recompute_hotel_rating(&review.hotel_id).await?;

        tracing::info!(review_id = %review.id, hotel_id = %review.hotel_id, "Review created");
        Ok(review)
    }

    /// Update a review. Only the authoring customer.
    pub async fn update(
        &self,
        customer: &account::Model,
        review_id: &str,
        input: UpdateReviewInput,
    ) -> AppResult<review::Model> {
        input.validate()?;

        let review = self.review_repo.get_by_id(review_id).await?;
        if review.customer_id != customer.id {
            return Err(AppError::Forbidden(
                "Not authorized to update this review".to_string(),
            ));
        }

        let hotel_id = review.hotel_id.clone();
        let mut active: review::ActiveModel = review.into();

        if let Some(rating_overall) = input.rating_overall {
            active.rating_overall = Set(rating_overall);
        }
        if let Some(rating_cleanliness) = input.rating_cleanliness {
            active.rating_cleanliness = Set(Some(rating_cleanliness));
        }
        if let Some(rating_service) = input.rating_service {
            active.rating_service = Set(Some(rating_service));
        }
        if let Some(rating_value) = input.rating_value {
            active.rating_value = Set(Some(rating_value));
        }
        if let Some(rating_location) = input.rating_location {
            active.rating_location = Set(Some(rating_location));
        }
        if let Some(comment) = input.comment {
            active.comment = Set(comment);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.review_repo.update(active).await?;
        self.recompute_hotel_rating(&hotel_id).await?;
        Ok(updated)
    }

    /// Attach an owner response. Hotel owner or admin; overwrites any prior
    /// response with a server-assigned timestamp.
    pub async fn respond(
        &self,
        actor: &account::Model,
        review_id: &str,
        input: RespondToReviewInput,
    ) -> AppResult<review::Model> {
        input.validate()?;

        let review = self.review_repo.get_by_id(review_id).await?;
        let hotel = self.hotel_repo.get_by_id(&review.hotel_id).await?;

        if actor.role != Role::Admin && hotel.owner_id != actor.id {
            return Err(AppError::Forbidden(
                "Not authorized to respond to this review".to_string(),
            ));
        }

        let mut active: review::ActiveModel = review.into();
        active.response_text = Set(Some(input.text));
        active.response_tone = Set(input.tone);
        active.response_generated_by_ai = Set(input.generated_by_ai);
        active.responded_at = Set(Some(Utc::now().into()));
        active.updated_at = Set(Some(Utc::now().into()));

        self.review_repo.update(active).await
    }

    /// Recompute the hotel's cached rating aggregate from all its reviews.
    ///
    /// Skipped when the review set is empty; the prior aggregate stays.
    async fn recompute_hotel_rating(&self, hotel_id: &str) -> AppResult<()> {
        let ratings = self.review_repo.find_overall_ratings(hotel_id).await?;
        if ratings.is_empty() {
            return Ok(());
        }

        let average = mean_rounded_1dp(&ratings);
        self.hotel_repo
            .update_rating(hotel_id, average, ratings.len() as i32)
            .await
    }
}

/// Mean of the scores, rounded to one decimal place.
#[must_use]
pub fn mean_rounded_1dp(ratings: &[i16]) -> f64 {
    let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    let mean = sum as f64 / ratings.len() as f64;
    (mean * 10.0).round() / 10.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;
    use stayhub_db::entities::booking;

    fn test_customer(id: &str) -> account::Model {
        account::Model {
            id: id.to_string(),
            name: "Test Customer".to_string(),
            email: "cust@example.com".to_string(),
            email_lower: "cust@example.com".to_string(),
            password_hash: None,
            role: Role::Customer,
            oauth_provider: None,
            oauth_id: None,
            is_verified: true,
            is_approved: true,
            profile_image_url: None,
            phone: None,
            reset_token_hash: None,
            reset_token_expires_at: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_booking(customer_id: &str) -> booking::Model {
        booking::Model {
            id: "booking1".to_string(),
            customer_id: customer_id.to_string(),
            hotel_id: "hotel1".to_string(),
            room_id: "room1".to_string(),
            check_in: chrono::NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            check_out: chrono::NaiveDate::from_ymd_opt(2025, 1, 12).unwrap(),
            guests_adults: 2,
            guests_children: 0,
            total_amount: 24_000,
            currency: "USD".to_string(),
            status: booking::BookingStatus::CheckedOut,
            payment_status: booking::PaymentStatus::Paid,
            payment_method: None,
            special_requests: None,
            cancellation_reason: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn existing_review() -> review::Model {
        review::Model {
            id: "review1".to_string(),
            customer_id: "cust1".to_string(),
            hotel_id: "hotel1".to_string(),
            booking_id: "booking1".to_string(),
            rating_overall: 4,
            rating_cleanliness: None,
            rating_service: None,
            rating_value: None,
            rating_location: None,
            comment: "Lovely stay".to_string(),
            response_text: None,
            response_tone: None,
            response_generated_by_ai: false,
            responded_at: None,
            is_verified: true,
            is_published: true,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service(db: sea_orm::DatabaseConnection) -> ReviewService {
        let db = Arc::new(db);
        ReviewService::new(
            ReviewRepository::new(Arc::clone(&db)),
            BookingRepository::new(Arc::clone(&db)),
            HotelRepository::new(db),
        )
    }

    fn create_input() -> CreateReviewInput {
        CreateReviewInput {
            booking_id: "booking1".to_string(),
            rating_overall: 5,
            rating_cleanliness: None,
            rating_service: None,
            rating_value: None,
            rating_location: None,
            comment: "Great location".to_string(),
        }
    }

    #[tokio::test]
    async fn test_second_review_for_same_booking_conflicts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![test_booking("cust1")]])
            .append_query_results([vec![existing_review()]])
            .into_connection();

        let result = service(db).create(&test_customer("cust1"), create_input()).await;

        match result {
            Err(AppError::Conflict(message)) => {
                assert_eq!(message, "Review already exists for this booking");
            }
            other => panic!("Expected Conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reviewing_someone_elses_booking_is_forbidden() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![test_booking("cust1")]])
            .into_connection();

        let result = service(db).create(&test_customer("other"), create_input()).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[test]
    fn test_mean_of_uniform_scores() {
        assert_eq!(mean_rounded_1dp(&[4, 4, 4]), 4.0);
    }

    #[test]
    fn test_mean_rounds_to_one_decimal() {
        // (5 + 4 + 4) / 3 = 4.333... -> 4.3
        assert_eq!(mean_rounded_1dp(&[5, 4, 4]), 4.3);
        // (5 + 4) / 2 = 4.5
        assert_eq!(mean_rounded_1dp(&[5, 4]), 4.5);
        // (5 + 5 + 4) / 3 = 4.666... -> 4.7
        assert_eq!(mean_rounded_1dp(&[5, 5, 4]), 4.7);
    }

    #[test]
    fn test_adding_a_review_shifts_the_mean() {
        let before = mean_rounded_1dp(&[3, 5]);
        let after = mean_rounded_1dp(&[3, 5, 5]);
        assert_eq!(before, 4.0);
        assert_eq!(after, 4.3);
    }
}
