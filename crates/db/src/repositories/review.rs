//! Review repository.

use std::sync::Arc;

use crate::entities::{Review, account, review};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use stayhub_common::{AppError, AppResult};

/// Review repository for database operations.
#[derive(Clone)]
pub struct ReviewRepository {
    db: Arc<DatabaseConnection>,
}

impl ReviewRepository {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a review by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<review::Model>> {
        Review::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a review by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<review::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ReviewNotFound(id.to_string()))
    }

    /// Find the review attached to a booking, if any.
    pub async fn find_by_booking(&self, booking_id: &str) -> AppResult<Option<review::Model>> {
        Review::find()
            .filter(review::Column::BookingId.eq(booking_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List published reviews for a hotel with the reviewer joined, newest
    /// first.
    pub async fn find_published_for_hotel(
        &self,
        hotel_id: &str,
    ) -> AppResult<Vec<(review::Model, Option<account::Model>)>> {
        Review::find()
            .filter(review::Column::HotelId.eq(hotel_id))
            .filter(review::Column::IsPublished.eq(true))
            .order_by_desc(review::Column::CreatedAt)
            .find_also_related(crate::entities::Account)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Overall scores of every review for a hotel (for rating recomputation).
    pub async fn find_overall_ratings(&self, hotel_id: &str) -> AppResult<Vec<i16>> {
        Review::find()
            .filter(review::Column::HotelId.eq(hotel_id))
            .select_only()
            .column(review::Column::RatingOverall)
            .into_tuple::<i16>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new review.
    pub async fn create(&self, model: review::ActiveModel) -> AppResult<review::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a review.
    pub async fn update(&self, model: review::ActiveModel) -> AppResult<review::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_review(id: &str, booking_id: &str, overall: i16) -> review::Model {
        review::Model {
            id: id.to_string(),
            customer_id: "cust1".to_string(),
            hotel_id: "hotel1".to_string(),
            booking_id: booking_id.to_string(),
            rating_overall: overall,
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

    #[tokio::test]
    async fn test_find_by_booking_found() {
        let review = create_test_review("review1", "booking1", 4);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[review.clone()]])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let result = repo.find_by_booking("booking1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().rating_overall, 4);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<review::Model>::new()])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let result = repo.get_by_id("missing").await;

        match result {
            Err(AppError::ReviewNotFound(id)) => assert_eq!(id, "missing"),
            _ => panic!("Expected ReviewNotFound error"),
        }
    }
}
