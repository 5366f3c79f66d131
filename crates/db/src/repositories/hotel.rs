//! Hotel repository.

use std::sync::Arc;

use crate::entities::{Hotel, account, hotel};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use stayhub_common::{AppError, AppResult};

/// Typed filter for public hotel search.
#[derive(Debug, Clone, Default)]
pub struct HotelSearchFilter {
    pub category: Option<hotel::Category>,
    pub city: Option<String>,
}

/// Hotel repository for database operations.
#[derive(Clone)]
pub struct HotelRepository {
    db: Arc<DatabaseConnection>,
}

impl HotelRepository {
    /// Create a new hotel repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a hotel by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<hotel::Model>> {
        Hotel::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a hotel by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<hotel::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::HotelNotFound(id.to_string()))
    }

    /// Find a hotel together with its owner account.
    pub async fn find_with_owner(
        &self,
        id: &str,
    ) -> AppResult<Option<(hotel::Model, Option<account::Model>)>> {
        Hotel::find_by_id(id)
            .find_also_related(crate::entities::Account)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List publicly visible hotels (approved and active), newest first.
    pub async fn find_public(&self) -> AppResult<Vec<hotel::Model>> {
        Hotel::find()
            .filter(hotel::Column::IsApproved.eq(true))
            .filter(hotel::Column::IsActive.eq(true))
            .order_by_desc(hotel::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Search publicly visible hotels by category and city.
    pub async fn search(&self, filter: &HotelSearchFilter) -> AppResult<Vec<hotel::Model>> {
        let mut condition = Condition::all()
            .add(hotel::Column::IsApproved.eq(true))
            .add(hotel::Column::IsActive.eq(true));

        if let Some(category) = filter.category {
            condition = condition.add(hotel::Column::Category.eq(category));
        }
        if let Some(ref city) = filter.city {
            let pattern = format!("%{}%", city.replace('%', "\\%").replace('_', "\\_"));
            condition = condition.add(hotel::Column::City.like(&pattern));
        }

        Hotel::find()
            .filter(condition)
            .order_by_desc(hotel::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List hotels belonging to an owner, newest first.
    pub async fn find_by_owner(&self, owner_id: &str) -> AppResult<Vec<hotel::Model>> {
        Hotel::find()
            .filter(hotel::Column::OwnerId.eq(owner_id))
            .order_by_desc(hotel::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List hotels still waiting for approval.
    pub async fn find_pending(&self) -> AppResult<Vec<hotel::Model>> {
        Hotel::find()
            .filter(hotel::Column::IsApproved.eq(false))
            .order_by_desc(hotel::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new hotel.
    pub async fn create(&self, model: hotel::ActiveModel) -> AppResult<hotel::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a hotel.
    pub async fn update(&self, model: hotel::ActiveModel) -> AppResult<hotel::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a hotel (hard delete).
    pub async fn delete(&self, hotel: hotel::Model) -> AppResult<()> {
        hotel
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Set the cached rating aggregate.
    pub async fn update_rating(&self, hotel_id: &str, average: f64, count: i32) -> AppResult<()> {
        let hotel = self.get_by_id(hotel_id).await?;
        let mut active: hotel::ActiveModel = hotel.into();
        active.rating_average = Set(average);
        active.rating_count = Set(count);
        active.updated_at = Set(Some(chrono::Utc::now().into()));
        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count all hotels.
    pub async fn count(&self) -> AppResult<u64> {
        Hotel::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count approved hotels.
    pub async fn count_approved(&self) -> AppResult<u64> {
        Hotel::find()
            .filter(hotel::Column::IsApproved.eq(true))
            .count(self.db.as_ref())
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

    fn create_test_hotel(id: &str, owner_id: &str) -> hotel::Model {
        hotel::Model {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            name: "Harbor View".to_string(),
            description: "Waterfront rooms".to_string(),
            category: hotel::Category::Boutique,
            address: "1 Pier Rd".to_string(),
            city: "Portsmouth".to_string(),
            state: "NH".to_string(),
            country: "US".to_string(),
            zip_code: None,
            latitude: None,
            longitude: None,
            images: serde_json::json!([]),
            amenities: serde_json::json!([]),
            rating_average: 0.0,
            rating_count: 0,
            is_approved: true,
            is_active: true,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_public() {
        let hotel1 = create_test_hotel("hotel1", "owner1");
        let hotel2 = create_test_hotel("hotel2", "owner1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[hotel1, hotel2]])
                .into_connection(),
        );

        let repo = HotelRepository::new(db);
        let result = repo.find_public().await.unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<hotel::Model>::new()])
                .into_connection(),
        );

        let repo = HotelRepository::new(db);
        let result = repo.get_by_id("missing").await;

        match result {
            Err(AppError::HotelNotFound(id)) => assert_eq!(id, "missing"),
            _ => panic!("Expected HotelNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_search_by_city() {
        let hotel = create_test_hotel("hotel1", "owner1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[hotel]])
                .into_connection(),
        );

        let repo = HotelRepository::new(db);
        let filter = HotelSearchFilter {
            category: None,
            city: Some("Portsmouth".to_string()),
        };
        let result = repo.search(&filter).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].city, "Portsmouth");
    }
}
