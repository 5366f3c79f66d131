//! Room repository.

use std::sync::Arc;

use crate::entities::{Room, room};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, sea_query::Expr,
};
use stayhub_common::{AppError, AppResult};

/// Room repository for database operations.
#[derive(Clone)]
pub struct RoomRepository {
    db: Arc<DatabaseConnection>,
}

impl RoomRepository {
    /// Create a new room repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a room by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<room::Model>> {
        Room::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a room by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<room::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::RoomNotFound(id.to_string()))
    }

    /// Find a room by ID with a row-level exclusive lock.
    ///
    /// Must run inside a transaction; the lock serializes concurrent booking
    /// attempts against the same room until the transaction ends.
    pub async fn find_by_id_for_update<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<Option<room::Model>> {
        Room::find_by_id(id)
            .lock_exclusive()
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List active rooms, newest first.
    pub async fn find_active(&self) -> AppResult<Vec<room::Model>> {
        Room::find()
            .filter(room::Column::IsActive.eq(true))
            .order_by_desc(room::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List active rooms for a hotel.
    pub async fn find_by_hotel(&self, hotel_id: &str) -> AppResult<Vec<room::Model>> {
        Room::find()
            .filter(room::Column::HotelId.eq(hotel_id))
            .filter(room::Column::IsActive.eq(true))
            .order_by_desc(room::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new room.
    pub async fn create(&self, model: room::ActiveModel) -> AppResult<room::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a room.
    pub async fn update(&self, model: room::ActiveModel) -> AppResult<room::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a room (hard delete).
    pub async fn delete(&self, room: room::Model) -> AppResult<()> {
        room.delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Decrement the cached `available` counter, clamped at zero.
    ///
    /// Single UPDATE, usable inside the booking transaction.
    pub async fn decrement_available<C: ConnectionTrait>(
        &self,
        conn: &C,
        room_id: &str,
    ) -> AppResult<()> {
        Room::update_many()
            .col_expr(
                room::Column::Available,
                Expr::cust("GREATEST(available - 1, 0)"),
            )
            .filter(room::Column::Id.eq(room_id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Increment the cached `available` counter, clamped at `quantity`.
    pub async fn increment_available<C: ConnectionTrait>(
        &self,
        conn: &C,
        room_id: &str,
    ) -> AppResult<()> {
        Room::update_many()
            .col_expr(
                room::Column::Available,
                Expr::cust("LEAST(available + 1, quantity)"),
            )
            .filter(room::Column::Id.eq(room_id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_room(id: &str, hotel_id: &str) -> room::Model {
        room::Model {
            id: id.to_string(),
            hotel_id: hotel_id.to_string(),
            name: "Garden Double".to_string(),
            description: "Ground floor double".to_string(),
            room_type: room::RoomType::Double,
            price_base: 12_000,
            price_currency: "USD".to_string(),
            capacity_adults: 2,
            capacity_children: 1,
            images: serde_json::json!([]),
            amenities: serde_json::json!([]),
            quantity: 4,
            available: 4,
            is_active: true,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let room = create_test_room("room1", "hotel1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[room.clone()]])
                .into_connection(),
        );

        let repo = RoomRepository::new(db);
        let result = repo.find_by_id("room1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().price_base, 12_000);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<room::Model>::new()])
                .into_connection(),
        );

        let repo = RoomRepository::new(db);
        let result = repo.get_by_id("missing").await;

        match result {
            Err(AppError::RoomNotFound(id)) => assert_eq!(id, "missing"),
            _ => panic!("Expected RoomNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_decrement_available_executes_update() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = RoomRepository::new(Arc::clone(&db));
        repo.decrement_available(db.as_ref(), "room1").await.unwrap();
    }
}
