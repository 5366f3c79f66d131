//! Booking repository.

use std::sync::Arc;

use crate::entities::{Booking, booking};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, sea_query::Expr,
};
use stayhub_common::{AppError, AppResult};

/// Statuses that hold room inventory for the overlap test.
const INVENTORY_STATUSES: [booking::BookingStatus; 3] = [
    booking::BookingStatus::Pending,
    booking::BookingStatus::Confirmed,
    booking::BookingStatus::CheckedIn,
];

/// Typed filter for booking listings.
///
/// The service layer fills this per role: customers get `customer_id`,
/// owners get their `hotel_ids`, admins leave both empty.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub customer_id: Option<String>,
    pub hotel_ids: Option<Vec<String>>,
}

/// Booking repository for database operations.
#[derive(Clone)]
pub struct BookingRepository {
    db: Arc<DatabaseConnection>,
}

impl BookingRepository {
    /// Create a new booking repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a booking by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<booking::Model>> {
        Booking::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a booking by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<booking::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::BookingNotFound(id.to_string()))
    }

    /// Find a booking by ID inside a transaction, with a row-level lock.
    ///
    /// Used by cancellation so concurrent cancels of the same booking
    /// serialize on the idempotency check.
    pub async fn find_by_id_for_update<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<Option<booking::Model>> {
        use sea_orm::QuerySelect;

        Booking::find_by_id(id)
            .lock_exclusive()
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count inventory-holding bookings for a room whose stay overlaps the
    /// given range.
    ///
    /// The interval test is inclusive on both ends, matching the booking
    /// wire contract: `check_in <= range_end AND check_out >= range_start`.
    /// Run inside the booking transaction so the count and the subsequent
    /// insert are atomic per room.
    pub async fn count_overlapping<C: ConnectionTrait>(
        &self,
        conn: &C,
        room_id: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> AppResult<u64> {
        Booking::find()
            .filter(booking::Column::RoomId.eq(room_id))
            .filter(booking::Column::Status.is_in(INVENTORY_STATUSES))
            .filter(booking::Column::CheckIn.lte(check_out))
            .filter(booking::Column::CheckOut.gte(check_in))
            .count(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a booking, optionally inside a transaction.
    pub async fn create_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: booking::ActiveModel,
    ) -> AppResult<booking::Model> {
        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a booking.
    pub async fn update(&self, model: booking::ActiveModel) -> AppResult<booking::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a booking inside a transaction.
    pub async fn update_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: booking::ActiveModel,
    ) -> AppResult<booking::Model> {
        model
            .update(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List bookings matching a typed filter, newest first.
    pub async fn list(&self, filter: &BookingFilter) -> AppResult<Vec<booking::Model>> {
        let mut query = Booking::find().order_by_desc(booking::Column::CreatedAt);

        if let Some(ref customer_id) = filter.customer_id {
            query = query.filter(booking::Column::CustomerId.eq(customer_id));
        }
        if let Some(ref hotel_ids) = filter.hotel_ids {
            if hotel_ids.is_empty() {
                return Ok(vec![]);
            }
            query = query.filter(booking::Column::HotelId.is_in(hotel_ids.clone()));
        }

        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a customer's bookings, newest first.
    pub async fn find_by_customer(&self, customer_id: &str) -> AppResult<Vec<booking::Model>> {
        Booking::find()
            .filter(booking::Column::CustomerId.eq(customer_id))
            .order_by_desc(booking::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all bookings.
    pub async fn count(&self) -> AppResult<u64> {
        Booking::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count bookings with a given status.
    pub async fn count_by_status(&self, status: booking::BookingStatus) -> AppResult<u64> {
        Booking::find()
            .filter(booking::Column::Status.eq(status))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Sum of `total_amount` over paid bookings, in minor units.
    pub async fn paid_revenue(&self) -> AppResult<i64> {
        use sea_orm::QuerySelect;

        let total: Option<i64> = Booking::find()
            .select_only()
            .column_as(
                Expr::cust("COALESCE(SUM(total_amount), 0)::BIGINT"),
                "total",
            )
            .filter(booking::Column::PaymentStatus.eq(booking::PaymentStatus::Paid))
            .into_tuple()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(total.unwrap_or(0))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_booking(id: &str, room_id: &str) -> booking::Model {
        booking::Model {
            id: id.to_string(),
            customer_id: "cust1".to_string(),
            hotel_id: "hotel1".to_string(),
            room_id: room_id.to_string(),
            check_in: date(2025, 1, 10),
            check_out: date(2025, 1, 12),
            guests_adults: 2,
            guests_children: 0,
            total_amount: 24_000,
            currency: "USD".to_string(),
            status: booking::BookingStatus::Pending,
            payment_status: booking::PaymentStatus::Pending,
            payment_method: None,
            special_requests: None,
            cancellation_reason: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let booking = create_test_booking("booking1", "room1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[booking.clone()]])
                .into_connection(),
        );

        let repo = BookingRepository::new(db);
        let result = repo.find_by_id("booking1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().total_amount, 24_000);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<booking::Model>::new()])
                .into_connection(),
        );

        let repo = BookingRepository::new(db);
        let result = repo.get_by_id("missing").await;

        match result {
            Err(AppError::BookingNotFound(id)) => assert_eq!(id, "missing"),
            _ => panic!("Expected BookingNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_list_with_empty_hotel_ids_short_circuits() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let repo = BookingRepository::new(db);
        let filter = BookingFilter {
            customer_id: None,
            hotel_ids: Some(vec![]),
        };
        let result = repo.list(&filter).await.unwrap();

        assert!(result.is_empty());
    }
}
