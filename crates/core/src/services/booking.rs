//! Reservation engine.
//!
//! Admission is decided by the overlap count against the room's `quantity`
//! inside a transaction holding a row-level lock on the room, so two
//! concurrent requests for the same room cannot both observe capacity when
//! only one unit remains. The room's `available` column is a denormalized
//! display counter maintained alongside, never consulted for admission.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sea_orm::{DatabaseConnection, Set, TransactionTrait};
use serde::Deserialize;
use stayhub_common::{AppError, AppResult, IdGenerator};
use stayhub_db::{
    entities::{
        account::{self, Role},
        booking::{self, BookingStatus, PaymentMethod, PaymentStatus},
    },
    repositories::{BookingFilter, BookingRepository, HotelRepository, RoomRepository},
};
use validator::Validate;

/// Input for creating a booking.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingInput {
    pub room_id: String,

    pub check_in: NaiveDate,

    pub check_out: NaiveDate,

    #[validate(range(min = 1))]
    pub guests_adults: i32,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub guests_children: i32,

    #[validate(length(max = 2048))]
    pub special_requests: Option<String>,
}

/// Status and payment patch applied by the hotel owner or an admin.
///
/// Does not re-run availability logic; status changes must follow the
/// booking state machine.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingInput {
    pub status: Option<BookingStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub payment_method: Option<PaymentMethod>,
}

/// Reservation engine.
#[derive(Clone)]
pub struct BookingService {
    db: Arc<DatabaseConnection>,
    booking_repo: BookingRepository,
    room_repo: RoomRepository,
    hotel_repo: HotelRepository,
    id_gen: IdGenerator,
}

impl BookingService {
    /// Create a new booking service.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        booking_repo: BookingRepository,
        room_repo: RoomRepository,
        hotel_repo: HotelRepository,
    ) -> Self {
        Self {
            db,
            booking_repo,
            room_repo,
            hotel_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a booking with an atomic capacity check.
    pub async fn create(
        &self,
        customer: &account::Model,
        input: CreateBookingInput,
    ) -> AppResult<booking::Model> {
        input.validate()?;

        if input.check_in >= input.check_out {
            return Err(AppError::Validation(
                "checkIn must be before checkOut".to_string(),
            ));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Row lock on the room serializes concurrent bookings for it until
        // commit; the overlap count and the insert are one atomic step.
        let room = self
            .room_repo
            .find_by_id_for_update(&txn, &input.room_id)
            .await?
            .filter(|r| r.is_active)
            .ok_or_else(|| AppError::RoomNotFound(input.room_id.clone()))?;

        let overlapping = self
            .booking_repo
            .count_overlapping(&txn, &room.id, input.check_in, input.check_out)
            .await?;

        if overlapping >= room.quantity as u64 {
            return Err(AppError::Conflict(
                "Room not available for selected dates".to_string(),
            ));
        }

        let nights = (input.check_out - input.check_in).num_days();
        let total_amount = stay_total(input.check_in, input.check_out, room.price_base);

        let model = booking::ActiveModel {
            id: Set(self.id_gen.generate()),
            customer_id: Set(customer.id.clone()),
            hotel_id: Set(room.hotel_id.clone()),
            room_id: Set(room.id.clone()),
            check_in: Set(input.check_in),
            check_out: Set(input.check_out),
            guests_adults: Set(input.guests_adults),
            guests_children: Set(input.guests_children),
            total_amount: Set(total_amount),
            currency: Set(room.price_currency.clone()),
            status: Set(BookingStatus::Pending),
            payment_status: Set(PaymentStatus::Pending),
            special_requests: Set(input.special_requests),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let booking = self.booking_repo.create_in(&txn, model).await?;
        self.room_repo.decrement_available(&txn, &room.id).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(
            booking_id = %booking.id,
            room_id = %booking.room_id,
            nights = nights,
            total_amount = total_amount,
            "Booking created"
        );

        Ok(booking)
    }

    /// Get a booking, visible to its customer, the hotel owner, or an admin.
    pub async fn get(
        &self,
        actor: &account::Model,
        booking_id: &str,
    ) -> AppResult<booking::Model> {
        let booking = self.booking_repo.get_by_id(booking_id).await?;
        self.ensure_booking_party(actor, &booking, "view this booking")
            .await?;
        Ok(booking)
    }

    /// List bookings scoped by role: customers their own, owners their
    /// hotels', admins everything.
    pub async fn list_for(&self, actor: &account::Model) -> AppResult<Vec<booking::Model>> {
        let filter = match actor.role {
            Role::Customer => BookingFilter {
                customer_id: Some(actor.id.clone()),
                hotel_ids: None,
            },
            Role::HotelOwner => {
                let hotel_ids = self
                    .hotel_repo
                    .find_by_owner(&actor.id)
                    .await?
                    .into_iter()
                    .map(|h| h.id)
                    .collect();
                BookingFilter {
                    customer_id: None,
                    hotel_ids: Some(hotel_ids),
                }
            }
            Role::Admin => BookingFilter::default(),
        };

        self.booking_repo.list(&filter).await
    }

    /// List the actor's own bookings.
    pub async fn list_own(&self, customer_id: &str) -> AppResult<Vec<booking::Model>> {
        self.booking_repo.find_by_customer(customer_id).await
    }

    /// Cancel a booking.
    ///
    /// Idempotent: cancelling an already-cancelled booking returns the
    /// current state without touching the inventory counter. The booking row
    /// lock serializes concurrent cancels, so `available` is incremented
    /// exactly once.
    pub async fn cancel(
        &self,
        actor: &account::Model,
        booking_id: &str,
        reason: Option<String>,
    ) -> AppResult<booking::Model> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let booking = self
            .booking_repo
            .find_by_id_for_update(&txn, booking_id)
            .await?
            .ok_or_else(|| AppError::BookingNotFound(booking_id.to_string()))?;

        self.ensure_booking_party(actor, &booking, "cancel this booking")
            .await?;

        if booking.status == BookingStatus::Cancelled {
            txn.commit()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Ok(booking);
        }

        if booking.status == BookingStatus::CheckedOut {
            return Err(AppError::Validation(
                "Cannot cancel a completed booking".to_string(),
            ));
        }

        let room_id = booking.room_id.clone();
        let mut active: booking::ActiveModel = booking.into();
        active.status = Set(BookingStatus::Cancelled);
        active.cancellation_reason = Set(reason);
        active.updated_at = Set(Some(Utc::now().into()));

        let cancelled = self.booking_repo.update_in(&txn, active).await?;
        self.room_repo.increment_available(&txn, &room_id).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(booking_id = %cancelled.id, actor_id = %actor.id, "Booking cancelled");
        Ok(cancelled)
    }

    /// Patch status and payment fields. Hotel owner or admin only.
    pub async fn update(
        &self,
        actor: &account::Model,
        booking_id: &str,
        input: UpdateBookingInput,
    ) -> AppResult<booking::Model> {
        let booking = self.booking_repo.get_by_id(booking_id).await?;
        let hotel = self.hotel_repo.get_by_id(&booking.hotel_id).await?;

        if actor.role != Role::Admin && actor.id != hotel.owner_id {
            return Err(AppError::Forbidden(
                "Not authorized to update this booking".to_string(),
            ));
        }

        if let Some(next) = input.status {
            if !booking.status.can_transition_to(next) {
                return Err(AppError::Validation(format!(
                    "Cannot move booking from {:?} to {:?}",
                    booking.status, next
                )));
            }

            // Cancellation through the patch path restores inventory the
            // same way an explicit cancel does.
            if next == BookingStatus::Cancelled {
                let cancelled = self.cancel(actor, booking_id, None).await?;
                return self.apply_payment_patch(cancelled, input).await;
            }
        }

        let mut active: booking::ActiveModel = booking.into();
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        if let Some(payment_status) = input.payment_status {
            active.payment_status = Set(payment_status);
        }
        if let Some(payment_method) = input.payment_method {
            active.payment_method = Set(Some(payment_method));
        }
        active.updated_at = Set(Some(Utc::now().into()));

        self.booking_repo.update(active).await
    }

    async fn apply_payment_patch(
        &self,
        booking: booking::Model,
        input: UpdateBookingInput,
    ) -> AppResult<booking::Model> {
        if input.payment_status.is_none() && input.payment_method.is_none() {
            return Ok(booking);
        }

        let mut active: booking::ActiveModel = booking.into();
        if let Some(payment_status) = input.payment_status {
            active.payment_status = Set(payment_status);
        }
        if let Some(payment_method) = input.payment_method {
            active.payment_method = Set(Some(payment_method));
        }
        self.booking_repo.update(active).await
    }

    /// The customer who booked, the hotel owner, or an admin.
    async fn ensure_booking_party(
        &self,
        actor: &account::Model,
        booking: &booking::Model,
        action: &str,
    ) -> AppResult<()> {
        if actor.role == Role::Admin || actor.id == booking.customer_id {
            return Ok(());
        }

        if actor.role == Role::HotelOwner {
            let hotel = self.hotel_repo.get_by_id(&booking.hotel_id).await?;
            if hotel.owner_id == actor.id {
                return Ok(());
            }
        }

        Err(AppError::Forbidden(format!("Not authorized to {action}")))
    }
}

/// Nightly price snapshot: whole nights times the nightly base price.
#[must_use]
pub fn stay_total(check_in: NaiveDate, check_out: NaiveDate, price_base: i64) -> i64 {
    (check_out - check_in).num_days() * price_base
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use std::collections::BTreeMap;
    use stayhub_db::entities::room;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_stay_total_two_nights() {
        assert_eq!(stay_total(date(2025, 1, 10), date(2025, 1, 12), 12_000), 24_000);
    }

    #[test]
    fn test_stay_total_single_night() {
        assert_eq!(stay_total(date(2025, 3, 1), date(2025, 3, 2), 9_900), 9_900);
    }

    #[test]
    fn test_create_input_rejects_zero_adults() {
        let input = CreateBookingInput {
            room_id: "room1".to_string(),
            check_in: date(2025, 1, 10),
            check_out: date(2025, 1, 12),
            guests_adults: 0,
            guests_children: 0,
            special_requests: None,
        };
        assert!(input.validate().is_err());
    }

    fn test_customer() -> account::Model {
        account::Model {
            id: "cust1".to_string(),
            name: "Test Customer".to_string(),
            email: "cust@example.com".to_string(),
            email_lower: "cust@example.com".to_string(),
            password_hash: Some("$argon2id$test".to_string()),
            role: Role::Customer,
            oauth_provider: None,
            oauth_id: None,
            is_verified: false,
            is_approved: true,
            profile_image_url: None,
            phone: None,
            reset_token_hash: None,
            reset_token_expires_at: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_room(quantity: i32) -> room::Model {
        room::Model {
            id: "room1".to_string(),
            hotel_id: "hotel1".to_string(),
            name: "Garden Double".to_string(),
            description: "Ground floor double".to_string(),
            room_type: room::RoomType::Double,
            price_base: 12_000,
            price_currency: "USD".to_string(),
            capacity_adults: 2,
            capacity_children: 0,
            images: serde_json::json!([]),
            amenities: serde_json::json!([]),
            quantity,
            available: quantity,
            is_active: true,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_booking(status: BookingStatus) -> booking::Model {
        booking::Model {
            id: "booking1".to_string(),
            customer_id: "cust1".to_string(),
            hotel_id: "hotel1".to_string(),
            room_id: "room1".to_string(),
            check_in: date(2025, 1, 10),
            check_out: date(2025, 1, 12),
            guests_adults: 2,
            guests_children: 0,
            total_amount: 24_000,
            currency: "USD".to_string(),
            status,
            payment_status: PaymentStatus::Pending,
            payment_method: None,
            special_requests: None,
            cancellation_reason: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn count_row(count: i64) -> BTreeMap<&'static str, Value> {
        let mut row = BTreeMap::new();
        row.insert("num_items", Value::BigInt(Some(count)));
        row
    }

    fn service(db: sea_orm::DatabaseConnection) -> BookingService {
        let db = Arc::new(db);
        BookingService::new(
            Arc::clone(&db),
            BookingRepository::new(Arc::clone(&db)),
            RoomRepository::new(Arc::clone(&db)),
            HotelRepository::new(db),
        )
    }

    fn create_input() -> CreateBookingInput {
        CreateBookingInput {
            room_id: "room1".to_string(),
            check_in: date(2025, 1, 10),
            check_out: date(2025, 1, 12),
            guests_adults: 2,
            guests_children: 0,
            special_requests: None,
        }
    }

    #[tokio::test]
    async fn test_create_succeeds_when_capacity_available() {
        // Room locked, zero overlapping stays, insert, counter decrement
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![test_room(1)]])
            .append_query_results([vec![count_row(0)]])
            .append_query_results([vec![test_booking(BookingStatus::Pending)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let booking = service(db)
            .create(&test_customer(), create_input())
            .await
            .unwrap();

        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.total_amount, 24_000);
    }

    #[tokio::test]
    async fn test_create_rejects_when_overlap_count_reaches_quantity() {
        // quantity = 1 and one overlapping stay already holds inventory
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![test_room(1)]])
            .append_query_results([vec![count_row(1)]])
            .into_connection();

        let result = service(db).create(&test_customer(), create_input()).await;

        match result {
            Err(AppError::Conflict(message)) => {
                assert_eq!(message, "Room not available for selected dates");
            }
            other => panic!("Expected Conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_inverted_date_range() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let input = CreateBookingInput {
            check_in: date(2025, 1, 12),
            check_out: date(2025, 1, 10),
            ..create_input()
        };
        let result = service(db).create(&test_customer(), input).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_cancel_already_cancelled_is_a_noop() {
        // Only the locked read is expected; a second increment would demand
        // an exec result the mock does not have
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![test_booking(BookingStatus::Cancelled)]])
            .into_connection();

        let booking = service(db)
            .cancel(&test_customer(), "booking1", None)
            .await
            .unwrap();

        assert_eq!(booking.status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_cancel_pending_booking_increments_available_once() {
        let cancelled = booking::Model {
            status: BookingStatus::Cancelled,
            cancellation_reason: Some("plans changed".to_string()),
            ..test_booking(BookingStatus::Pending)
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![test_booking(BookingStatus::Pending)]])
            .append_query_results([vec![cancelled]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let booking = service(db)
            .cancel(&test_customer(), "booking1", Some("plans changed".to_string()))
            .await
            .unwrap();

        assert_eq!(booking.status, BookingStatus::Cancelled);
        assert_eq!(booking.cancellation_reason.as_deref(), Some("plans changed"));
    }

    #[tokio::test]
    async fn test_cancel_by_stranger_is_forbidden() {
        let stranger = account::Model {
            id: "other".to_string(),
            ..test_customer()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![test_booking(BookingStatus::Pending)]])
            .into_connection();

        let result = service(db).cancel(&stranger, "booking1", None).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
