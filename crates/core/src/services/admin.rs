//! Admin aggregation service.
//!
//! Read-only platform analytics plus the pending-approval views. The
//! approval mutations themselves live on the account and hotel services.

use serde::Serialize;
use stayhub_common::{AppError, AppResult};
use stayhub_db::{
    entities::{
        account::{self, Role},
        booking::BookingStatus,
        hotel,
    },
    repositories::{AccountFilter, AccountRepository, BookingRepository, HotelRepository},
};

/// Unapproved hotels (with owner) and unapproved owner accounts.
#[derive(Debug)]
pub struct PendingApprovals {
    pub hotels: Vec<(hotel::Model, Option<account::Model>)>,
    pub owners: Vec<account::Model>,
}

/// Platform-wide counters.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformAnalytics {
    pub hotels: HotelStats,
    pub accounts: AccountStats,
    pub bookings: BookingStats,
    /// Sum of paid booking amounts, minor units.
    pub revenue: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelStats {
    pub total: u64,
    pub approved: u64,
    pub pending: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStats {
    pub total: u64,
    pub customers: u64,
    pub owners: u64,
    pub admins: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingStats {
    pub total: u64,
    pub confirmed: u64,
    pub completed: u64,
}

/// Admin aggregation service.
#[derive(Clone)]
pub struct AdminService {
    account_repo: AccountRepository,
    hotel_repo: HotelRepository,
    booking_repo: BookingRepository,
}

impl AdminService {
    /// Create a new admin service.
    #[must_use]
    pub const fn new(
        account_repo: AccountRepository,
        hotel_repo: HotelRepository,
        booking_repo: BookingRepository,
    ) -> Self {
        Self {
            account_repo,
            hotel_repo,
            booking_repo,
        }
    }

    /// Hotels and owner accounts waiting for approval.
    pub async fn pending_approvals(&self, actor: &account::Model) -> AppResult<PendingApprovals> {
        ensure_admin(actor)?;

        let pending_hotels = self.hotel_repo.find_pending().await?;
        let mut hotels = Vec::with_capacity(pending_hotels.len());
        for hotel in pending_hotels {
            let owner = self.account_repo.find_by_id(&hotel.owner_id).await?;
            hotels.push((hotel, owner));
        }

        let owners = self.account_repo.find_pending_owners().await?;

        Ok(PendingApprovals { hotels, owners })
    }

    /// Platform-wide analytics counters.
    pub async fn analytics(&self, actor: &account::Model) -> AppResult<PlatformAnalytics> {
        ensure_admin(actor)?;

        let total_hotels = self.hotel_repo.count().await?;
        let approved_hotels = self.hotel_repo.count_approved().await?;

        Ok(PlatformAnalytics {
            hotels: HotelStats {
                total: total_hotels,
                approved: approved_hotels,
                pending: total_hotels - approved_hotels,
            },
            accounts: AccountStats {
                total: self.account_repo.count().await?,
                customers: self.account_repo.count_by_role(Role::Customer).await?,
                owners: self.account_repo.count_by_role(Role::HotelOwner).await?,
                admins: self.account_repo.count_by_role(Role::Admin).await?,
            },
            bookings: BookingStats {
                total: self.booking_repo.count().await?,
                confirmed: self
                    .booking_repo
                    .count_by_status(BookingStatus::Confirmed)
                    .await?,
                completed: self
                    .booking_repo
                    .count_by_status(BookingStatus::CheckedOut)
                    .await?,
            },
            revenue: self.booking_repo.paid_revenue().await?,
        })
    }

    /// Account listing behind a typed filter.
    pub async fn list_accounts(
        &self,
        actor: &account::Model,
        filter: AccountFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<account::Model>> {
        ensure_admin(actor)?;
        self.account_repo.list(&filter, limit, offset).await
    }
}

fn ensure_admin(actor: &account::Model) -> AppResult<()> {
    if actor.role == Role::Admin {
        Ok(())
    } else {
        Err(AppError::Forbidden("Admin access required".to_string()))
    }
}

