//! Account entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum Role {
    #[sea_orm(string_value = "customer")]
    #[default]
    Customer,
    #[sea_orm(string_value = "hotel_owner")]
    HotelOwner,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl Role {
    /// Parse a role from its wire form, collapsing unknown values to customer.
    #[must_use]
    pub fn from_request(value: Option<&str>) -> Self {
        match value {
            Some("hotel_owner") => Self::HotelOwner,
            Some("admin") => Self::Admin,
            _ => Self::Customer,
        }
    }

    /// Whether accounts of this role are approved at creation time.
    ///
    /// Customers are usable immediately; owner accounts wait for an admin.
    #[must_use]
    pub const fn approved_on_signup(self) -> bool {
        matches!(self, Self::Customer | Self::Admin)
    }
}

/// Linked OAuth provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum OauthProvider {
    #[sea_orm(string_value = "google")]
    Google,
    #[sea_orm(string_value = "github")]
    Github,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "account")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Lowercased email, lookup key for case-insensitive uniqueness
    #[sea_orm(unique)]
    pub email_lower: String,

    /// NULL for OAuth-only accounts
    #[sea_orm(nullable)]
    pub password_hash: Option<String>,

    pub role: Role,

    #[sea_orm(nullable)]
    pub oauth_provider: Option<OauthProvider>,

    #[sea_orm(nullable)]
    pub oauth_id: Option<String>,

    #[sea_orm(default_value = false)]
    pub is_verified: bool,

    /// Customers are seeded approved, hotel owners wait for admin action
    pub is_approved: bool,

    #[sea_orm(nullable)]
    pub profile_image_url: Option<String>,

    #[sea_orm(nullable)]
    pub phone: Option<String>,

    /// SHA-256 digest of the outstanding reset token
    #[sea_orm(nullable)]
    pub reset_token_hash: Option<String>,

    #[sea_orm(nullable)]
    pub reset_token_expires_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::hotel::Entity")]
    Hotels,

    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,

    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,
}

impl Related<super::hotel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hotels.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
