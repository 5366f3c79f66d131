//! Review entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tone of an owner response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ResponseTone {
    #[sea_orm(string_value = "professional")]
    Professional,
    #[sea_orm(string_value = "friendly")]
    Friendly,
    #[sea_orm(string_value = "apologetic")]
    Apologetic,
    #[sea_orm(string_value = "grateful")]
    Grateful,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "review")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub customer_id: String,

    pub hotel_id: String,

    /// Unique: at most one review per booking
    #[sea_orm(unique)]
    pub booking_id: String,

    /// Overall score, 1-5
    pub rating_overall: i16,

    #[sea_orm(nullable)]
    pub rating_cleanliness: Option<i16>,

    #[sea_orm(nullable)]
    pub rating_service: Option<i16>,

    #[sea_orm(nullable)]
    pub rating_value: Option<i16>,

    #[sea_orm(nullable)]
    pub rating_location: Option<i16>,

    #[sea_orm(column_type = "Text")]
    pub comment: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub response_text: Option<String>,

    #[sea_orm(nullable)]
    pub response_tone: Option<ResponseTone>,

    #[sea_orm(default_value = false)]
    pub response_generated_by_ai: bool,

    #[sea_orm(nullable)]
    pub responded_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(default_value = false)]
    pub is_verified: bool,

    #[sea_orm(default_value = true)]
    pub is_published: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::CustomerId",
        to = "super::account::Column::Id"
    )]
    Customer,

    #[sea_orm(
        belongs_to = "super::hotel::Entity",
        from = "Column::HotelId",
        to = "super::hotel::Column::Id"
    )]
    Hotel,

    #[sea_orm(
        belongs_to = "super::booking::Entity",
        from = "Column::BookingId",
        to = "super::booking::Column::Id"
    )]
    Booking,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::hotel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hotel.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
