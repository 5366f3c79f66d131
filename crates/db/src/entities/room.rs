//! Room entity.
//!
//! A room row describes a bookable room type within a hotel, with `quantity`
//! physical units. `available` is a denormalized display counter; admission
//! decisions are made from the booking overlap count, never from this column.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Room type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    #[sea_orm(string_value = "single")]
    Single,
    #[sea_orm(string_value = "double")]
    Double,
    #[sea_orm(string_value = "twin")]
    Twin,
    #[sea_orm(string_value = "suite")]
    Suite,
    #[sea_orm(string_value = "deluxe")]
    Deluxe,
    #[sea_orm(string_value = "presidential")]
    Presidential,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "room")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub hotel_id: String,

    pub name: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub room_type: RoomType,

    /// Nightly base price in minor currency units
    pub price_base: i64,

    pub price_currency: String,

    pub capacity_adults: i32,

    #[sea_orm(default_value = 0)]
    pub capacity_children: i32,

    #[sea_orm(column_type = "JsonBinary")]
    pub images: Json,

    #[sea_orm(column_type = "JsonBinary")]
    pub amenities: Json,

    /// Total physical units of this room type
    pub quantity: i32,

    /// Cached units-not-held counter, clamped to [0, quantity]
    pub available: i32,

    #[sea_orm(default_value = true)]
    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::hotel::Entity",
        from = "Column::HotelId",
        to = "super::hotel::Column::Id"
    )]
    Hotel,

    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,
}

impl Related<super::hotel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hotel.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
