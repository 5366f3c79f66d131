//! Hotel entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Hotel category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[sea_orm(string_value = "budget")]
    Budget,
    #[sea_orm(string_value = "mid_range")]
    MidRange,
    #[sea_orm(string_value = "luxury")]
    Luxury,
    #[sea_orm(string_value = "boutique")]
    Boutique,
    #[sea_orm(string_value = "resort")]
    Resort,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "hotel")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub owner_id: String,

    pub name: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub category: Category,

    pub address: String,

    pub city: String,

    pub state: String,

    pub country: String,

    #[sea_orm(nullable)]
    pub zip_code: Option<String>,

    /// Populated only when geocoding is enabled
    #[sea_orm(nullable)]
    pub latitude: Option<f64>,

    #[sea_orm(nullable)]
    pub longitude: Option<f64>,

    /// List of `{url, external_id}` media references
    #[sea_orm(column_type = "JsonBinary")]
    pub images: Json,

    #[sea_orm(column_type = "JsonBinary")]
    pub amenities: Json,

    /// Mean of review overall scores, one decimal place
    #[sea_orm(default_value = 0.0)]
    pub rating_average: f64,

    #[sea_orm(default_value = 0)]
    pub rating_count: i32,

    /// Flipped only through the admin approval path
    #[sea_orm(default_value = false)]
    pub is_approved: bool,

    #[sea_orm(default_value = true)]
    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::OwnerId",
        to = "super::account::Column::Id"
    )]
    Owner,

    #[sea_orm(has_many = "super::room::Entity")]
    Rooms,

    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,

    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rooms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
