//! Create room table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Room::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Room::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Room::HotelId).string_len(32).not_null())
                    .col(ColumnDef::new(Room::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Room::Description).text().not_null())
                    .col(ColumnDef::new(Room::RoomType).string_len(16).not_null())
                    .col(ColumnDef::new(Room::PriceBase).big_integer().not_null())
                    .col(ColumnDef::new(Room::PriceCurrency).string_len(8).not_null())
                    .col(ColumnDef::new(Room::CapacityAdults).integer().not_null())
                    .col(ColumnDef::new(Room::CapacityChildren).integer().not_null().default(0))
                    .col(ColumnDef::new(Room::Images).json_binary().not_null())
                    .col(ColumnDef::new(Room::Amenities).json_binary().not_null())
                    .col(ColumnDef::new(Room::Quantity).integer().not_null())
                    .col(ColumnDef::new(Room::Available).integer().not_null())
                    .col(ColumnDef::new(Room::IsActive).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(Room::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Room::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_room_hotel")
                            .from(Room::Table, Room::HotelId)
                            .to(Hotel::Table, Hotel::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: hotel room listings
        manager
            .create_index(
                Index::create()
                    .name("idx_room_hotel")
                    .table(Room::Table)
                    .col(Room::HotelId)
                    .to_owned(),
            )
            .await?;

        // Index: active filter
        manager
            .create_index(
                Index::create()
                    .name("idx_room_is_active")
                    .table(Room::Table)
                    .col(Room::IsActive)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Room::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Room {
    Table,
    Id,
    HotelId,
    Name,
    Description,
    RoomType,
    PriceBase,
    PriceCurrency,
    CapacityAdults,
    CapacityChildren,
    Images,
    Amenities,
    Quantity,
    Available,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Hotel {
    Table,
    Id,
}
