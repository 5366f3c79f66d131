//! Create hotel table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Hotel::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Hotel::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Hotel::OwnerId).string_len(32).not_null())
                    .col(ColumnDef::new(Hotel::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Hotel::Description).text().not_null())
                    .col(ColumnDef::new(Hotel::Category).string_len(16).not_null())
                    .col(ColumnDef::new(Hotel::Address).string_len(512).not_null())
                    .col(ColumnDef::new(Hotel::City).string_len(128).not_null())
                    .col(ColumnDef::new(Hotel::State).string_len(128).not_null())
                    .col(ColumnDef::new(Hotel::Country).string_len(128).not_null())
                    .col(ColumnDef::new(Hotel::ZipCode).string_len(32))
                    .col(ColumnDef::new(Hotel::Latitude).double())
                    .col(ColumnDef::new(Hotel::Longitude).double())
                    .col(ColumnDef::new(Hotel::Images).json_binary().not_null())
                    .col(ColumnDef::new(Hotel::Amenities).json_binary().not_null())
                    .col(ColumnDef::new(Hotel::RatingAverage).double().not_null().default(0.0))
                    .col(ColumnDef::new(Hotel::RatingCount).integer().not_null().default(0))
                    .col(ColumnDef::new(Hotel::IsApproved).boolean().not_null().default(false))
                    .col(ColumnDef::new(Hotel::IsActive).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(Hotel::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Hotel::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hotel_owner")
                            .from(Hotel::Table, Hotel::OwnerId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: owner listings
        manager
            .create_index(
                Index::create()
                    .name("idx_hotel_owner")
                    .table(Hotel::Table)
                    .col(Hotel::OwnerId)
                    .to_owned(),
            )
            .await?;

        // Index: category search
        manager
            .create_index(
                Index::create()
                    .name("idx_hotel_category")
                    .table(Hotel::Table)
                    .col(Hotel::Category)
                    .to_owned(),
            )
            .await?;

        // Index: public visibility filter
        manager
            .create_index(
                Index::create()
                    .name("idx_hotel_approved_active")
                    .table(Hotel::Table)
                    .col(Hotel::IsApproved)
                    .col(Hotel::IsActive)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Hotel::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Hotel {
    Table,
    Id,
    OwnerId,
    Name,
    Description,
    Category,
    Address,
    City,
    State,
    Country,
    ZipCode,
    Latitude,
    Longitude,
    Images,
    Amenities,
    RatingAverage,
    RatingCount,
    IsApproved,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Account {
    Table,
    Id,
}
