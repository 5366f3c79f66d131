//! Create review table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Review::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Review::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Review::CustomerId).string_len(32).not_null())
                    .col(ColumnDef::new(Review::HotelId).string_len(32).not_null())
                    .col(ColumnDef::new(Review::BookingId).string_len(32).not_null())
                    .col(ColumnDef::new(Review::RatingOverall).small_integer().not_null())
                    .col(ColumnDef::new(Review::RatingCleanliness).small_integer())
                    .col(ColumnDef::new(Review::RatingService).small_integer())
                    .col(ColumnDef::new(Review::RatingValue).small_integer())
                    .col(ColumnDef::new(Review::RatingLocation).small_integer())
                    .col(ColumnDef::new(Review::Comment).text().not_null())
                    .col(ColumnDef::new(Review::ResponseText).text())
                    .col(ColumnDef::new(Review::ResponseTone).string_len(16))
                    .col(
                        ColumnDef::new(Review::ResponseGeneratedByAi)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Review::RespondedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Review::IsVerified).boolean().not_null().default(false))
                    .col(ColumnDef::new(Review::IsPublished).boolean().not_null().default(true))
                    .col(
                        ColumnDef::new(Review::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Review::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_customer")
                            .from(Review::Table, Review::CustomerId)
                            .to(Account::Table, Account::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_hotel")
                            .from(Review::Table, Review::HotelId)
                            .to(Hotel::Table, Hotel::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_booking")
                            .from(Review::Table, Review::BookingId)
                            .to(Booking::Table, Booking::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: one review per booking
        manager
            .create_index(
                Index::create()
                    .name("idx_review_booking")
                    .table(Review::Table)
                    .col(Review::BookingId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: hotel review listings and rating recomputation
        manager
            .create_index(
                Index::create()
                    .name("idx_review_hotel")
                    .table(Review::Table)
                    .col(Review::HotelId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Review::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Review {
    Table,
    Id,
    CustomerId,
    HotelId,
    BookingId,
    RatingOverall,
    RatingCleanliness,
    RatingService,
    RatingValue,
    RatingLocation,
    Comment,
    ResponseText,
    ResponseTone,
    ResponseGeneratedByAi,
    RespondedAt,
    IsVerified,
    IsPublished,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Account {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Hotel {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Booking {
    Table,
    Id,
}
