//! Create booking table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Booking::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Booking::CustomerId).string_len(32).not_null())
                    .col(ColumnDef::new(Booking::HotelId).string_len(32).not_null())
                    .col(ColumnDef::new(Booking::RoomId).string_len(32).not_null())
                    .col(ColumnDef::new(Booking::CheckIn).date().not_null())
                    .col(ColumnDef::new(Booking::CheckOut).date().not_null())
                    .col(ColumnDef::new(Booking::GuestsAdults).integer().not_null())
                    .col(ColumnDef::new(Booking::GuestsChildren).integer().not_null().default(0))
                    .col(ColumnDef::new(Booking::TotalAmount).big_integer().not_null())
                    .col(ColumnDef::new(Booking::Currency).string_len(8).not_null())
                    .col(ColumnDef::new(Booking::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Booking::PaymentStatus).string_len(16).not_null())
                    .col(ColumnDef::new(Booking::PaymentMethod).string_len(16))
                    .col(ColumnDef::new(Booking::SpecialRequests).text())
                    .col(ColumnDef::new(Booking::CancellationReason).text())
                    .col(
                        ColumnDef::new(Booking::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Booking::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_customer")
                            .from(Booking::Table, Booking::CustomerId)
                            .to(Account::Table, Account::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_hotel")
                            .from(Booking::Table, Booking::HotelId)
                            .to(Hotel::Table, Hotel::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_room")
                            .from(Booking::Table, Booking::RoomId)
                            .to(Room::Table, Room::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: customer listings
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_customer")
                    .table(Booking::Table)
                    .col(Booking::CustomerId)
                    .to_owned(),
            )
            .await?;

        // Index: hotel listings
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_hotel")
                    .table(Booking::Table)
                    .col(Booking::HotelId)
                    .to_owned(),
            )
            .await?;

        // Index: status counts
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_status")
                    .table(Booking::Table)
                    .col(Booking::Status)
                    .to_owned(),
            )
            .await?;

        // Index: overlap scans per room and stay range
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_room_dates")
                    .table(Booking::Table)
                    .col(Booking::RoomId)
                    .col(Booking::CheckIn)
                    .col(Booking::CheckOut)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Booking::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Booking {
    Table,
    Id,
    CustomerId,
    HotelId,
    RoomId,
    CheckIn,
    CheckOut,
    GuestsAdults,
    GuestsChildren,
    TotalAmount,
    Currency,
    Status,
    PaymentStatus,
    PaymentMethod,
    SpecialRequests,
    CancellationReason,
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
enum Room {
    Table,
    Id,
}
