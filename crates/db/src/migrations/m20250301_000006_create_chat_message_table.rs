//! Create chat message table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChatMessage::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ChatMessage::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(ChatMessage::AccountId).string_len(32).not_null())
                    .col(ColumnDef::new(ChatMessage::HotelId).string_len(32))
                    .col(ColumnDef::new(ChatMessage::BookingId).string_len(32))
                    .col(ColumnDef::new(ChatMessage::Text).text().not_null())
                    .col(ColumnDef::new(ChatMessage::Sender).string_len(16).not_null())
                    .col(
                        ColumnDef::new(ChatMessage::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chat_message_account")
                            .from(ChatMessage::Table, ChatMessage::AccountId)
                            .to(Account::Table, Account::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: per-account history, newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_chat_message_account_created")
                    .table(ChatMessage::Table)
                    .col(ChatMessage::AccountId)
                    .col(ChatMessage::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: hotel channel history
        manager
            .create_index(
                Index::create()
                    .name("idx_chat_message_hotel")
                    .table(ChatMessage::Table)
                    .col(ChatMessage::HotelId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChatMessage::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ChatMessage {
    Table,
    Id,
    AccountId,
    HotelId,
    BookingId,
    Text,
    Sender,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Account {
    Table,
    Id,
}
