//! Create account table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Account::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Account::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Account::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Account::Email).string_len(320).not_null())
                    .col(ColumnDef::new(Account::EmailLower).string_len(320).not_null())
                    .col(ColumnDef::new(Account::PasswordHash).string_len(256))
                    .col(ColumnDef::new(Account::Role).string_len(16).not_null())
                    .col(ColumnDef::new(Account::OauthProvider).string_len(16))
                    .col(ColumnDef::new(Account::OauthId).string_len(128))
                    .col(ColumnDef::new(Account::IsVerified).boolean().not_null().default(false))
                    .col(ColumnDef::new(Account::IsApproved).boolean().not_null().default(false))
                    .col(ColumnDef::new(Account::ProfileImageUrl).string_len(1024))
                    .col(ColumnDef::new(Account::Phone).string_len(32))
                    .col(ColumnDef::new(Account::ResetTokenHash).string_len(64))
                    .col(ColumnDef::new(Account::ResetTokenExpiresAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Account::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Account::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Unique index: email_lower (case-insensitive uniqueness)
        manager
            .create_index(
                Index::create()
                    .name("idx_account_email_lower")
                    .table(Account::Table)
                    .col(Account::EmailLower)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: (oauth_provider, oauth_id) lookup
        manager
            .create_index(
                Index::create()
                    .name("idx_account_oauth")
                    .table(Account::Table)
                    .col(Account::OauthProvider)
                    .col(Account::OauthId)
                    .to_owned(),
            )
            .await?;

        // Index: role (admin listings, pending-owner queries)
        manager
            .create_index(
                Index::create()
                    .name("idx_account_role")
                    .table(Account::Table)
                    .col(Account::Role)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Account::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Account {
    Table,
    Id,
    Name,
    Email,
    EmailLower,
    PasswordHash,
    Role,
    OauthProvider,
    OauthId,
    IsVerified,
    IsApproved,
    ProfileImageUrl,
    Phone,
    ResetTokenHash,
    ResetTokenExpiresAt,
    CreatedAt,
    UpdatedAt,
}
