//! Account repository.

use std::sync::Arc;

use crate::entities::{Account, account};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use stayhub_common::{AppError, AppResult};

/// Typed filter for admin account listings.
///
/// Optional fields translate to explicit query conditions; absent fields are
/// not part of the query.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    pub role: Option<account::Role>,
    pub is_approved: Option<bool>,
    pub is_verified: Option<bool>,
}

/// Account repository for database operations.
#[derive(Clone)]
pub struct AccountRepository {
    db: Arc<DatabaseConnection>,
}

impl AccountRepository {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an account by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<account::Model>> {
        Account::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an account by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<account::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::AccountNotFound(id.to_string()))
    }

    /// Find an account by email, case-insensitively.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<account::Model>> {
        Account::find()
            .filter(account::Column::EmailLower.eq(email.trim().to_lowercase()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an account by OAuth provider and external ID.
    pub async fn find_by_oauth(
        &self,
        provider: account::OauthProvider,
        oauth_id: &str,
    ) -> AppResult<Option<account::Model>> {
        Account::find()
            .filter(account::Column::OauthProvider.eq(provider))
            .filter(account::Column::OauthId.eq(oauth_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an account by its reset-token digest.
    pub async fn find_by_reset_token_hash(
        &self,
        token_hash: &str,
    ) -> AppResult<Option<account::Model>> {
        Account::find()
            .filter(account::Column::ResetTokenHash.eq(token_hash))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new account.
    pub async fn create(&self, model: account::ActiveModel) -> AppResult<account::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an account.
    pub async fn update(&self, model: account::ActiveModel) -> AppResult<account::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List accounts matching a typed filter (paginated, newest first).
    pub async fn list(
        &self,
        filter: &AccountFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<account::Model>> {
        let mut query = Account::find().order_by_desc(account::Column::CreatedAt);

        if let Some(role) = filter.role {
            query = query.filter(account::Column::Role.eq(role));
        }
        if let Some(is_approved) = filter.is_approved {
            query = query.filter(account::Column::IsApproved.eq(is_approved));
        }
        if let Some(is_verified) = filter.is_verified {
            query = query.filter(account::Column::IsVerified.eq(is_verified));
        }

        query
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find hotel-owner accounts still waiting for approval.
    pub async fn find_pending_owners(&self) -> AppResult<Vec<account::Model>> {
        Account::find()
            .filter(account::Column::Role.eq(account::Role::HotelOwner))
            .filter(account::Column::IsApproved.eq(false))
            .order_by_desc(account::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all accounts.
    pub async fn count(&self) -> AppResult<u64> {
        Account::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count accounts with a given role.
    pub async fn count_by_role(&self, role: account::Role) -> AppResult<u64> {
        Account::find()
            .filter(account::Column::Role.eq(role))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_account(id: &str, email: &str) -> account::Model {
        account::Model {
            id: id.to_string(),
            name: "Test Account".to_string(),
            email: email.to_string(),
            email_lower: email.to_lowercase(),
            password_hash: Some("$argon2id$test".to_string()),
            role: account::Role::Customer,
            oauth_provider: None,
            oauth_id: None,
            is_verified: false,
            is_approved: true,
            profile_image_url: None,
            phone: None,
            reset_token_hash: None,
            reset_token_expires_at: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_email_lowercases_input() {
        let acct = create_test_account("acct1", "user@example.com");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[acct.clone()]])
                .into_connection(),
        );

        let repo = AccountRepository::new(db);
        let result = repo.find_by_email("  USER@Example.COM ").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().email_lower, "user@example.com");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<account::Model>::new()])
                .into_connection(),
        );

        let repo = AccountRepository::new(db);
        let result = repo.get_by_id("nonexistent").await;

        match result {
            Err(AppError::AccountNotFound(id)) => assert_eq!(id, "nonexistent"),
            _ => panic!("Expected AccountNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_list_with_filter() {
        let owner = account::Model {
            role: account::Role::HotelOwner,
            is_approved: false,
            ..create_test_account("acct2", "owner@example.com")
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[owner]])
                .into_connection(),
        );

        let repo = AccountRepository::new(db);
        let filter = AccountFilter {
            role: Some(account::Role::HotelOwner),
            is_approved: Some(false),
            is_verified: None,
        };
        let result = repo.list(&filter, 10, 0).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].role, account::Role::HotelOwner);
    }
}
