//! Account service.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use stayhub_common::{AppError, AppResult, Config, IdGenerator, crypto};
use stayhub_db::{
    entities::account::{self, Role},
    repositories::AccountRepository,
};
use validator::Validate;

/// Account service for registration, login, and profile management.
#[derive(Clone)]
pub struct AccountService {
    account_repo: AccountRepository,
    id_gen: IdGenerator,
    jwt_secret: String,
    jwt_expiry_secs: i64,
}

/// Input for registering a new account.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 128))]
    pub password: String,

    /// Requested role; unknown values collapse to customer.
    pub role: Option<String>,
}

/// Input for updating a profile.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,

    #[validate(length(max = 32))]
    pub phone: Option<String>,

    #[validate(url)]
    pub profile_image_url: Option<String>,
}

/// Result of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub account: account::Model,
    pub token: String,
    /// Set for hotel owners whose account an admin has not yet approved.
    /// The token is still issued; callers route to a waiting page instead of
    /// full access.
    pub approval_pending: bool,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub fn new(account_repo: AccountRepository, config: &Config) -> Self {
        Self {
            account_repo,
            id_gen: IdGenerator::new(),
            jwt_secret: config.auth.jwt_secret.clone(),
            jwt_expiry_secs: config.auth.jwt_expiry_secs,
        }
    }

    /// Register a new account.
    ///
    /// Email uniqueness is case-insensitive. `is_approved` is seeded per
    /// role: customers are usable immediately, hotel owners wait for an
    /// admin.
    pub async fn register(&self, input: RegisterInput) -> AppResult<AuthOutcome> {
        input.validate()?;

        if self.account_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let role = Role::from_request(input.role.as_deref());
        let password_hash = crypto::hash_password(&input.password)?;
        let account_id = self.id_gen.generate();
        let email = input.email.trim().to_string();

        let model = account::ActiveModel {
            id: Set(account_id),
            name: Set(input.name.trim().to_string()),
            email_lower: Set(email.to_lowercase()),
            email: Set(email),
            password_hash: Set(Some(password_hash)),
            role: Set(role),
            is_approved: Set(role.approved_on_signup()),
            is_verified: Set(false),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let account = self.account_repo.create(model).await?;

        tracing::info!(
            account_id = %account.id,
            role = ?account.role,
            approved = account.is_approved,
            "Account registered"
        );

        self.issue_outcome(account)
    }

    /// Authenticate by email and password.
    ///
    /// The failure is uniform whether the email is unknown or the password
    /// mismatches. Unapproved owners still get a token, flagged with
    /// `approval_pending`.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthOutcome> {
        let account = self
            .account_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_hash = account
            .password_hash
            .as_deref()
            .ok_or(AppError::InvalidCredentials)?;

        if !crypto::verify_password(password, password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        self.issue_outcome(account)
    }

    /// Authenticate a bearer token and load its account.
    pub async fn authenticate_token(&self, token: &str) -> AppResult<account::Model> {
        let claims = crypto::verify_jwt(token, &self.jwt_secret)?;
        self.account_repo
            .find_by_id(&claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Get an account by ID.
    pub async fn get(&self, id: &str) -> AppResult<account::Model> {
        self.account_repo.get_by_id(id).await
    }

    /// Update profile fields.
    pub async fn update_profile(
        &self,
        id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<account::Model> {
        input.validate()?;

        let account = self.account_repo.get_by_id(id).await?;
        let mut active: account::ActiveModel = account.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(url) = input.profile_image_url {
            active.profile_image_url = Set(Some(url));
        }
        active.updated_at = Set(Some(Utc::now().into()));

        self.account_repo.update(active).await
    }

    /// Approve an account (admin only). Idempotent.
    pub async fn approve(
        &self,
        actor: &account::Model,
        target_id: &str,
    ) -> AppResult<account::Model> {
        if actor.role != Role::Admin {
            return Err(AppError::Forbidden(
                "Only admins can approve accounts".to_string(),
            ));
        }

        let target = self.account_repo.get_by_id(target_id).await?;
        if target.is_approved {
            return Ok(target);
        }

        let mut active: account::ActiveModel = target.into();
        active.is_approved = Set(true);
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.account_repo.update(active).await?;
        tracing::info!(account_id = %updated.id, approved_by = %actor.id, "Account approved");
        Ok(updated)
    }

    fn issue_outcome(&self, account: account::Model) -> AppResult<AuthOutcome> {
        let token = crypto::issue_jwt(&account.id, &self.jwt_secret, self.jwt_expiry_secs)?;
        let approval_pending = account.role == Role::HotelOwner && !account.is_approved;

        Ok(AuthOutcome {
            account,
            token,
            approval_pending,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;
    use stayhub_common::config::{AuthConfig, DatabaseConfig, ServerConfig};

    fn test_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                url: "http://localhost:3000".to_string(),
                frontend_url: None,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/test".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            auth: AuthConfig {
                jwt_secret: "test-secret".to_string(),
                jwt_expiry_secs: 3600,
            },
            smtp: None,
            ai: None,
            geocoding: None,
        }
    }

    fn existing_account() -> account::Model {
        account::Model {
            id: "acct1".to_string(),
            name: "Existing".to_string(),
            email: "user@example.com".to_string(),
            email_lower: "user@example.com".to_string(),
            password_hash: Some("$argon2id$test".to_string()),
            role: Role::Customer,
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

    fn service(db: sea_orm::DatabaseConnection) -> AccountService {
        AccountService::new(AccountRepository::new(Arc::new(db)), &test_config())
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email_case_insensitively() {
        // "USER@Example.com" resolves to the same email_lower row
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing_account()]])
            .into_connection();

        let input = RegisterInput {
            name: "Second".to_string(),
            email: "USER@Example.com".to_string(),
            password: "password123".to_string(),
            role: None,
        };
        let result = service(db).register(input).await;

        match result {
            Err(AppError::Conflict(message)) => {
                assert_eq!(message, "User with this email already exists");
            }
            other => panic!("Expected Conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_login_unknown_email_fails_uniformly() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<account::Model>::new()])
            .into_connection();

        let result = service(db).login("nobody@example.com", "password123").await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_issues_pending_flag_for_unapproved_owner() {
        let password_hash = crypto::hash_password("password123").unwrap();
        let owner = account::Model {
            role: Role::HotelOwner,
            is_approved: false,
            password_hash: Some(password_hash),
            ..existing_account()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![owner]])
            .into_connection();

        let outcome = service(db)
            .login("user@example.com", "password123")
            .await
            .unwrap();

        assert!(outcome.approval_pending);
        assert!(!outcome.token.is_empty());
    }

    #[test]
    fn test_role_from_request_collapses_unknown_values() {
        assert_eq!(Role::from_request(Some("hotel_owner")), Role::HotelOwner);
        assert_eq!(Role::from_request(Some("admin")), Role::Admin);
        assert_eq!(Role::from_request(Some("customer")), Role::Customer);
        assert_eq!(Role::from_request(Some("superuser")), Role::Customer);
        assert_eq!(Role::from_request(None), Role::Customer);
    }

    #[test]
    fn test_approval_seed_per_role() {
        assert!(Role::Customer.approved_on_signup());
        assert!(Role::Admin.approved_on_signup());
        assert!(!Role::HotelOwner.approved_on_signup());
    }

    #[test]
    fn test_register_input_rejects_short_password() {
        let input = RegisterInput {
            name: "Jo".to_string(),
            email: "jo@example.com".to_string(),
            password: "short".to_string(),
            role: None,
        };
        assert!(input.validate().is_err());
    }
}
