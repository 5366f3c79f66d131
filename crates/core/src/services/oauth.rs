//! OAuth account linkage.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use stayhub_common::{AppError, AppResult, Config, IdGenerator, crypto};
use stayhub_db::{
    entities::account::{self, OauthProvider, Role},
    repositories::AccountRepository,
};
use validator::Validate;

use crate::account::AuthOutcome;

/// Input from an OAuth provider callback.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OAuthCallbackInput {
    /// Provider name ("google" or "github").
    pub provider: String,

    /// Provider-assigned external ID.
    #[validate(length(min = 1, max = 128))]
    pub oauth_id: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 256))]
    pub name: String,

    pub profile_image: Option<String>,

    /// Requested role; OAuth signups cannot self-elevate to owner.
    pub role: Option<String>,
}

/// OAuth service for provider-linked sign-in.
#[derive(Clone)]
pub struct OAuthService {
    account_repo: AccountRepository,
    id_gen: IdGenerator,
    jwt_secret: String,
    jwt_expiry_secs: i64,
}

impl OAuthService {
    /// Create a new OAuth service.
    #[must_use]
    pub fn new(account_repo: AccountRepository, config: &Config) -> Self {
        Self {
            account_repo,
            id_gen: IdGenerator::new(),
            jwt_secret: config.auth.jwt_secret.clone(),
            jwt_expiry_secs: config.auth.jwt_expiry_secs,
        }
    }

    /// Handle a provider callback: find by external id, else link by email,
    /// else create a fresh customer account.
    pub async fn callback(&self, input: OAuthCallbackInput) -> AppResult<AuthOutcome> {
        input.validate()?;

        let provider = parse_provider(&input.provider)?;

        let account = match self
            .account_repo
            .find_by_oauth(provider, &input.oauth_id)
            .await?
        {
            Some(account) => account,
            None => match self.account_repo.find_by_email(&input.email).await? {
                Some(existing) => self.link(existing, provider, &input).await?,
                None => self.create(provider, &input).await?,
            },
        };

        let token = crypto::issue_jwt(&account.id, &self.jwt_secret, self.jwt_expiry_secs)?;
        let approval_pending = account.role == Role::HotelOwner && !account.is_approved;

        Ok(AuthOutcome {
            account,
            token,
            approval_pending,
        })
    }

    /// Link the provider identity onto an existing email-matched account.
    async fn link(
        &self,
        existing: account::Model,
        provider: OauthProvider,
        input: &OAuthCallbackInput,
    ) -> AppResult<account::Model> {
        let keep_image = existing.profile_image_url.clone();
        let mut active: account::ActiveModel = existing.into();
        active.oauth_provider = Set(Some(provider));
        active.oauth_id = Set(Some(input.oauth_id.clone()));
        if keep_image.is_none() {
            active.profile_image_url = Set(input.profile_image.clone());
        }
        // Provider-verified email
        active.is_verified = Set(true);
        active.updated_at = Set(Some(Utc::now().into()));

        let account = self.account_repo.update(active).await?;
        tracing::info!(account_id = %account.id, provider = ?provider, "OAuth identity linked");
        Ok(account)
    }

    /// Create a new OAuth-backed account.
    ///
    /// The role is forced to customer: owner accounts require the password
    /// registration path and admin approval.
    async fn create(
        &self,
        provider: OauthProvider,
        input: &OAuthCallbackInput,
    ) -> AppResult<account::Model> {
        let email = input.email.trim().to_string();

        let model = account::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name.trim().to_string()),
            email_lower: Set(email.to_lowercase()),
            email: Set(email),
            password_hash: Set(None),
            role: Set(Role::Customer),
            oauth_provider: Set(Some(provider)),
            oauth_id: Set(Some(input.oauth_id.clone())),
            is_verified: Set(true),
            is_approved: Set(true),
            profile_image_url: Set(input.profile_image.clone()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let account = self.account_repo.create(model).await?;
        tracing::info!(account_id = %account.id, provider = ?provider, "OAuth account created");
        Ok(account)
    }
}

fn parse_provider(value: &str) -> AppResult<OauthProvider> {
    match value {
        "google" => Ok(OauthProvider::Google),
        "github" => Ok(OauthProvider::Github),
        _ => Err(AppError::BadRequest("Invalid OAuth provider".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider() {
        assert!(matches!(
            parse_provider("google"),
            Ok(OauthProvider::Google)
        ));
        assert!(matches!(
            parse_provider("github"),
            Ok(OauthProvider::Github)
        ));
        assert!(parse_provider("gitlab").is_err());
    }
}
