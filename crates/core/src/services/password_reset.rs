//! Password reset flow.
//!
//! Only the SHA-256 digest of a reset token is persisted, with a 10-minute
//! expiry. The raw token travels in the emailed link and is re-hashed on
//! redemption.

use chrono::{Duration, Utc};
use sea_orm::Set;
use stayhub_common::{AppError, AppResult, Config, crypto};
use stayhub_db::{entities::account, repositories::AccountRepository};

use crate::email::EmailService;

/// Reset-token lifetime.
const RESET_TOKEN_TTL_MINUTES: i64 = 10;

/// Password reset service.
#[derive(Clone)]
pub struct PasswordResetService {
    account_repo: AccountRepository,
    email_service: EmailService,
    frontend_url: String,
}

impl PasswordResetService {
    /// Create a new password reset service.
    #[must_use]
    pub fn new(
        account_repo: AccountRepository,
        email_service: EmailService,
        config: &Config,
    ) -> Self {
        Self {
            account_repo,
            email_service,
            frontend_url: config
                .server
                .frontend_url
                .clone()
                .unwrap_or_else(|| config.server.url.clone()),
        }
    }

    /// Start a reset: store the token digest and email the raw token.
    ///
    /// Responds identically whether or not the email exists. A mail failure
    /// rolls the token write back so no orphaned digest lingers.
    pub async fn forgot_password(&self, email: &str) -> AppResult<()> {
        let Some(account) = self.account_repo.find_by_email(email).await? else {
            return Ok(());
        };

        if account.oauth_provider.is_some() {
            return Err(AppError::BadRequest(
                "This account uses OAuth authentication. Please sign in with your OAuth provider."
                    .to_string(),
            ));
        }

        let raw_token = crypto::generate_reset_token();
        let token_hash = crypto::hash_reset_token(&raw_token);
        let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);

        let account_id = account.id.clone();
        let recipient = account.email.clone();

        let mut active: account::ActiveModel = account.into();
        active.reset_token_hash = Set(Some(token_hash));
        active.reset_token_expires_at = Set(Some(expires_at.into()));
        active.updated_at = Set(Some(Utc::now().into()));
        let saved = self.account_repo.update(active).await?;

        let reset_url = format!("{}/reset-password/{}", self.frontend_url, raw_token);
        let text = format!(
            "You are receiving this email because you (or someone else) has requested the \
             reset of a password.\n\nPlease click on the following link to reset your \
             password:\n\n{reset_url}\n\nIf you did not request this, please ignore this \
             email and your password will remain unchanged.\nThis link will expire in 10 minutes."
        );
        let html = format!(
            "<p>You are receiving this email because you (or someone else) has requested the \
             reset of a password.</p>\
             <p><a href=\"{reset_url}\">Reset Password</a></p>\
             <p>Or copy and paste this link into your browser:</p>\
             <p>{reset_url}</p>\
             <p><small>If you did not request this, please ignore this email. \
             This link will expire in 10 minutes.</small></p>"
        );

        if let Err(e) = self
            .email_service
            .send(&recipient, "Password Reset Request", &text, Some(&html))
            .await
        {
            // Roll the token write back so the digest cannot be redeemed
            let mut rollback: account::ActiveModel = saved.into();
            rollback.reset_token_hash = Set(None);
            rollback.reset_token_expires_at = Set(None);
            self.account_repo.update(rollback).await?;

            tracing::warn!(account_id = %account_id, error = %e, "Reset email failed, token cleared");
            return Err(e);
        }

        tracing::info!(account_id = %account_id, "Password reset email sent");
        Ok(())
    }

    /// Redeem a reset token and set a new password.
    pub async fn reset_password(&self, raw_token: &str, new_password: &str) -> AppResult<()> {
        if new_password.len() < 6 {
            return Err(AppError::Validation(
                "Password must be at least 6 characters".to_string(),
            ));
        }

        let token_hash = crypto::hash_reset_token(raw_token);
        let account = self
            .account_repo
            .find_by_reset_token_hash(&token_hash)
            .await?
            .filter(|a| {
                a.reset_token_expires_at
                    .is_some_and(|expires| expires > Utc::now())
            })
            .ok_or_else(|| AppError::BadRequest("Invalid or expired reset token".to_string()))?;

        let account_id = account.id.clone();
        let password_hash = crypto::hash_password(new_password)?;

        let mut active: account::ActiveModel = account.into();
        active.password_hash = Set(Some(password_hash));
        active.reset_token_hash = Set(None);
        active.reset_token_expires_at = Set(None);
        active.updated_at = Set(Some(Utc::now().into()));
        self.account_repo.update(active).await?;

        tracing::info!(account_id = %account_id, "Password reset completed");
        Ok(())
    }
}
