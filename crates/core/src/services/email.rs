//! Email delivery over SMTP.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use stayhub_common::{AppError, AppResult, config::SmtpConfig};

/// Email service.
///
/// Constructed without config, the service is disabled and every send fails
/// with an external-service error.
#[derive(Clone)]
pub struct EmailService {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Option<Mailbox>,
}

impl EmailService {
    /// Create a new email service from optional SMTP configuration.
    pub fn new(config: Option<&SmtpConfig>) -> AppResult<Self> {
        let Some(config) = config else {
            return Ok(Self {
                transport: None,
                from: None,
            });
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| AppError::Config(format!("Invalid SMTP relay: {e}")))?
            .port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let from = format!("{} <{}>", config.from_name, config.from_address)
            .parse::<Mailbox>()
            .map_err(|e| AppError::Config(format!("Invalid from address: {e}")))?;

        Ok(Self {
            transport: Some(builder.build()),
            from: Some(from),
        })
    }

    /// Whether a transport is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Send an email. Plain text always; HTML alternative when provided.
    pub async fn send(
        &self,
        to: &str,
        subject: &str,
        text: &str,
        html: Option<&str>,
    ) -> AppResult<()> {
        let (Some(transport), Some(from)) = (&self.transport, &self.from) else {
            return Err(AppError::ExternalService(
                "Email could not be sent".to_string(),
            ));
        };

        let to = to
            .parse::<Mailbox>()
            .map_err(|e| AppError::Validation(format!("Invalid recipient address: {e}")))?;

        let builder = Message::builder()
            .from(from.clone())
            .to(to)
            .subject(subject);

        let message = match html {
            Some(html) => builder
                .multipart(MultiPart::alternative_plain_html(
                    text.to_string(),
                    html.to_string(),
                ))
                .map_err(|e| AppError::Internal(format!("Failed to build email: {e}")))?,
            None => builder
                .header(ContentType::TEXT_PLAIN)
                .body(text.to_string())
                .map_err(|e| AppError::Internal(format!("Failed to build email: {e}")))?,
        };

        transport.send(message).await.map_err(|e| {
            tracing::warn!(error = %e, "SMTP delivery failed");
            AppError::ExternalService("Email could not be sent".to_string())
        })?;

        Ok(())
    }
}
