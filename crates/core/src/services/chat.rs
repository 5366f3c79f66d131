//! Chat relay service.
//!
//! Messages are persisted first, then fanned out to the hotel's channel (or
//! the general channel) with best-effort smart-reply enrichment. Neither the
//! enrichment nor the fan-out is allowed to delay the caller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use stayhub_common::{AppResult, IdGenerator};
use stayhub_db::{
    entities::{
        account,
        chat_message::{self, ChatSender},
    },
    repositories::ChatMessageRepository,
};
use validator::Validate;

use crate::ai::AiService;

/// A chat message as broadcast to channel subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEvent {
    pub id: String,
    pub account_id: String,
    pub hotel_id: Option<String>,
    pub booking_id: Option<String>,
    pub text: String,
    pub sender: ChatSender,
    pub smart_replies: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl ChatEvent {
    /// Build an event from a persisted message and its enrichment.
    #[must_use]
    pub fn from_message(message: &chat_message::Model, smart_replies: Vec<String>) -> Self {
        Self {
            id: message.id.clone(),
            account_id: message.account_id.clone(),
            hotel_id: message.hotel_id.clone(),
            booking_id: message.booking_id.clone(),
            text: message.text.clone(),
            sender: message.sender,
            smart_replies,
            created_at: message.created_at.into(),
        }
    }
}

/// Fan-out sink for chat events.
///
/// The API layer provides the broadcast-backed implementation; core stays
/// independent of the transport.
#[async_trait]
pub trait ChatEventPublisher: Send + Sync {
    /// Publish an event to its channel's subscribers.
    async fn publish(&self, event: ChatEvent) -> AppResult<()>;
}

/// A no-op publisher for tests or when streaming is disabled.
#[derive(Clone, Default)]
pub struct NoOpChatEventPublisher;

#[async_trait]
impl ChatEventPublisher for NoOpChatEventPublisher {
    async fn publish(&self, _event: ChatEvent) -> AppResult<()> {
        Ok(())
    }
}

/// Input for sending a chat message.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageInput {
    pub hotel_id: Option<String>,

    pub booking_id: Option<String>,

    #[validate(length(min = 1, max = 4096))]
    pub text: String,

    pub sender: ChatSender,
}

/// Chat relay service.
#[derive(Clone)]
pub struct ChatService {
    chat_repo: ChatMessageRepository,
    ai_service: Option<AiService>,
    publisher: Arc<dyn ChatEventPublisher>,
    smart_reply_timeout: Duration,
    id_gen: IdGenerator,
}

impl ChatService {
    /// Create a new chat service.
    #[must_use]
    pub fn new(
        chat_repo: ChatMessageRepository,
        ai_service: Option<AiService>,
        publisher: Arc<dyn ChatEventPublisher>,
        smart_reply_timeout: Duration,
    ) -> Self {
        Self {
            chat_repo,
            ai_service,
            publisher,
            smart_reply_timeout,
            id_gen: IdGenerator::new(),
        }
    }

    /// Persist a message and fan it out.
    ///
    /// The caller gets the persisted message immediately; enrichment and
    /// broadcast run in a detached task. A failed suggestion fetch logs a
    /// warning and the event goes out with an empty suggestion list.
    pub async fn send_message(
        &self,
        account: &account::Model,
        input: SendMessageInput,
    ) -> AppResult<chat_message::Model> {
        input.validate()?;

        let model = chat_message::ActiveModel {
            id: Set(self.id_gen.generate()),
            account_id: Set(account.id.clone()),
            hotel_id: Set(input.hotel_id),
            booking_id: Set(input.booking_id),
            text: Set(input.text),
            sender: Set(input.sender),
            created_at: Set(Utc::now().into()),
        };

        let message = self.chat_repo.create(model).await?;

        let publisher = Arc::clone(&self.publisher);
        let ai_service = self.ai_service.clone();
        let timeout = self.smart_reply_timeout;
        let broadcast_message = message.clone();

        tokio::spawn(async move {
            let smart_replies =
                fetch_smart_replies(ai_service.as_ref(), &broadcast_message, timeout).await;
            let event = ChatEvent::from_message(&broadcast_message, smart_replies);
            if let Err(e) = publisher.publish(event).await {
                tracing::warn!(message_id = %broadcast_message.id, error = %e, "Chat fan-out failed");
            }
        });

        Ok(message)
    }

    /// Message history for an account, optionally scoped to a hotel channel.
    pub async fn history(
        &self,
        account_id: &str,
        hotel_id: Option<&str>,
        limit: u64,
    ) -> AppResult<Vec<chat_message::Model>> {
        self.chat_repo.find_history(account_id, hotel_id, limit).await
    }
}

/// Best-effort smart replies for customer messages.
async fn fetch_smart_replies(
    ai_service: Option<&AiService>,
    message: &chat_message::Model,
    timeout: Duration,
) -> Vec<String> {
    if message.sender != ChatSender::Customer {
        return Vec::new();
    }

    let Some(ai_service) = ai_service else {
        return Vec::new();
    };

    match tokio::time::timeout(timeout, ai_service.smart_replies(&message.text)).await {
        Ok(Ok(replies)) => replies,
        Ok(Err(e)) => {
            tracing::warn!(message_id = %message.id, error = %e, "Smart reply generation failed");
            Vec::new()
        }
        Err(_) => {
            tracing::warn!(message_id = %message.id, "Smart reply generation timed out");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn message(sender: ChatSender) -> chat_message::Model {
        chat_message::Model {
            id: "msg1".to_string(),
            account_id: "acct1".to_string(),
            hotel_id: Some("hotel1".to_string()),
            booking_id: None,
            text: "Is breakfast included?".to_string(),
            sender,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_non_customer_messages_get_no_suggestions() {
        let replies =
            fetch_smart_replies(None, &message(ChatSender::Support), Duration::from_secs(1)).await;
        assert!(replies.is_empty());
    }

    #[tokio::test]
    async fn test_missing_provider_yields_empty_suggestions() {
        let replies =
            fetch_smart_replies(None, &message(ChatSender::Customer), Duration::from_secs(1))
                .await;
        assert!(replies.is_empty());
    }

    #[test]
    fn test_event_carries_message_fields() {
        let msg = message(ChatSender::Customer);
        let event = ChatEvent::from_message(&msg, vec!["Yes!".to_string()]);
        assert_eq!(event.id, "msg1");
        assert_eq!(event.hotel_id.as_deref(), Some("hotel1"));
        assert_eq!(event.smart_replies, vec!["Yes!"]);
    }
}
