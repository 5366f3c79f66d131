//! Chat message repository.

use std::sync::Arc;

use crate::entities::{ChatMessage, chat_message};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use stayhub_common::{AppError, AppResult};

/// Chat message repository for database operations.
#[derive(Clone)]
pub struct ChatMessageRepository {
    db: Arc<DatabaseConnection>,
}

impl ChatMessageRepository {
    /// Create a new chat message repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new message.
    pub async fn create(&self, model: chat_message::ActiveModel) -> AppResult<chat_message::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Message history for an account, newest first, optionally scoped to a
    /// hotel channel.
    pub async fn find_history(
        &self,
        account_id: &str,
        hotel_id: Option<&str>,
        limit: u64,
    ) -> AppResult<Vec<chat_message::Model>> {
        let mut query = ChatMessage::find()
            .filter(chat_message::Column::AccountId.eq(account_id))
            .order_by_desc(chat_message::Column::CreatedAt);

        query = match hotel_id {
            Some(h) => query.filter(chat_message::Column::HotelId.eq(h)),
            None => query.filter(chat_message::Column::HotelId.is_null()),
        };

        query
            .limit(limit)
            .all(self.db.as_ref())
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

    fn create_test_message(id: &str, hotel_id: Option<&str>) -> chat_message::Model {
        chat_message::Model {
            id: id.to_string(),
            account_id: "acct1".to_string(),
            hotel_id: hotel_id.map(String::from),
            booking_id: None,
            text: "Is early check-in possible?".to_string(),
            sender: chat_message::ChatSender::Customer,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_history_scoped_to_hotel() {
        let msg = create_test_message("msg1", Some("hotel1"));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[msg]])
                .into_connection(),
        );

        let repo = ChatMessageRepository::new(db);
        let result = repo
            .find_history("acct1", Some("hotel1"), 20)
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].hotel_id.as_deref(), Some("hotel1"));
    }
}
