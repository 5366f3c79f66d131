//! Chat endpoints (history and REST sends; realtime lives on the WebSocket).

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stayhub_common::AppResult;
use stayhub_core::SendMessageInput;
use stayhub_db::entities::chat_message;

use crate::{extractors::AuthAccount, middleware::AppState, response::ApiResponse};

/// Create the chat router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/history", get(history))
        .route("/messages", post(send_message))
}

/// Chat message representation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageResponse {
    pub id: String,
    pub account_id: String,
    pub hotel_id: Option<String>,
    pub booking_id: Option<String>,
    pub text: String,
    pub sender: chat_message::ChatSender,
    pub created_at: DateTime<Utc>,
}

impl From<chat_message::Model> for ChatMessageResponse {
    fn from(msg: chat_message::Model) -> Self {
        Self {
            id: msg.id,
            account_id: msg.account_id,
            hotel_id: msg.hotel_id,
            booking_id: msg.booking_id,
            text: msg.text,
            sender: msg.sender,
            created_at: msg.created_at.into(),
        }
    }
}

/// History query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub hotel_id: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

const fn default_limit() -> u64 {
    50
}

/// History response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub messages: Vec<ChatMessageResponse>,
}

/// The actor's message history, optionally scoped to a hotel channel.
async fn history(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<ApiResponse<HistoryResponse>> {
    let messages = state
        .chat_service
        .history(&account.id, query.hotel_id.as_deref(), query.limit)
        .await?;

    Ok(ApiResponse::ok(HistoryResponse {
        messages: messages.into_iter().map(ChatMessageResponse::from).collect(),
    }))
}

/// Send a message over REST; fan-out and smart replies happen off the
/// request path.
async fn send_message(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Json(req): Json<SendMessageInput>,
) -> AppResult<ApiResponse<ChatMessageResponse>> {
    let message = state.chat_service.send_message(&account, req).await?;
    Ok(ApiResponse::ok(message.into()))
}
