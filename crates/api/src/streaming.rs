//! WebSocket chat streaming.

#![allow(missing_docs)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use stayhub_common::AppResult;
use stayhub_core::{ChatEvent, ChatEventPublisher, SendMessageInput};
use stayhub_db::entities::{account, chat_message::ChatSender};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, warn};

use crate::middleware::AppState;

/// Broadcast buffer per channel.
const CHANNEL_CAPACITY: usize = 256;

/// Streaming query parameters.
#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    /// Access token for authentication.
    pub token: Option<String>,
}

/// Client-to-server message.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Subscribe to a hotel channel (or the general channel).
    #[serde(rename_all = "camelCase")]
    Join { hotel_id: Option<String> },
    /// Send a chat message into the joined channel.
    #[serde(rename_all = "camelCase")]
    Message {
        hotel_id: Option<String>,
        booking_id: Option<String>,
        text: String,
    },
}

/// Server-to-client message.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Channel joined.
    #[serde(rename_all = "camelCase")]
    Joined { channel: String },
    /// A chat message, with its best-effort smart replies.
    #[serde(rename_all = "camelCase")]
    NewMessage { body: ChatEvent },
    /// Request-level error.
    #[serde(rename_all = "camelCase")]
    Error { message: String },
}

/// Shared broadcast hub for chat channels.
///
/// One broadcast channel per hotel plus a general channel. Implements the
/// core [`ChatEventPublisher`] seam so the chat service stays transport
/// agnostic.
#[derive(Clone)]
pub struct ChatStreamState {
    general_tx: broadcast::Sender<ChatEvent>,
    hotel_channels: Arc<RwLock<HashMap<String, broadcast::Sender<ChatEvent>>>>,
}

impl ChatStreamState {
    /// Create a new streaming state.
    #[must_use]
    pub fn new() -> Self {
        let (general_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            general_tx,
            hotel_channels: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Subscribe to a hotel channel, or the general channel when `None`.
    pub async fn subscribe(&self, hotel_id: Option<&str>) -> broadcast::Receiver<ChatEvent> {
        match hotel_id {
            Some(hotel_id) => self.hotel_sender(hotel_id).await.subscribe(),
            None => self.general_tx.subscribe(),
        }
    }

    async fn hotel_sender(&self, hotel_id: &str) -> broadcast::Sender<ChatEvent> {
        {
            let channels = self.hotel_channels.read().await;
            if let Some(tx) = channels.get(hotel_id) {
                return tx.clone();
            }
        }

        let mut channels = self.hotel_channels.write().await;
        channels
            .entry(hotel_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }
}

impl Default for ChatStreamState {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatEventPublisher for ChatStreamState {
    async fn publish(&self, event: ChatEvent) -> AppResult<()> {
        match event.hotel_id.clone() {
            Some(hotel_id) => {
                let tx = self.hotel_sender(&hotel_id).await;
                // Send fails only when nobody is subscribed
                let _ = tx.send(event);
            }
            None => {
                let _ = self.general_tx.send(event);
            }
        }
        Ok(())
    }
}

/// WebSocket upgrade handler for the chat stream.
pub async fn chat_ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<StreamQuery>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    // Sending requires authentication; listening does not
    let account = match query.token {
        Some(ref token) => state.account_service.authenticate_token(token).await.ok(),
        None => None,
    };

    ws.on_upgrade(move |socket| handle_socket(socket, state, account))
}

async fn handle_socket(socket: WebSocket, state: AppState, account: Option<account::Model>) {
    let (mut sender, mut receiver) = socket.split();
    let mut subscription: Option<broadcast::Receiver<ChatEvent>> = None;

    loop {
        tokio::select! {
            event = next_event(&mut subscription) => {
                let Some(event) = event else { break };
                let message = ServerMessage::NewMessage { body: event };
                if send_json(&mut sender, &message).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => {
                let Some(Ok(message)) = incoming else { break };
                let Message::Text(text) = message else { continue };

                match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Join { hotel_id }) => {
                        subscription = Some(state.streaming.subscribe(hotel_id.as_deref()).await);
                        let channel = hotel_id
                            .map_or_else(|| "general".to_string(), |id| format!("hotel-{id}"));
                        debug!(channel = %channel, "Chat subscriber joined");
                        let _ = send_json(&mut sender, &ServerMessage::Joined { channel }).await;
                    }
                    Ok(ClientMessage::Message { hotel_id, booking_id, text }) => {
                        let Some(ref account) = account else {
                            let _ = send_json(
                                &mut sender,
                                &ServerMessage::Error { message: "Unauthorized".to_string() },
                            )
                            .await;
                            continue;
                        };

                        let input = SendMessageInput {
                            hotel_id,
                            booking_id,
                            text,
                            sender: ChatSender::Customer,
                        };

                        if let Err(e) = state.chat_service.send_message(account, input).await {
                            warn!(error = %e, "WebSocket chat send failed");
                            let _ = send_json(
                                &mut sender,
                                &ServerMessage::Error {
                                    message: "Failed to send message".to_string(),
                                },
                            )
                            .await;
                        }
                    }
                    Err(e) => {
                        debug!(error = %e, "Unparseable chat client message");
                    }
                }
            }
        }
    }

    debug!("Chat socket closed");
}

/// Wait for the next broadcast event, or park forever when not subscribed.
async fn next_event(subscription: &mut Option<broadcast::Receiver<ChatEvent>>) -> Option<ChatEvent> {
    match subscription {
        Some(rx) => loop {
            match rx.recv().await {
                Ok(event) => return Some(event),
                // Skip over missed messages rather than dropping the socket
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped = skipped, "Chat subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        },
        None => std::future::pending().await,
    }
}

async fn send_json(
    sender: &mut futures::stream::SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> Result<(), axum::Error> {
    let text = serde_json::to_string(message).unwrap_or_default();
    sender.send(Message::Text(text.into())).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event(hotel_id: Option<&str>) -> ChatEvent {
        ChatEvent {
            id: "msg1".to_string(),
            account_id: "acct1".to_string(),
            hotel_id: hotel_id.map(String::from),
            booking_id: None,
            text: "hello".to_string(),
            sender: ChatSender::Customer,
            smart_replies: vec![],
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_hotel_subscribers_receive_hotel_events() {
        let state = ChatStreamState::new();
        let mut rx = state.subscribe(Some("hotel1")).await;

        state.publish(event(Some("hotel1"))).await.unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received.id, "msg1");
    }

    #[tokio::test]
    async fn test_general_channel_is_separate() {
        let state = ChatStreamState::new();
        let mut general_rx = state.subscribe(None).await;
        let _hotel_rx = state.subscribe(Some("hotel1")).await;

        state.publish(event(Some("hotel1"))).await.unwrap();
        state.publish(event(None)).await.unwrap();

        // The general subscriber sees only the general event
        let received = general_rx.recv().await.unwrap();
        assert!(received.hotel_id.is_none());
        assert!(general_rx.try_recv().is_err());
    }
}
