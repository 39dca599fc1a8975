use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use teloxide::types::ChatId;
use tracing::{debug, warn};

use crate::config::DecodeErrorPolicy;
use crate::dispatch::{self, InboundMessage};
use crate::gateway::Gateway;

/// Shared application state: the one long-lived gateway handle plus the bits
/// of config the handlers need. Nothing here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn Gateway>,
    pub media_map_path: PathBuf,
    pub on_decode_error: DecodeErrorPolicy,
}

// Minimal inbound envelope: only the fields dispatch needs. Everything else
// Telegram puts in an update is ignored by serde.

#[derive(Debug, Deserialize)]
struct UpdateEnvelope {
    update_id: i64,
    message: Option<MessagePayload>,
}

#[derive(Debug, Deserialize)]
struct MessagePayload {
    chat: ChatPayload,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatPayload {
    id: i64,
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/webhook", post(webhook))
        .with_state(state)
}

/// Liveness probe. No side effects.
async fn home() -> (StatusCode, &'static str) {
    (StatusCode::OK, "Bot is online!")
}

/// Receive one update from Telegram.
///
/// Decoded messages are handed to a background task so the ack does not wait
/// on remote-call latency; the ack is returned regardless of the eventual
/// outcome, which is observed only through logs. The decode-failure status
/// is a config policy (see [`DecodeErrorPolicy`]).
async fn webhook(State(state): State<AppState>, body: String) -> (StatusCode, &'static str) {
    let update: UpdateEnvelope = match serde_json::from_str(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!("Failed to decode webhook update: {}", e);
            return match state.on_decode_error {
                DecodeErrorPolicy::Ack => (StatusCode::OK, "OK"),
                DecodeErrorPolicy::Reject => (StatusCode::INTERNAL_SERVER_ERROR, "Error"),
            };
        }
    };

    // Non-message updates and non-text messages are acked and dropped.
    let Some(message) = update.message else {
        debug!("Ignoring update {} without a message", update.update_id);
        return (StatusCode::OK, "OK");
    };
    let Some(text) = message.text else {
        debug!("Ignoring non-text message in chat {}", message.chat.id);
        return (StatusCode::OK, "OK");
    };

    let msg = InboundMessage {
        chat: ChatId(message.chat.id),
        text,
    };

    let gateway = state.gateway.clone();
    let map_path = state.media_map_path.clone();
    tokio::spawn(async move {
        dispatch::handle(msg, gateway.as_ref(), &map_path).await;
    });

    (StatusCode::OK, "OK")
}
