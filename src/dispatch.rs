use std::path::Path;

use teloxide::types::{ChatId, MessageId};
use tracing::{error, info};

use crate::gateway::Gateway;
use crate::media::{self, MediaMap};

pub const WELCOME_TEXT: &str = "Welcome! Send a keyword to get the media.";
pub const MISS_TEXT: &str = "No media found for that keyword.";
pub const FORWARD_ERROR_TEXT: &str = "Error sending the media.";

/// One inbound text message. Lives for a single request.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub chat: ChatId,
    pub text: String,
}

/// What to do with an inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Forward the mapped message from the source channel into the chat.
    Forward(MessageId),
    /// Send a fixed text reply.
    Reply(&'static str),
    /// Commands other than /start never produce an outbound call.
    Ignore,
}

/// Decide what an inbound text maps to: command check first, then an
/// exact-match lookup on the trimmed text. Case-sensitive, no fuzzy
/// matching, no internal-whitespace normalization.
pub fn decide(text: &str, map: &MediaMap) -> Action {
    if let Some(command) = command_name(text) {
        return if command == "start" {
            Action::Reply(WELCOME_TEXT)
        } else {
            Action::Ignore
        };
    }

    let keyword = text.trim();
    match map.get(keyword) {
        Some(&message_id) => Action::Forward(MessageId(message_id)),
        None => Action::Reply(MISS_TEXT),
    }
}

/// Extract a bot command name ("/start@some_bot arg" -> "start"). Returns
/// None for plain text, which goes through the keyword lookup instead.
fn command_name(text: &str) -> Option<&str> {
    let rest = text.trim().strip_prefix('/')?;
    let name = rest.split(char::is_whitespace).next()?;
    let name = name.split('@').next()?;
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Handle one inbound message end to end: reload the map, decide, and drive
/// the gateway. Nothing here propagates upward; a failed forward degrades to
/// exactly one fixed error reply, so each message yields at most one
/// outbound delivery.
pub async fn handle(msg: InboundMessage, gateway: &dyn Gateway, map_path: &Path) {
    let map = media::load(map_path);
    let action = decide(&msg.text, &map);
    info!("Dispatching {:?} for chat {}", action, msg.chat.0);
    apply(msg.chat, action, gateway).await;
}

async fn apply(chat: ChatId, action: Action, gateway: &dyn Gateway) {
    match action {
        Action::Forward(message_id) => {
            if let Err(e) = gateway.forward(chat, message_id).await {
                error!("Error forwarding message {}: {:#}", message_id.0, e);
                if let Err(e) = gateway.reply(chat, FORWARD_ERROR_TEXT).await {
                    error!("Error sending failure reply: {:#}", e);
                }
            }
        }
        Action::Reply(text) => {
            if let Err(e) = gateway.reply(chat, text).await {
                error!("Error sending reply: {:#}", e);
            }
        }
        Action::Ignore => {}
    }
}
