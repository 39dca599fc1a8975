use anyhow::{Context, Result};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, MessageId, Recipient};

/// The channel all forwarded media originates from. Every forward references
/// this one channel; the media map only varies the message id within it.
pub const SOURCE_CHANNEL: &str = "@mediabot_source";

/// Outbound side of the bot, behind a trait so the dispatcher can be
/// exercised without a live Telegram session.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Re-deliver a previously posted channel message into `dest`,
    /// preserving its media. Exactly one remote call, no retry.
    async fn forward(&self, dest: ChatId, message_id: MessageId) -> Result<()>;

    /// Send a plain text reply to `dest`.
    async fn reply(&self, dest: ChatId, text: &str) -> Result<()>;
}

/// Production gateway wrapping the single long-lived bot handle created at
/// process start.
pub struct TelegramGateway {
    bot: Bot,
}

impl TelegramGateway {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Gateway for TelegramGateway {
    async fn forward(&self, dest: ChatId, message_id: MessageId) -> Result<()> {
        self.bot
            .forward_message(
                dest,
                Recipient::ChannelUsername(SOURCE_CHANNEL.to_string()),
                message_id,
            )
            .await
            .with_context(|| {
                format!(
                    "Failed to forward message {} from {} to chat {}",
                    message_id.0, SOURCE_CHANNEL, dest.0
                )
            })?;
        Ok(())
    }

    async fn reply(&self, dest: ChatId, text: &str) -> Result<()> {
        self.bot
            .send_message(dest, text)
            .await
            .with_context(|| format!("Failed to send reply to chat {}", dest.0))?;
        Ok(())
    }
}
