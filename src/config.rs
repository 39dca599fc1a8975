use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// What `POST /webhook` returns when the inbound envelope fails to decode.
///
/// Telegram retries callbacks it considers undeliverable, so acking with 200
/// is the default; `Reject` surfaces a 500 instead for setups that want
/// decode failures visible at the provider.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DecodeErrorPolicy {
    #[default]
    Ack,
    Reject,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub webhook: WebhookConfig,
    #[serde(default = "default_media_config")]
    pub media: MediaConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WebhookConfig {
    /// Externally reachable base URL registered with Telegram,
    /// e.g. "https://bot.example.com". "/webhook" is appended.
    pub base_url: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub on_decode_error: DecodeErrorPolicy,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MediaConfig {
    #[serde(default = "default_map_path")]
    pub map_path: PathBuf,
}

fn default_port() -> u16 {
    5000
}

fn default_map_path() -> PathBuf {
    PathBuf::from("media_map.json")
}

fn default_media_config() -> MediaConfig {
    MediaConfig {
        map_path: default_map_path(),
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Full update-callback URL registered with Telegram.
    pub fn webhook_url(&self) -> String {
        format!("{}/webhook", self.webhook.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_str: &str) -> Config {
        toml::from_str(toml_str).expect("config should parse")
    }

    #[test]
    fn test_minimal_config_gets_defaults() {
        let config = parse(
            r#"
            [telegram]
            bot_token = "123:abc"

            [webhook]
            base_url = "https://bot.example.com"
            "#,
        );
        assert_eq!(config.webhook.port, 5000);
        assert_eq!(config.webhook.on_decode_error, DecodeErrorPolicy::Ack);
        assert_eq!(config.media.map_path, PathBuf::from("media_map.json"));
    }

    #[test]
    fn test_full_config() {
        let config = parse(
            r#"
            [telegram]
            bot_token = "123:abc"

            [webhook]
            base_url = "https://bot.example.com"
            port = 8080
            on_decode_error = "reject"

            [media]
            map_path = "maps/media.json"
            "#,
        );
        assert_eq!(config.webhook.port, 8080);
        assert_eq!(config.webhook.on_decode_error, DecodeErrorPolicy::Reject);
        assert_eq!(config.media.map_path, PathBuf::from("maps/media.json"));
    }

    #[test]
    fn test_webhook_url_appends_path() {
        let config = parse(
            r#"
            [telegram]
            bot_token = "t"

            [webhook]
            base_url = "https://bot.example.com"
            "#,
        );
        assert_eq!(config.webhook_url(), "https://bot.example.com/webhook");
    }

    #[test]
    fn test_webhook_url_strips_trailing_slash() {
        let config = parse(
            r#"
            [telegram]
            bot_token = "t"

            [webhook]
            base_url = "https://bot.example.com/"
            "#,
        );
        assert_eq!(config.webhook_url(), "https://bot.example.com/webhook");
    }

    #[test]
    fn test_missing_token_is_an_error() {
        let result: Result<Config, _> = toml::from_str(
            r#"
            [webhook]
            base_url = "https://bot.example.com"
            "#,
        );
        assert!(result.is_err());
    }
}
