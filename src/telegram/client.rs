//! Bot API HTTP client

use super::poller::UpdateSource;
use super::types::{
    ApiResponse, GetUpdatesRequest, KeyboardButton, ReplyKeyboardMarkup, SendMessageRequest,
    Update,
};
use crate::config::BotConfig;
use crate::runtime::{ChatId, ChatTransport, TransportError};
use crate::state_machine::{MenuItem, OutboundMessage, TextFormat};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Slack on top of the long-poll timeout before the HTTP request gives up
const REQUEST_SLACK: Duration = Duration::from_secs(10);

pub struct TelegramClient {
    client: Client,
    /// `<api base>/bot<token>`; never logged
    endpoint: String,
    poll_timeout: Duration,
}

impl fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramClient")
            .field("endpoint", &"<redacted>")
            .field("poll_timeout", &self.poll_timeout)
            .finish_non_exhaustive()
    }
}

impl TelegramClient {
    pub fn new(config: &BotConfig) -> Self {
        let client = Client::builder()
            .timeout(config.poll_timeout + REQUEST_SLACK)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: format!("{}/bot{}", config.api_base.trim_end_matches('/'), config.token),
            poll_timeout: config.poll_timeout,
        }
    }

    async fn call<B, R>(&self, method: &str, body: &B) -> Result<R, TransportError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response: ApiResponse<R> = self
            .client
            .post(format!("{}/{method}", self.endpoint))
            .json(body)
            .send()
            .await?
            .json()
            .await?;

        response.into_result(method)
    }
}

/// Reply keyboard with the measurement codes and the submit button
pub fn menu_markup() -> ReplyKeyboardMarkup {
    ReplyKeyboardMarkup {
        keyboard: MenuItem::keyboard()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|item| KeyboardButton { text: item.label() })
                    .collect()
            })
            .collect(),
        resize_keyboard: true,
    }
}

pub fn send_message_request(chat: ChatId, message: &OutboundMessage) -> SendMessageRequest<'_> {
    SendMessageRequest {
        chat_id: chat.0,
        text: &message.text,
        parse_mode: match message.format {
            TextFormat::Plain => None,
            TextFormat::Markdown => Some("Markdown"),
        },
        reply_markup: message.with_menu.then(menu_markup),
    }
}

#[async_trait]
impl UpdateSource for TelegramClient {
    async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, TransportError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: self.poll_timeout.as_secs(),
            allowed_updates: vec!["message"],
        };
        self.call("getUpdates", &request).await
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn send(&self, chat: ChatId, message: &OutboundMessage) -> Result<(), TransportError> {
        let _sent: serde_json::Value = self
            .call("sendMessage", &send_message_request(chat, message))
            .await?;
        Ok(())
    }
}
