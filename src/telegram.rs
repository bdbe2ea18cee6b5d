//! Telegram Bot API transport
//!
//! Inbound: `getUpdates` long polling, mapped onto session events.
//! Outbound: `sendMessage`, optionally with the reply-menu keyboard.

mod client;
mod poller;
mod types;

pub use client::TelegramClient;
pub use poller::Poller;
