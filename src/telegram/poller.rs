//! Long-polling loop turning Bot API updates into session events

use super::types::Update;
use crate::runtime::{ChatId, ChatTransport, Inbound, RuntimeManager, SessionStore, TransportError};
use crate::state_machine::{Event, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Pause after a failed `getUpdates` before polling again
const POLL_BACKOFF: Duration = Duration::from_secs(5);

/// Inbound side of the chat platform
#[async_trait]
pub trait UpdateSource: Send + Sync {
    /// Updates with id `>= offset`, waiting for new ones if there are none
    async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, TransportError>;
}

/// Map an update to the user it belongs to and the event it carries
///
/// Returns `None` for updates the bot does not act on: non-message updates,
/// messages without text or sender, messages from bots, and commands other
/// than `/start` and `/cancel`.
pub fn parse_update(update: &Update) -> Option<(UserId, Inbound)> {
    let message = update.message.as_ref()?;
    let from = message.from.as_ref().filter(|u| !u.is_bot)?;
    let text = message.text.as_deref()?;

    let event = match text.strip_prefix('/') {
        Some(command) => parse_command(command, &from.first_name)?,
        None => Event::from_text(text),
    };

    Some((
        UserId(from.id),
        Inbound {
            chat: ChatId(message.chat.id),
            event,
        },
    ))
}

/// `command` is the text after the leading slash, e.g. `start@SigarBot now`
fn parse_command(command: &str, sender_name: &str) -> Option<Event> {
    let name = command.split([' ', '@']).next().unwrap_or_default();
    match name {
        "start" => Some(Event::Start {
            name: sender_name.to_string(),
        }),
        "cancel" => Some(Event::Cancel),
        _ => None,
    }
}

pub struct Poller<U, S, T>
where
    U: UpdateSource,
    S: SessionStore + 'static,
    T: ChatTransport + 'static,
{
    source: Arc<U>,
    manager: Arc<RuntimeManager<S, T>>,
    backoff: Duration,
}

impl<U, S, T> Poller<U, S, T>
where
    U: UpdateSource,
    S: SessionStore + 'static,
    T: ChatTransport + 'static,
{
    pub fn new(source: Arc<U>, manager: Arc<RuntimeManager<S, T>>) -> Self {
        Self {
            source,
            manager,
            backoff: POLL_BACKOFF,
        }
    }

    #[cfg(test)]
    fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Poll until `shutdown` is cancelled
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!("Polling for updates");
        let mut offset: Option<i64> = None;

        loop {
            let updates = tokio::select! {
                biased;

                () = shutdown.cancelled() => break,

                result = self.source.get_updates(offset) => match result {
                    Ok(updates) => updates,
                    Err(e) => {
                        tracing::error!(error = %e, "getUpdates failed");
                        tokio::select! {
                            () = shutdown.cancelled() => break,
                            () = tokio::time::sleep(self.backoff) => continue,
                        }
                    }
                },
            };

            for update in updates {
                offset = Some(update.update_id + 1);
                self.dispatch(&update).await;
            }
        }

        let active_sessions = self.manager.active_sessions().await;
        tracing::info!(active_sessions, "Polling stopped");
    }

    async fn dispatch(&self, update: &Update) {
        let Some((user, inbound)) = parse_update(update) else {
            tracing::debug!(update_id = update.update_id, "Ignoring update");
            return;
        };
        if let Err(e) = self.manager.send_event(user, inbound).await {
            tracing::error!(user_id = %user, error = %e, "Failed to dispatch event");
        }
    }
}
