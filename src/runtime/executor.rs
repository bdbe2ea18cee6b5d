//! Per-user session runtime

use super::traits::{ChatId, ChatTransport, SessionStore};
use super::{Inbound, Registry};
use crate::state_machine::{transition, Effect, OutboundMessage, Session, SessionContext};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Runs one user's conversation: events are applied strictly in arrival
/// order, so a user's session has a single writer.
pub struct SessionRuntime<S, T>
where
    S: SessionStore + 'static,
    T: ChatTransport + 'static,
{
    context: SessionContext,
    store: Arc<S>,
    transport: Arc<T>,
    /// Recipient of crisis alerts
    operator: ChatId,
    registry: Registry,
    event_rx: mpsc::Receiver<Inbound>,
}

impl<S, T> SessionRuntime<S, T>
where
    S: SessionStore + 'static,
    T: ChatTransport + 'static,
{
    pub fn new(
        context: SessionContext,
        store: Arc<S>,
        transport: Arc<T>,
        operator: ChatId,
        registry: Registry,
        event_rx: mpsc::Receiver<Inbound>,
    ) -> Self {
        Self {
            context,
            store,
            transport,
            operator,
            registry,
            event_rx,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(user_id = %self.context.user_id, "Starting session runtime");

        while let Some(inbound) = self.event_rx.recv().await {
            let vacant = self.process_event(inbound).await;
            if vacant && self.retire().await {
                break;
            }
        }

        tracing::info!(user_id = %self.context.user_id, "Session runtime stopped");
    }

    /// Deregister if no event is waiting
    ///
    /// Senders only push while holding the registry lock, so an empty queue
    /// seen under the write lock stays empty until the handle is gone.
    async fn retire(&mut self) -> bool {
        let mut runtimes = self.registry.write().await;
        if !self.event_rx.is_empty() {
            return false;
        }
        runtimes.remove(&self.context.user_id);
        self.event_rx.close();
        true
    }

    /// Apply one event; returns whether the user has nothing stored afterwards
    async fn process_event(&self, inbound: Inbound) -> bool {
        let Inbound { chat, event } = inbound;
        let session = self.store.get(self.context.user_id);

        tracing::debug!(
            user_id = %self.context.user_id,
            pending = ?session.pending_kind(),
            measurements = session.measurements.len(),
            event = ?event,
            "Applying event"
        );

        // Pure state transition
        let result = match transition(&session, &self.context, event) {
            Ok(r) => r,
            Err(e) => {
                // Transition errors are user-facing (e.g., "HR harus angka")
                tracing::info!(user_id = %self.context.user_id, error = %e, "Event rejected");
                self.deliver(chat, &OutboundMessage::plain(e.to_string())).await;
                return session.is_vacant();
            }
        };

        for effect in result.effects {
            self.execute_effect(effect, &result.new_session, chat).await;
        }
        result.new_session.is_vacant()
    }

    /// Execute an effect against the store or the transport
    async fn execute_effect(&self, effect: Effect, new_session: &Session, chat: ChatId) {
        match effect {
            Effect::PersistSession => {
                self.store.put(self.context.user_id, new_session.clone());
            }

            Effect::EvictSession => {
                self.store.remove(self.context.user_id);
            }

            Effect::Reply(message) => {
                self.deliver(chat, &message).await;
            }

            Effect::AlertOperator { text } => {
                tracing::warn!(
                    user_id = %self.context.user_id,
                    operator = %self.operator,
                    "Crisis verdict, alerting operator"
                );
                self.deliver(self.operator, &OutboundMessage::plain(text)).await;
            }
        }
    }

    /// Fire-and-forget delivery: failures are logged, never retried
    async fn deliver(&self, chat: ChatId, message: &OutboundMessage) {
        if let Err(e) = self.transport.send(chat, message).await {
            tracing::warn!(
                user_id = %self.context.user_id,
                chat = %chat,
                error = %e,
                "Failed to deliver message"
            );
        }
    }
}
