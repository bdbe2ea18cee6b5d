//! Runtime for executing conversations
//!
//! Each user gets a `SessionRuntime` task fed by its own channel. Events for
//! different users run concurrently; events for one user never overlap.
//! Registry changes and queue pushes happen under the registry lock, which
//! is what lets a runtime retire without losing an event.

mod executor;
mod store;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::SessionRuntime;
pub use store::InMemorySessionStore;
pub use traits::*;

use crate::state_machine::{Event, SessionContext, UserId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};

/// Capacity of each user's event queue
const EVENT_QUEUE_DEPTH: usize = 32;

/// An event together with the chat it arrived in
#[derive(Debug, Clone)]
pub struct Inbound {
    pub chat: ChatId,
    pub event: Event,
}

/// Handle to interact with a running session
#[derive(Clone)]
pub struct SessionHandle {
    pub event_tx: mpsc::Sender<Inbound>,
}

/// Live runtimes by user, shared with the runtimes so they can deregister
type Registry = Arc<RwLock<HashMap<UserId, SessionHandle>>>;

/// Manager for all session runtimes
///
/// A runtime exists only while its user has something stored: once a session
/// is evicted and the queue is drained, the runtime removes itself.
pub struct RuntimeManager<S, T>
where
    S: SessionStore + 'static,
    T: ChatTransport + 'static,
{
    store: Arc<S>,
    transport: Arc<T>,
    operator: ChatId,
    runtimes: Registry,
}

impl<S, T> RuntimeManager<S, T>
where
    S: SessionStore + 'static,
    T: ChatTransport + 'static,
{
    pub fn new(store: Arc<S>, transport: Arc<T>, operator: ChatId) -> Self {
        Self {
            store,
            transport,
            operator,
            runtimes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Queue an event for a user's session, starting its runtime if needed
    ///
    /// Never waits on the user's queue: when it is full (the user's replies
    /// are stuck in the transport) the event is dropped and an error returned,
    /// so one slow chat cannot hold up the others.
    pub async fn send_event(&self, user: UserId, mut inbound: Inbound) -> Result<(), String> {
        // Fast path: runtime already running
        {
            let runtimes = self.runtimes.read().await;
            if let Some(handle) = runtimes.get(&user) {
                match offer(handle, user, inbound)? {
                    None => return Ok(()),
                    Some(returned) => inbound = returned,
                }
            }
        }

        let mut runtimes = self.runtimes.write().await;
        // Another caller may have won the race for the write lock
        if let Some(handle) = runtimes.get(&user).cloned() {
            match offer(&handle, user, inbound)? {
                None => return Ok(()),
                Some(returned) => inbound = returned,
            }
            // The task ended without deregistering
            tracing::warn!(user_id = %user, "Replacing dead session runtime");
            runtimes.remove(&user);
        }

        let handle = self.spawn_runtime(user);
        let queued = offer(&handle, user, inbound);
        runtimes.insert(user, handle);
        match queued? {
            None => Ok(()),
            Some(_) => Err(format!("Session runtime for user {user} exited on start")),
        }
    }

    fn spawn_runtime(&self, user: UserId) -> SessionHandle {
        let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
        let runtime = SessionRuntime::new(
            SessionContext::new(user),
            self.store.clone(),
            self.transport.clone(),
            self.operator,
            self.runtimes.clone(),
            event_rx,
        );

        // Start runtime in background
        tokio::spawn(runtime.run());

        SessionHandle { event_tx }
    }

    /// Number of users with a live runtime
    pub async fn active_sessions(&self) -> usize {
        self.runtimes.read().await.len()
    }
}

/// Try to queue `inbound` without waiting
///
/// `Ok(None)` when queued, `Ok(Some(inbound))` when the runtime is gone and
/// the event should go to a fresh one, `Err` when the queue is full.
fn offer(handle: &SessionHandle, user: UserId, inbound: Inbound) -> Result<Option<Inbound>, String> {
    match handle.event_tx.try_send(inbound) {
        Ok(()) => Ok(None),
        Err(TrySendError::Full(_)) => Err(format!("Event queue full for user {user}")),
        Err(TrySendError::Closed(inbound)) => Ok(Some(inbound)),
    }
}
