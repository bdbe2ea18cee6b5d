//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::state_machine::{OutboundMessage, Session, UserId};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Destination of an outbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Delivery failure reported by a transport
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error {code:?}: {description}")]
    Api {
        code: Option<i64>,
        description: String,
    },
}

/// Storage for per-user sessions
pub trait SessionStore: Send + Sync {
    /// The user's session, or a fresh one if none is stored
    fn get(&self, user: UserId) -> Session;

    /// Store `session` for `user`
    fn put(&self, user: UserId, session: Session);

    /// Forget everything about `user`
    fn remove(&self, user: UserId);
}

/// Outbound side of the chat platform
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, chat: ChatId, message: &OutboundMessage) -> Result<(), TransportError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    fn get(&self, user: UserId) -> Session {
        (**self).get(user)
    }

    fn put(&self, user: UserId, session: Session) {
        (**self).put(user, session);
    }

    fn remove(&self, user: UserId) {
        (**self).remove(user);
    }
}

#[async_trait]
impl<T: ChatTransport + ?Sized> ChatTransport for Arc<T> {
    async fn send(&self, chat: ChatId, message: &OutboundMessage) -> Result<(), TransportError> {
        (**self).send(chat, message).await
    }
}
