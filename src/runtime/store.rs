//! In-memory session store

use super::traits::SessionStore;
use crate::state_machine::{Session, UserId};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Process-wide map from user to session; nothing survives a restart
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<UserId, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with a stored session
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<UserId, Session>> {
        // Inserts and removes are single calls, so a poisoned map is still consistent.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, user: UserId) -> Session {
        self.lock().get(&user).cloned().unwrap_or_default()
    }

    fn put(&self, user: UserId, session: Session) {
        if session.is_vacant() {
            self.remove(user);
            return;
        }
        self.lock().insert(user, session);
    }

    fn remove(&self, user: UserId) {
        self.lock().remove(&user);
    }
}
