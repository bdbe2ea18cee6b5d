//! Session state types

use crate::vitals::{MeasurementKind, MeasurementSet};
use std::fmt;

/// Platform-assigned identity of a remote user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the conversation currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Resting state, waiting for a menu selection
    #[default]
    Idle,

    /// The user was asked for a value of `kind`
    AwaitingValue { kind: MeasurementKind },
}

/// A user's in-progress submission
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub state: SessionState,
    pub measurements: MeasurementSet,
}

impl Session {
    pub fn pending_kind(&self) -> Option<MeasurementKind> {
        match self.state {
            SessionState::Idle => None,
            SessionState::AwaitingValue { kind } => Some(kind),
        }
    }

    /// Idle with nothing collected; such sessions are not kept in the store
    pub fn is_vacant(&self) -> bool {
        self.state == SessionState::Idle && self.measurements.is_empty()
    }
}

/// Context for a session (immutable for the runtime's lifetime)
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user_id: UserId,
}

impl SessionContext {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}
