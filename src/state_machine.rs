//! Per-user conversation state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! `transition(session, context, event)` returns the next session and the
//! effects the runtime has to carry out.

mod effect;
pub mod event;
mod messages;
pub mod state;
pub(crate) mod transition;


pub use effect::{Effect, OutboundMessage, TextFormat};
pub use event::{Event, MenuItem};
pub use state::{Session, SessionContext, SessionState, UserId};
pub use transition::transition;
