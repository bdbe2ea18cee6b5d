//! Pure state transition function

use super::messages;
use super::{Effect, Event, MenuItem, OutboundMessage, Session, SessionContext, SessionState};
use crate::vitals::{classify, validate, MeasurementKind, ValidationError};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_session: Session,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(session: Session) -> Self {
        Self {
            new_session: session,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Recoverable conversation errors
///
/// The session is left unchanged; the runtime answers with the `Display`
/// text. A pending kind therefore survives a rejected value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error(transparent)]
    Rejected(#[from] ValidationError),
    #[error("Silakan pilih parameter terlebih dahulu")]
    NoPendingKind,
    #[error("❌ Belum ada data yang dimasukkan")]
    EmptySubmission,
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs, with no I/O.
pub fn transition(
    session: &Session,
    context: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (session.state, event) {
        // Start and Cancel work from any state and drop everything collected
        (_, Event::Start { name }) => Ok(TransitionResult::new(Session::default())
            .with_effect(Effect::EvictSession)
            .with_effect(Effect::Reply(
                OutboundMessage::markdown(messages::greeting(&name)).with_menu(),
            ))),

        (_, Event::Cancel) => Ok(TransitionResult::new(Session::default())
            .with_effect(Effect::EvictSession)
            .with_effect(Effect::reply_with_menu(messages::CANCELLED))),

        // While awaiting a value every text is the value, menu labels included
        (SessionState::AwaitingValue { kind }, Event::MenuSelection(item)) => {
            accept_value(session, kind, item.label())
        }
        (SessionState::AwaitingValue { kind }, Event::FreeText(text)) => {
            accept_value(session, kind, &text)
        }

        (SessionState::Idle, Event::MenuSelection(MenuItem::Measure(kind))) => {
            let new_session = Session {
                state: SessionState::AwaitingValue { kind },
                measurements: session.measurements.clone(),
            };
            Ok(TransitionResult::new(new_session)
                .with_effect(Effect::PersistSession)
                .with_effect(Effect::reply(messages::prompt(kind))))
        }

        (SessionState::Idle, Event::MenuSelection(MenuItem::Submit)) => submit(session, context),

        (SessionState::Idle, Event::FreeText(_)) => Err(TransitionError::NoPendingKind),
    }
}

fn accept_value(
    session: &Session,
    kind: MeasurementKind,
    raw: &str,
) -> Result<TransitionResult, TransitionError> {
    let measurement = validate(kind, raw)?;
    let reply = messages::confirmation(&measurement);

    let mut measurements = session.measurements.clone();
    measurements.insert(measurement);

    Ok(TransitionResult::new(Session {
        state: SessionState::Idle,
        measurements,
    })
    .with_effect(Effect::PersistSession)
    .with_effect(Effect::reply_with_menu(reply)))
}

fn submit(session: &Session, context: &SessionContext) -> Result<TransitionResult, TransitionError> {
    if session.measurements.is_empty() {
        return Err(TransitionError::EmptySubmission);
    }

    let verdict = classify(&session.measurements);
    let mut result = TransitionResult::new(Session::default())
        .with_effect(Effect::EvictSession)
        .with_effect(Effect::Reply(OutboundMessage::markdown(messages::report(
            &session.measurements,
            &verdict,
        ))));
    if verdict.is_crisis() {
        result = result.with_effect(Effect::AlertOperator {
            text: messages::alert(context.user_id, &session.measurements),
        });
    }
    Ok(result)
}
