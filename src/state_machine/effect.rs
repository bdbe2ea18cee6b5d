//! Effects produced by state transitions

/// How the transport should interpret message text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFormat {
    #[default]
    Plain,
    /// Telegram legacy Markdown (`*bold*`, `_italic_`)
    Markdown,
}

/// A message to deliver through the chat transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub text: String,
    pub format: TextFormat,
    /// Attach the reply menu
    pub with_menu: bool,
}

impl OutboundMessage {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Plain,
            with_menu: false,
        }
    }

    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Markdown,
            with_menu: false,
        }
    }

    pub fn with_menu(mut self) -> Self {
        self.with_menu = true;
        self
    }
}

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Store the new session under the user's identity
    PersistSession,

    /// Drop the user's entry from the session store
    EvictSession,

    /// Answer in the chat the event came from
    Reply(OutboundMessage),

    /// Notify the operator; fire-and-forget
    AlertOperator { text: String },
}

impl Effect {
    pub fn reply(text: impl Into<String>) -> Self {
        Effect::Reply(OutboundMessage::plain(text))
    }

    pub fn reply_with_menu(text: impl Into<String>) -> Self {
        Effect::Reply(OutboundMessage::plain(text).with_menu())
    }
}
