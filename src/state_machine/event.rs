//! Events that can occur in a conversation

use crate::vitals::MeasurementKind;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Begin a fresh submission. `name` is used in the greeting.
    Start { name: String },
    Cancel,
    /// A tap on one of the reply-menu buttons
    MenuSelection(MenuItem),
    FreeText(String),
}

/// Buttons of the reply menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Measure(MeasurementKind),
    Submit,
}

impl MenuItem {
    pub const SUBMIT_LABEL: &'static str = "📤 Kirim Data";

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Measure(kind) => kind.code(),
            MenuItem::Submit => Self::SUBMIT_LABEL,
        }
    }

    /// Exact match against the button labels
    pub fn from_label(text: &str) -> Option<Self> {
        if text == Self::SUBMIT_LABEL {
            return Some(MenuItem::Submit);
        }
        MeasurementKind::from_code(text).map(MenuItem::Measure)
    }

    /// Button rows as rendered on the reply keyboard
    pub fn keyboard() -> [&'static [MenuItem]; 3] {
        const ROWS: [&[MenuItem]; 3] = [
            &[
                MenuItem::Measure(MeasurementKind::BloodPressure),
                MenuItem::Measure(MeasurementKind::HeartRate),
            ],
            &[
                MenuItem::Measure(MeasurementKind::Temperature),
                MenuItem::Measure(MeasurementKind::BodyWeight),
            ],
            &[MenuItem::Submit],
        ];
        ROWS
    }
}

impl Event {
    /// Classify plain message text (not a command) as a menu tap or free text
    pub fn from_text(text: &str) -> Self {
        match MenuItem::from_label(text) {
            Some(item) => Event::MenuSelection(item),
            None => Event::FreeText(text.to_string()),
        }
    }
}
