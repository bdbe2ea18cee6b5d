//! Measurement kinds, typed values and the per-user measurement set

use std::fmt;

/// The four vital signs a user can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementKind {
    BloodPressure,
    HeartRate,
    Temperature,
    BodyWeight,
}

impl MeasurementKind {
    /// All kinds, in classification and menu order
    pub const ALL: [MeasurementKind; 4] = [
        MeasurementKind::BloodPressure,
        MeasurementKind::HeartRate,
        MeasurementKind::Temperature,
        MeasurementKind::BodyWeight,
    ];

    /// Canonical short code, also used as the menu label
    pub fn code(self) -> &'static str {
        match self {
            MeasurementKind::BloodPressure => "TD",
            MeasurementKind::HeartRate => "HR",
            MeasurementKind::Temperature => "TEMP",
            MeasurementKind::BodyWeight => "BB",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// Sample input shown when prompting for a value
    pub fn example(self) -> &'static str {
        match self {
            MeasurementKind::BloodPressure => "120/80",
            MeasurementKind::HeartRate => "70",
            MeasurementKind::Temperature => "36.5",
            MeasurementKind::BodyWeight => "65",
        }
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A validated measurement value
///
/// Values are typed at validation time so that classification never has to
/// re-parse user text.
#[derive(Debug, Clone, PartialEq)]
pub enum Measurement {
    BloodPressure { systolic: u16, diastolic: u16 },
    HeartRate { bpm: u16 },
    /// `raw` is the trimmed input, echoed back verbatim ("38.0" stays "38.0")
    Temperature { celsius: f64, raw: String },
    /// Body weight is stored as the user typed it
    BodyWeight { raw: String },
}

impl Measurement {
    pub fn kind(&self) -> MeasurementKind {
        match self {
            Measurement::BloodPressure { .. } => MeasurementKind::BloodPressure,
            Measurement::HeartRate { .. } => MeasurementKind::HeartRate,
            Measurement::Temperature { .. } => MeasurementKind::Temperature,
            Measurement::BodyWeight { .. } => MeasurementKind::BodyWeight,
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measurement::BloodPressure {
                systolic,
                diastolic,
            } => write!(f, "{systolic}/{diastolic}"),
            Measurement::HeartRate { bpm } => write!(f, "{bpm}"),
            Measurement::Temperature { raw, .. } | Measurement::BodyWeight { raw } => {
                f.write_str(raw)
            }
        }
    }
}

/// At most one measurement per kind, kept in the order kinds were first
/// entered. Re-entering a kind replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementSet {
    entries: Vec<Measurement>,
}

impl MeasurementSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, measurement: Measurement) {
        let kind = measurement.kind();
        match self.entries.iter_mut().find(|m| m.kind() == kind) {
            Some(existing) => *existing = measurement,
            None => self.entries.push(measurement),
        }
    }

    pub fn get(&self, kind: MeasurementKind) -> Option<&Measurement> {
        self.entries.iter().find(|m| m.kind() == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Measurement> {
        self.entries.iter()
    }

    /// One `CODE: value` line per stored measurement
    pub fn lines(&self) -> String {
        self.iter()
            .map(|m| format!("{}: {m}", m.kind()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl FromIterator<Measurement> for MeasurementSet {
    fn from_iter<I: IntoIterator<Item = Measurement>>(iter: I) -> Self {
        let mut set = Self::new();
        for measurement in iter {
            set.insert(measurement);
        }
        set
    }
}
