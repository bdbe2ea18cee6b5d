//! Per-kind validation of raw user input

use super::{Measurement, MeasurementKind};
use regex::Regex;
use std::ops::RangeInclusive;
use std::sync::LazyLock;
use thiserror::Error;

pub const MAX_SYSTOLIC: u16 = 300;
pub const MAX_DIASTOLIC: u16 = 200;
pub const HEART_RATE_RANGE: RangeInclusive<u32> = 30..=200;
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 35.0..=42.0;

// ASCII digits only; `\d` would also match other Unicode digit classes.
static BLOOD_PRESSURE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,3})/([0-9]{1,3})$").expect("blood pressure pattern is valid")
});

/// Why a raw value was rejected. The message is shown to the user as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Input does not have the shape expected for the kind
    #[error("{0}")]
    Format(&'static str),
    /// Input parses but is outside plausible bounds
    #[error("{0}")]
    Range(&'static str),
}

/// Validate `raw` as a value of `kind`
pub fn validate(kind: MeasurementKind, raw: &str) -> Result<Measurement, ValidationError> {
    let raw = raw.trim();
    match kind {
        MeasurementKind::BloodPressure => blood_pressure(raw),
        MeasurementKind::HeartRate => heart_rate(raw),
        MeasurementKind::Temperature => temperature(raw),
        MeasurementKind::BodyWeight => Ok(Measurement::BodyWeight {
            raw: raw.to_string(),
        }),
    }
}

fn blood_pressure(raw: &str) -> Result<Measurement, ValidationError> {
    const FORMAT: &str = "Format TD salah. Contoh: 120/80";

    let captures = BLOOD_PRESSURE_PATTERN
        .captures(raw)
        .ok_or(ValidationError::Format(FORMAT))?;
    let parse = |i: usize| {
        captures[i]
            .parse::<u16>()
            .map_err(|_| ValidationError::Format(FORMAT))
    };
    let (systolic, diastolic) = (parse(1)?, parse(2)?);

    if systolic > MAX_SYSTOLIC || diastolic > MAX_DIASTOLIC {
        return Err(ValidationError::Range("TD tidak valid (maks 300/200)"));
    }
    Ok(Measurement::BloodPressure {
        systolic,
        diastolic,
    })
}

fn heart_rate(raw: &str) -> Result<Measurement, ValidationError> {
    const RANGE: &str = "HR di luar rentang (30-200)";

    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::Format("HR harus angka"));
    }
    // All digits, so the only parse failure left is overflow.
    let bpm = raw.parse::<u32>().map_err(|_| ValidationError::Range(RANGE))?;
    if !HEART_RATE_RANGE.contains(&bpm) {
        return Err(ValidationError::Range(RANGE));
    }
    let bpm = u16::try_from(bpm).map_err(|_| ValidationError::Range(RANGE))?;
    Ok(Measurement::HeartRate { bpm })
}

fn temperature(raw: &str) -> Result<Measurement, ValidationError> {
    let celsius = raw
        .parse::<f64>()
        .map_err(|_| ValidationError::Format("Suhu harus angka (contoh: 36.5)"))?;
    // NaN falls outside every range, so it is rejected here too.
    if !TEMPERATURE_RANGE.contains(&celsius) {
        return Err(ValidationError::Range("Suhu tidak normal (35-42°C)"));
    }
    Ok(Measurement::Temperature {
        celsius,
        raw: raw.to_string(),
    })
}
