//! Vital-sign measurements
//!
//! Typed measurement values, field validation and rule-based risk
//! classification. Everything in here is pure: no I/O, no shared state.

mod classify;
mod kind;
mod validate;

pub use classify::{classify, Verdict};
pub use kind::{Measurement, MeasurementKind, MeasurementSet};
pub use validate::{validate, ValidationError};
