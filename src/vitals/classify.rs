//! Rule-based risk classification of a measurement set

use super::{Measurement, MeasurementKind, MeasurementSet};
use std::fmt;

const CRISIS_SYSTOLIC: u16 = 180;
const CRISIS_DIASTOLIC: u16 = 120;
const STAGE2_SYSTOLIC: u16 = 140;
const STAGE2_DIASTOLIC: u16 = 90;
const TACHYCARDIA_ABOVE: u16 = 100;
const BRADYCARDIA_BELOW: u16 = 60;
const FEVER_ABOVE: f64 = 37.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    /// Triggers an operator alert
    Crisis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskFinding {
    HypertensiveCrisis,
    HypertensionStage2,
    Tachycardia,
    Bradycardia,
    Fever,
}

impl RiskFinding {
    pub fn severity(self) -> Severity {
        match self {
            RiskFinding::HypertensiveCrisis => Severity::Crisis,
            RiskFinding::HypertensionStage2
            | RiskFinding::Tachycardia
            | RiskFinding::Bradycardia
            | RiskFinding::Fever => Severity::Warning,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskFinding::HypertensiveCrisis => "🆘 KRISIS HIPERTENSI",
            RiskFinding::HypertensionStage2 => "⚠️ HIPERTENSI STAGE 2",
            RiskFinding::Tachycardia => "⚠️ DETAK JANTUNG TINGGI",
            RiskFinding::Bradycardia => "⚠️ DETAK JANTUNG RENDAH",
            RiskFinding::Fever => "⚠️ DEMAM",
        }
    }
}

impl fmt::Display for RiskFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of classifying a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Healthy,
    /// Findings in evaluation order; never empty
    AtRisk { findings: Vec<RiskFinding> },
}

impl Verdict {
    pub const HEALTHY_LABEL: &'static str = "✅ SEHAT";

    fn from_findings(findings: Vec<RiskFinding>) -> Self {
        if findings.is_empty() {
            Verdict::Healthy
        } else {
            Verdict::AtRisk { findings }
        }
    }

    pub fn findings(&self) -> &[RiskFinding] {
        match self {
            Verdict::Healthy => &[],
            Verdict::AtRisk { findings } => findings,
        }
    }

    pub fn is_crisis(&self) -> bool {
        self.findings()
            .iter()
            .any(|f| f.severity() == Severity::Crisis)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Healthy => f.write_str(Self::HEALTHY_LABEL),
            Verdict::AtRisk { findings } => {
                let labels: Vec<&str> = findings.iter().map(|r| r.label()).collect();
                f.write_str(&labels.join("\n"))
            }
        }
    }
}

/// Classify a measurement set
///
/// Each kind is evaluated independently, in the order blood pressure, heart
/// rate, temperature. Body weight never produces a finding.
pub fn classify(set: &MeasurementSet) -> Verdict {
    let findings = MeasurementKind::ALL
        .into_iter()
        .filter_map(|kind| set.get(kind))
        .filter_map(finding_for)
        .collect();
    Verdict::from_findings(findings)
}

fn finding_for(measurement: &Measurement) -> Option<RiskFinding> {
    match *measurement {
        Measurement::BloodPressure {
            systolic,
            diastolic,
        } => {
            if systolic >= CRISIS_SYSTOLIC || diastolic >= CRISIS_DIASTOLIC {
                Some(RiskFinding::HypertensiveCrisis)
            } else if systolic >= STAGE2_SYSTOLIC || diastolic >= STAGE2_DIASTOLIC {
                Some(RiskFinding::HypertensionStage2)
            } else {
                None
            }
        }
        Measurement::HeartRate { bpm } if bpm > TACHYCARDIA_ABOVE => Some(RiskFinding::Tachycardia),
        Measurement::HeartRate { bpm } if bpm < BRADYCARDIA_BELOW => Some(RiskFinding::Bradycardia),
        Measurement::Temperature { celsius, .. } if celsius > FEVER_ABOVE => Some(RiskFinding::Fever),
        Measurement::HeartRate { .. }
        | Measurement::Temperature { .. }
        | Measurement::BodyWeight { .. } => None,
    }
}
