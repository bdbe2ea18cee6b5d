//! User-facing message texts

use super::UserId;
use crate::vitals::{Measurement, MeasurementKind, MeasurementSet, Verdict};

pub const CANCELLED: &str = "❌ Input dibatalkan";

pub fn greeting(name: &str) -> String {
    format!(
        "Hai {}! Selamat datang di *Sistem SIGAR* 🏥\nSilakan input data kesehatan Anda:",
        escape_markdown(name)
    )
}

pub fn prompt(kind: MeasurementKind) -> String {
    format!("Masukkan nilai {kind}:\n(Contoh: {})", kind.example())
}

pub fn confirmation(measurement: &Measurement) -> String {
    format!(
        "✅ {} = {measurement} tersimpan\nLanjutkan input atau kirim data",
        measurement.kind()
    )
}

pub fn report(measurements: &MeasurementSet, verdict: &Verdict) -> String {
    format!(
        "📋 *Laporan Kesehatan Anda*\n{}\n\n*Hasil Analisis:*\n{verdict}",
        escape_markdown(&measurements.lines())
    )
}

pub fn alert(user_id: UserId, measurements: &MeasurementSet) -> String {
    format!("🚨 ALERT! Pengguna {user_id}:\n{}", measurements.lines())
}

/// Escape characters that legacy Markdown treats as entity delimiters
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
