//! Human-readable forms shared by the renderers and the terminal views.

use chrono::{DateTime, Local, Utc};

const SIZE_UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];

/// Uptime as "N dias, M horas".
#[must_use]
pub fn format_uptime(secs: u64) -> String {
    let hours = secs / 3600;
    format!("{} dias, {} horas", hours / 24, hours % 24)
}

/// Byte count with a binary unit, one decimal: "512.0 B", "1.5 GB".
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", SIZE_UNITS[unit])
}

/// Timestamp in the local zone as "dd/mm/YYYY HH:MM:SS".
#[must_use]
pub fn local_timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .format("%d/%m/%Y %H:%M:%S")
        .to_string()
}
