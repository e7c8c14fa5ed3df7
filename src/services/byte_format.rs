//! Human readable byte counts ("2.4 MB", "0 B").

const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Precision used for inventory sizes.
pub const DEFAULT_PRECISION: u32 = 2;

/// Format `bytes` with [`DEFAULT_PRECISION`] decimal places.
pub fn format_bytes_default(bytes: i64) -> String {
    format_bytes(bytes, DEFAULT_PRECISION)
}

/// Convert a raw byte count into a value and unit label.
///
/// Negative input is treated as zero. The unit ladder stops at GB, so very
/// large sizes render as a large GB value. The value is rounded half away
/// from zero to `precision` places and printed without trailing zeros.
pub fn format_bytes(bytes: i64, precision: u32) -> String {
    let bytes = bytes.max(0) as u64;

    let mut pow = 0usize;
    while pow < UNITS.len() - 1 && bytes >= 1u64 << (10 * (pow + 1)) {
        pow += 1;
    }

    let value = bytes as f64 / (1u64 << (10 * pow)) as f64;
    format!("{} {}", round_to(value, precision), UNITS[pow])
}

fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision.min(15) as i32);
    (value * factor).round() / factor
}
