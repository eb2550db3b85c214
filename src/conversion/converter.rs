//! Conversion arithmetic
//!
//! Parsing of raw input text, unit-to-unit conversion via meters, rounding to
//! hundredths and display formatting.

use super::units::LengthUnit;

/// Parse raw input text into a value
///
/// Leading and trailing control characters and spaces are ignored. Anything
/// else that is not a finite decimal number counts as zero: empty text,
/// garbage, "NaN", "inf" and literals that overflow `f64`.
pub fn parse_input_value(text: &str) -> f64 {
    match text.trim_matches(|c: char| c <= '\u{20}').parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Convert a value between two units, going through meters
pub fn convert_length(value: f64, from: LengthUnit, to: LengthUnit) -> f64 {
    let meters = value * from.factor();
    meters / to.factor()
}

/// Round to 2 decimal places, ties away from zero
///
/// Values too large to scale by 100 are returned as-is. Negative zero is
/// normalized to zero.
pub fn round_to_hundredths(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    (scaled.round() / 100.0) + 0.0
}

/// Format a rounded value for display
///
/// Shortest representation that round-trips, always with a fractional part:
/// `5.0`, `8.2`, `304.8`.
pub fn format_result(value: f64) -> String {
    format!("{:?}", value)
}

/// Full pipeline from input text to display string
///
/// A conversion that overflows `f64` is treated like unparseable input.
pub fn convert_text(text: &str, from: LengthUnit, to: LengthUnit) -> String {
    let parsed = parse_input_value(text);
    let mut raw = convert_length(parsed, from, to);
    if !raw.is_finite() {
        tracing::debug!("Conversion of '{}' {} -> {} overflowed", text, from, to);
        raw = 0.0;
    }
    format_result(round_to_hundredths(raw))
}
