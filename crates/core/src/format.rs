//! Number and date formatting shared by the projections.
//!
//! Every helper maps non-finite input to zero so that `NaN` never
//! reaches a display string.

use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::CoreError;

/// Calendar date format used by the table, tooltips and the range inputs.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Decimal places kept for asset volumes.
pub const VOLUME_DECIMALS: u32 = 10;

/// Decimal places kept for fiat amounts and prices.
pub const FIAT_DECIMALS: u32 = 2;

/// Replace `NaN` / infinities with `0.0`.
#[must_use]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Round half away from zero to `decimals` places. Never returns `-0.0`.
#[must_use]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let value = finite_or_zero(value);
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    // Past 2^53 there are no fractional digits left to round away.
    let rounded = if scaled.abs() < 9_007_199_254_740_992.0 {
        scaled.round() / factor
    } else {
        value
    };
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Fixed number of decimals, e.g. `fixed(8500.0, 2) == "8500.00"`.
#[must_use]
pub fn fixed(value: f64, decimals: u32) -> String {
    let rounded = round_to(value, decimals);
    format!("{rounded:.prec$}", prec = decimals as usize)
}

/// Rounded to at most `decimals` places, trailing zeros dropped,
/// e.g. `trimmed(0.1 + 0.2, 10) == "0.3"`.
#[must_use]
pub fn trimmed(value: f64, decimals: u32) -> String {
    round_to(value, decimals).to_string()
}

/// `dd/mm/yyyy` rendering of an instant.
#[must_use]
pub fn date(instant: DateTime<Utc>) -> String {
    instant.format(DATE_FORMAT).to_string()
}

/// Parse a `dd/mm/yyyy` calendar date typed by the user.
pub fn parse_date(text: &str) -> Result<NaiveDate, CoreError> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| {
        CoreError::Validation(format!(
            "Invalid date '{trimmed}': expected dd/mm/yyyy"
        ))
    })
}

