// src/hours.rs
use rust_decimal::prelude::*;
use std::str::FromStr;
use tracing::warn;

use crate::error::{Result, TimecardError};

/// Parses an attendance hour cell. Blank or missing cells count as zero;
/// anything else must be a non-negative number.
pub fn parse_hours(raw: Option<&str>, row: usize, column: &str) -> Result<Decimal> {
    let text = match raw.map(str::trim) {
        None | Some("") => return Ok(Decimal::ZERO),
        Some(text) => text,
    };

    match Decimal::from_str(text) {
        Ok(hours) if !hours.is_sign_negative() => Ok(hours),
        _ => Err(TimecardError::MalformedNumeric {
            row,
            column: column.to_string(),
            value: text.to_string(),
        }),
    }
}

/// Parses a summary hour cell. Exports differ in which columns they carry and
/// how they fill them, so every unusable value falls back to zero.
pub fn lenient_hours(raw: Option<&str>, column: &str) -> Decimal {
    let text = match raw.map(str::trim) {
        None | Some("") => return Decimal::ZERO,
        Some(text) => text,
    };

    match Decimal::from_str(text) {
        Ok(hours) if !hours.is_sign_negative() => hours,
        _ => {
            warn!("Ignoring unusable value '{}' in column '{}'", text, column);
            Decimal::ZERO
        }
    }
}

/// Two-decimal rendering used by every report format.
pub fn format_hours(hours: Decimal) -> String {
    let rounded = hours.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}
