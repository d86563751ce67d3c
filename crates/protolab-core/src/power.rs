//! Power normalization.
//!
//! Prototype records express power as strings such as `"150kW"` or `"1.8MW"`,
//! occasionally as bare numbers. Everything downstream compares kilowatts, so
//! every power-valued field passes through [`power_to_rate`] before use.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Game ticks per second. Energy given in joules is energy per tick.
pub const TICKS_PER_SECOND: f64 = 60.0;

/// A raw power value as it appears in a prototype record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PowerValue {
    /// A bare number, taken as watts.
    Watts(f64),
    /// A magnitude with an optional SI prefix and a `W` or `J` unit.
    Text(String),
}

impl From<&str> for PowerValue {
    fn from(text: &str) -> Self {
        PowerValue::Text(text.to_string())
    }
}

impl From<f64> for PowerValue {
    fn from(watts: f64) -> Self {
        PowerValue::Watts(watts)
    }
}

/// Errors produced when a power string cannot be read.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PowerParseError {
    #[error("empty power value")]
    Empty,
    #[error("invalid magnitude in power value '{0}'")]
    InvalidNumber(String),
    #[error("unknown unit in power value '{0}'")]
    UnknownUnit(String),
    #[error("unknown SI prefix '{prefix}' in power value '{value}'")]
    UnknownPrefix { value: String, prefix: char },
}

fn si_multiplier(prefix: char) -> Option<f64> {
    let multiplier = match prefix {
        'k' | 'K' => 1e3,
        'M' => 1e6,
        'G' => 1e9,
        'T' => 1e12,
        'P' => 1e15,
        'E' => 1e18,
        'Z' => 1e21,
        'Y' => 1e24,
        'R' => 1e27,
        'Q' => 1e30,
        _ => return None,
    };
    Some(multiplier)
}

/// Parse a power string into kilowatts.
///
/// `W` values are rates. `J` values are energy per tick and are scaled by
/// [`TICKS_PER_SECOND`].
pub fn parse_power(text: &str) -> Result<f64, PowerParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(PowerParseError::Empty);
    }

    let (rest, scale) = if let Some(rest) = text.strip_suffix('W') {
        (rest, 1.0)
    } else if let Some(rest) = text.strip_suffix('J') {
        (rest, TICKS_PER_SECOND)
    } else {
        return Err(PowerParseError::UnknownUnit(text.to_string()));
    };

    let (number, multiplier) = match rest.chars().next_back() {
        Some(prefix) if prefix.is_alphabetic() => {
            let multiplier =
                si_multiplier(prefix).ok_or_else(|| PowerParseError::UnknownPrefix {
                    value: text.to_string(),
                    prefix,
                })?;
            (&rest[..rest.len() - prefix.len_utf8()], multiplier)
        }
        _ => (rest, 1.0),
    };

    let magnitude: f64 = number
        .trim()
        .parse()
        .map_err(|_| PowerParseError::InvalidNumber(text.to_string()))?;

    Ok(magnitude * (multiplier / 1000.0) * scale)
}

/// Normalize an optional raw power value to kilowatts.
///
/// Absent in, absent out. A value that cannot be parsed is logged and treated
/// as absent so attribute derivation stays total.
pub fn power_to_rate(value: Option<&PowerValue>) -> Option<f64> {
    match value? {
        PowerValue::Watts(watts) => Some(watts / 1000.0),
        PowerValue::Text(text) => match parse_power(text) {
            Ok(kilowatts) => Some(kilowatts),
            Err(error) => {
                warn!(target: "protolab::power", value = %text, %error, "ignoring unparseable power value");
                None
            }
        },
    }
}
