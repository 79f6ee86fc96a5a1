//! Conversions between wire enum names (`PARTNER_FINANCE`) and typed enums.
//!
//! The serde representation is the single source of truth for names, so
//! command-line parsing and display reuse it instead of keeping a second table.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::ValidationError;

/// Parse a user-supplied name into a wire enum.
///
/// Accepts any case and `-` in place of `_`: `partner-finance`,
/// `Partner_Finance` and `PARTNER_FINANCE` all parse the same.
pub fn parse_wire<T: DeserializeOwned>(field: &'static str, s: &str) -> Result<T, ValidationError> {
    let normalised = s.trim().to_ascii_uppercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(normalised)).map_err(|_| {
        ValidationError::InvalidValue {
            field,
            value: s.to_string(),
        }
    })
}

/// The wire name of a unit enum variant, e.g. `EPC_ASSISTED_FINANCE`.
pub fn wire_name<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => String::new(),
    }
}

/// Human label for a wire name: `EPC_ASSISTED_FINANCE` → `Epc Assisted Finance`.
pub fn humanize(wire: &str) -> String {
    wire.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let lower = w.to_ascii_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
