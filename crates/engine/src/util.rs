//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use serde::{Serialize, de::DeserializeOwned};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

/// Serialize a breakdown struct into a JSON column value.
pub(crate) fn breakdown_to_json<T: Serialize>(value: &T) -> ResultEngine<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|err| EngineError::Validation(format!("invalid breakdown: {err}")))
}

/// Deserialize a breakdown struct out of a JSON column value.
pub(crate) fn breakdown_from_json<T: DeserializeOwned>(
    value: serde_json::Value,
) -> ResultEngine<T> {
    serde_json::from_value(value)
        .map_err(|err| EngineError::Validation(format!("invalid stored breakdown: {err}")))
}

/// Canonical form of a customer name for uniqueness comparison:
/// NFKC-normalized, trimmed, case-folded.
pub(crate) fn normalize_name(value: &str) -> String {
    value.trim().nfkc().collect::<String>().to_lowercase()
}

/// Canonical form of a phone number for uniqueness comparison: digits and
/// leading `+` only (whitespace/punctuation ignored).
pub(crate) fn normalize_phone(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_normalization_folds_case_and_whitespace() {
        assert_eq!(normalize_name("  Jane Wanjiku "), "jane wanjiku");
        assert_eq!(normalize_name("JANE WANJIKU"), "jane wanjiku");
    }

    #[test]
    fn phone_normalization_keeps_digits() {
        assert_eq!(normalize_phone("+254 712 345 678"), "+254712345678");
        assert_eq!(normalize_phone("0712-345-678"), "0712345678");
    }
}
