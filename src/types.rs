//! Common types used throughout sessionauth

use crate::error::{Error, Result};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Key/value parsing
// ============================================================================

/// Parse a `key=value` pair, splitting at the first `=`
///
/// The key is trimmed and must be non-empty; the value is kept verbatim and
/// may itself contain `=`.
pub fn parse_key_value(input: &str) -> Result<(String, String)> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| Error::invalid_value(input, "expected key=value"))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(Error::invalid_value(input, "key must not be empty"));
    }

    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("csrf=abc").unwrap(),
            ("csrf".to_string(), "abc".to_string())
        );
        assert_eq!(
            parse_key_value(" next = /home").unwrap(),
            ("next".to_string(), " /home".to_string())
        );
        assert_eq!(
            parse_key_value("sig=a=b").unwrap(),
            ("sig".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_key_value("empty=").unwrap(),
            ("empty".to_string(), String::new())
        );
    }

    #[test]
    fn test_parse_key_value_errors() {
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=value").is_err());
    }
}
