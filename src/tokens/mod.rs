mod document;

pub use document::{
    HeadingToken, LayoutTokens, NamespaceKeys, SizeTokens, TextToken, TokenDocument,
    DEFAULT_SYSTEM,
};

use std::fmt;

use serde_json::{Number, Value};
use thiserror::Error;

pub type TokenResult<T> = std::result::Result<T, TokenError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("invalid token document: {reason}")]
    InvalidTokenDocument { reason: String },
    #[error("missing token field `{key}` in `{namespace}`")]
    MissingTokenField { namespace: String, key: String },
}

impl TokenError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidTokenDocument {
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self::MissingTokenField {
            namespace: namespace.into(),
            key: key.into(),
        }
    }
}

/// Scalar carried by a `{ "value": ... }` leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Number(Number),
    Text(String),
}

impl TokenValue {
    pub(crate) fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => Some(Self::Number(number.clone())),
            Value::String(text) => Some(Self::Text(text.clone())),
            _ => None,
        }
    }

    /// Pixel magnitude; numeric strings such as `"16"` are accepted.
    pub fn as_px(&self) -> Option<f64> {
        match self {
            Self::Number(number) => number.as_f64(),
            Self::Text(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for TokenValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Ordered `name -> entry` list; source key order is significant.
pub type NamedTokens<T> = Vec<(String, T)>;

pub(crate) fn find<'a, T>(entries: &'a NamedTokens<T>, key: &str) -> Option<&'a T> {
    entries
        .iter()
        .find_map(|(name, entry)| (name == key).then_some(entry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_strings_resolve_to_pixels() {
        assert_eq!(TokenValue::from("16").as_px(), Some(16.0));
        assert_eq!(TokenValue::from(" 1.5 ").as_px(), Some(1.5));
        assert_eq!(TokenValue::from("16px").as_px(), None);
        assert_eq!(TokenValue::from("NaN").as_px(), None);
    }

    #[test]
    fn display_keeps_source_rendering() {
        let integer = TokenValue::from_json(&json!(1200)).unwrap();
        let fractional = TokenValue::from_json(&json!(12.5)).unwrap();
        let text = TokenValue::from_json(&json!("#ffffff")).unwrap();
        assert_eq!(integer.to_string(), "1200");
        assert_eq!(fractional.to_string(), "12.5");
        assert_eq!(text.to_string(), "#ffffff");
        assert!(TokenValue::from_json(&json!(true)).is_none());
    }

    #[test]
    fn errors_name_namespace_and_key() {
        let error = TokenError::missing("wpvip/sizes/mobile.spacings", "sm");
        assert_eq!(
            error.to_string(),
            "missing token field `sm` in `wpvip/sizes/mobile.spacings`"
        );
    }
}
