//! ISO 4217 currency codes.

use std::fmt;

use serde::{Serialize, Serializer};

/// Error returned when parsing an invalid currency code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid currency code: {0:?}")]
pub struct InvalidCurrency(String);

/// A 3-letter currency code such as `NOK` or `EUR`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Currency([u8; 3]);

impl Currency {
    pub fn parse(s: &str) -> Result<Self, InvalidCurrency> {
        match s.as_bytes() {
            &[a, b, c] if [a, b, c].iter().all(u8::is_ascii_uppercase) => Ok(Currency([a, b, c])),
            _ => Err(InvalidCurrency(s.to_string())),
        }
    }

    /// Parse user input, trimming whitespace and uppercasing first.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidCurrency> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Debug for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Currency({})", self.as_str())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_codes() {
        assert_eq!(Currency::parse("NOK").unwrap().as_str(), "NOK");
        assert!(Currency::parse("nok").is_err());
        assert!(Currency::parse("NO").is_err());
        assert!(Currency::parse("EURO").is_err());
        assert_eq!(Currency::parse_normalized(" eur ").unwrap().as_str(), "EUR");
    }

    #[test]
    fn error_mentions_input() {
        let err = Currency::parse("kr").unwrap_err();
        assert_eq!(err.to_string(), "invalid currency code: \"kr\"");
    }
}
