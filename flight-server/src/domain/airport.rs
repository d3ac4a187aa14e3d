//! Airport code types.

use std::fmt;

use serde::{Serialize, Serializer};

/// Error returned when parsing an invalid IATA airport code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid airport code: {reason}")]
pub struct InvalidAirport {
    reason: &'static str,
}

/// A valid 3-letter IATA airport code.
///
/// IATA codes are always 3 uppercase ASCII letters. This type guarantees
/// that any `Airport` value is valid by construction.
///
/// # Examples
///
/// ```
/// use flight_server::domain::Airport;
///
/// let osl = Airport::parse("OSL").unwrap();
/// assert_eq!(osl.as_str(), "OSL");
///
/// // Lowercase is rejected by `parse`, but accepted by `parse_normalized`
/// assert!(Airport::parse("osl").is_err());
/// assert_eq!(Airport::parse_normalized(" osl ").unwrap(), osl);
///
/// // Wrong length is rejected
/// assert!(Airport::parse("OS").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Airport([u8; 3]);

impl Airport {
    /// Parse an airport code from a string.
    ///
    /// The input must be exactly 3 uppercase ASCII letters (A-Z).
    pub fn parse(s: &str) -> Result<Self, InvalidAirport> {
        let bytes = s.as_bytes();

        if bytes.len() != 3 {
            return Err(InvalidAirport {
                reason: "must be exactly 3 characters",
            });
        }

        if !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(InvalidAirport {
                reason: "must be uppercase ASCII letters A-Z",
            });
        }

        Ok(Airport([bytes[0], bytes[1], bytes[2]]))
    }

    /// Parse user input, trimming whitespace and uppercasing first.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidAirport> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the airport code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII uppercase letters are ever stored
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Debug for Airport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Airport({})", self.as_str())
    }
}

impl fmt::Display for Airport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Airport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_codes() {
        assert!(Airport::parse("OSL").is_ok());
        assert!(Airport::parse("BER").is_ok());
        assert!(Airport::parse("CPH").is_ok());
    }

    #[test]
    fn reject_lowercase() {
        assert!(Airport::parse("osl").is_err());
        assert!(Airport::parse("Osl").is_err());
    }

    #[test]
    fn reject_wrong_length() {
        assert!(Airport::parse("").is_err());
        assert!(Airport::parse("OS").is_err());
        assert!(Airport::parse("OSLO").is_err());
    }

    #[test]
    fn reject_non_letters() {
        assert!(Airport::parse("O1L").is_err());
        assert!(Airport::parse("O L").is_err());
        assert!(Airport::parse("ØSL").is_err());
    }

    #[test]
    fn normalized_trims_and_uppercases() {
        let a = Airport::parse_normalized("  ber\n").unwrap();
        assert_eq!(a.as_str(), "BER");
        assert!(Airport::parse_normalized("berlin").is_err());
    }

    #[test]
    fn display_and_debug() {
        let a = Airport::parse("TRF").unwrap();
        assert_eq!(a.to_string(), "TRF");
        assert_eq!(format!("{a:?}"), "Airport(TRF)");
    }

    #[test]
    fn ordering_is_alphabetical() {
        let ber = Airport::parse("BER").unwrap();
        let cph = Airport::parse("CPH").unwrap();
        assert!(ber < cph);
    }

    #[test]
    fn serializes_as_string() {
        let a = Airport::parse("OSL").unwrap();
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"OSL\"");
    }
}
