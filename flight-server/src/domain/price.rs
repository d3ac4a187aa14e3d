//! Fixed-point monetary amounts.
//!
//! Fare providers send totals as decimal strings (`"1234.50"`, or `"45.250"`
//! for three-decimal currencies such as KWD). Comparing those strings directly
//! orders `"99.00"` after `"1000.00"`, so amounts are parsed into thousandths
//! before any comparison.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Thousandths per whole unit.
const SCALE: i64 = 1000;

/// Error returned when a decimal amount cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid price {input:?}: {reason}")]
pub struct InvalidPrice {
    input: String,
    reason: &'static str,
}

/// A non-negative amount, stored in thousandths of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price {
    milli: i64,
}

impl Price {
    /// Create a price from minor units (hundredths).
    pub fn from_minor(minor: i64) -> Self {
        Self { milli: minor * 10 }
    }

    /// Create a price from thousandths.
    pub fn from_milli(milli: i64) -> Self {
        Self { milli }
    }

    /// Parse a decimal string such as `"123"`, `"123.4"`, `"123.45"` or
    /// `"45.250"`.
    ///
    /// Any number of fraction digits is accepted; digits past the thousandth
    /// are rounded half up.
    pub fn parse(s: &str) -> Result<Self, InvalidPrice> {
        let err = |reason| InvalidPrice {
            input: s.to_string(),
            reason,
        };

        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (s, ""),
        };

        if whole.is_empty() {
            return Err(err("missing integer part"));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(err("expected digits"));
        }

        let whole: i64 = whole.parse().map_err(|_| err("amount too large"))?;

        let mut digits = frac.bytes().map(|b| i64::from(b - b'0'));
        let mut milli = 0;
        for _ in 0..3 {
            milli = milli * 10 + digits.next().unwrap_or(0);
        }
        if digits.next().is_some_and(|d| d >= 5) {
            milli += 1;
        }

        whole
            .checked_mul(SCALE)
            .and_then(|m| m.checked_add(milli))
            .map(Self::from_milli)
            .ok_or_else(|| err("amount too large"))
    }

    /// The amount in thousandths.
    pub fn milli(&self) -> i64 {
        self.milli
    }

    /// The amount in minor units (hundredths), truncated.
    pub fn minor(&self) -> i64 {
        self.milli / 10
    }

    /// The whole-unit part, truncated.
    pub fn whole(&self) -> i64 {
        self.milli / SCALE
    }

    pub fn as_f64(&self) -> f64 {
        self.milli as f64 / SCALE as f64
    }
}

impl FromStr for Price {
    type Err = InvalidPrice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Two decimals, or three when the thousandth is not zero.
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frac = self.milli % SCALE;
        if frac % 10 == 0 {
            write!(f, "{}.{:02}", self.whole(), frac / 10)
        } else {
            write!(f, "{}.{:03}", self.whole(), frac)
        }
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}
