//! Fixed-point ledger amounts
//!
//! The ledger represents all asset amounts as 64-bit integers counting
//! stroops, where one unit of an asset is 10^7 stroops. Horizon renders
//! these as decimal strings ("150.0000000"); this module round-trips that
//! representation without ever touching floating point, so balance
//! comparisons in preflight checks are exact.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Stroops per whole unit of any asset.
pub const STROOPS_PER_UNIT: i64 = 10_000_000;

/// Maximum representable amount (ledger-wide cap on int64 amounts).
pub const MAX_AMOUNT: i64 = i64::MAX;

/// Errors from parsing or combining amounts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The string is not a valid decimal amount
    #[error("malformed amount '{0}'")]
    Malformed(String),

    /// More than 7 fractional digits — the ledger cannot represent it
    #[error("amount '{0}' has more than 7 decimal places")]
    TooPrecise(String),

    /// The value does not fit in a signed 64-bit stroop count
    #[error("amount '{0}' overflows the ledger's 64-bit range")]
    Overflow(String),
}

/// An asset amount in stroops.
///
/// Ordering and equality are plain integer semantics. Serializes as the
/// canonical decimal string so Horizon resources deserialize directly into
/// this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// One whole unit (the safety margin used by the liquidity preflight).
    pub const ONE: Amount = Amount(STROOPS_PER_UNIT);

    /// Largest representable amount; used as the default trustline limit.
    pub const MAX: Amount = Amount(MAX_AMOUNT);

    /// Construct from a raw stroop count.
    pub fn from_stroops(stroops: i64) -> Self {
        Amount(stroops)
    }

    /// Construct from a whole-unit count.
    pub fn from_units(units: i64) -> Self {
        Amount(units.saturating_mul(STROOPS_PER_UNIT))
    }

    pub fn stroops(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Parse a decimal string ("100", "0.9999990") into stroops.
    ///
    /// Accepts at most 7 fractional digits; shorter fractions are padded.
    pub fn parse(s: &str) -> Result<Amount, AmountError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Malformed(s.to_string()));
        }

        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(AmountError::Malformed(s.to_string()));
        }
        if !int_part.chars().all(|c| c.is_ascii_digit())
            || !frac_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(AmountError::Malformed(s.to_string()));
        }
        if frac_part.len() > 7 {
            return Err(AmountError::TooPrecise(s.to_string()));
        }

        let whole: i64 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|_| AmountError::Overflow(s.to_string()))?
        };

        let mut frac: i64 = 0;
        if !frac_part.is_empty() {
            frac = frac_part
                .parse()
                .map_err(|_| AmountError::Malformed(s.to_string()))?;
            for _ in frac_part.len()..7 {
                frac *= 10;
            }
        }

        let stroops = whole
            .checked_mul(STROOPS_PER_UNIT)
            .and_then(|w| w.checked_add(frac))
            .ok_or_else(|| AmountError::Overflow(s.to_string()))?;

        Ok(Amount(if negative { -stroops } else { stroops }))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / STROOPS_PER_UNIT as u64;
        let frac = abs % STROOPS_PER_UNIT as u64;
        write!(f, "{}{}.{:07}", sign, whole, frac)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::parse(s)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Amount::parse(&s).map_err(serde::de::Error::custom)
    }
}
