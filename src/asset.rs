//! Asset identities and their canonical ordering.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::Address;

/// Errors constructing an asset identity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("asset code '{0}' must be 1-12 alphanumeric characters")]
    InvalidCode(String),
}

/// An immutable asset identity: the native asset, or an issued asset keyed
/// by (code, issuer, subtype). Equality is structural, so the type works as
/// a mapping key.
///
/// The subtype (alphanum-4 vs alphanum-12) is chosen by code length, the way
/// the ledger's own envelope format distinguishes them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetIdentity {
    Native,
    AlphaNum4 { code: String, issuer: Address },
    AlphaNum12 { code: String, issuer: Address },
}

impl AssetIdentity {
    /// Build an issued asset, selecting the subtype from the code length.
    pub fn issued(code: &str, issuer: Address) -> Result<Self, AssetError> {
        let code = code.trim();
        if code.is_empty() || code.len() > 12 || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AssetError::InvalidCode(code.to_string()));
        }
        Ok(if code.len() <= 4 {
            AssetIdentity::AlphaNum4 {
                code: code.to_string(),
                issuer,
            }
        } else {
            AssetIdentity::AlphaNum12 {
                code: code.to_string(),
                issuer,
            }
        })
    }

    pub fn is_native(&self) -> bool {
        matches!(self, AssetIdentity::Native)
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            AssetIdentity::Native => None,
            AssetIdentity::AlphaNum4 { code, .. } | AssetIdentity::AlphaNum12 { code, .. } => {
                Some(code)
            }
        }
    }

    pub fn issuer(&self) -> Option<Address> {
        match self {
            AssetIdentity::Native => None,
            AssetIdentity::AlphaNum4 { issuer, .. } | AssetIdentity::AlphaNum12 { issuer, .. } => {
                Some(*issuer)
            }
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            AssetIdentity::Native => 0,
            AssetIdentity::AlphaNum4 { .. } => 1,
            AssetIdentity::AlphaNum12 { .. } => 2,
        }
    }
}

/// Canonical ledger ordering: native before alphanum-4 before alphanum-12,
/// then by code, then by issuer. Pool identifiers depend on this ordering
/// being total and stable.
impl Ord for AssetIdentity {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.type_rank()
            .cmp(&other.type_rank())
            .then_with(|| self.code().cmp(&other.code()))
            .then_with(|| self.issuer().cmp(&other.issuer()))
    }
}

impl PartialOrd for AssetIdentity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for AssetIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetIdentity::Native => f.write_str("native"),
            AssetIdentity::AlphaNum4 { code, issuer }
            | AssetIdentity::AlphaNum12 { code, issuer } => write!(f, "{}:{}", code, issuer),
        }
    }
}
