//! Constant-product liquidity pool descriptors and price bounds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::asset::AssetIdentity;

/// Pool fee parameter, in basis points. Fixed protocol-wide for
/// constant-product pools.
pub const POOL_FEE_BP: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("a liquidity pool needs two distinct assets, got {0} twice")]
    DuplicateAsset(AssetIdentity),

    #[error("invalid price bound: {0}")]
    InvalidPrice(String),

    #[error("malformed pool id '{0}'")]
    MalformedId(String),
}

/// A liquidity pool identifier: 32 bytes, hex-rendered, derived
/// deterministically from the pool's parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolId([u8; 32]);

impl PoolId {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for PoolId {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| PoolError::MalformedId(s.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| PoolError::MalformedId(s.to_string()))?;
        Ok(PoolId(arr))
    }
}

/// An ordered asset pair defining a constant-product pool.
///
/// The constructor sorts the pair into the ledger's canonical order, so the
/// derived identifier is independent of argument order and computable before
/// the pool exists on-ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityPoolDescriptor {
    asset_a: AssetIdentity,
    asset_b: AssetIdentity,
}

impl LiquidityPoolDescriptor {
    pub fn constant_product(
        first: AssetIdentity,
        second: AssetIdentity,
    ) -> Result<Self, PoolError> {
        if first == second {
            return Err(PoolError::DuplicateAsset(first));
        }
        let (asset_a, asset_b) = if first <= second {
            (first, second)
        } else {
            (second, first)
        };
        Ok(Self { asset_a, asset_b })
    }

    /// The canonically-first asset (native, when the pool holds it).
    pub fn asset_a(&self) -> &AssetIdentity {
        &self.asset_a
    }

    pub fn asset_b(&self) -> &AssetIdentity {
        &self.asset_b
    }

    /// Derive the pool identifier: SHA-256 over a domain-separated encoding
    /// of (pool type, fee, ordered pair). A pure function of the sorted
    /// pair — deposit amounts never enter the preimage.
    pub fn id(&self) -> PoolId {
        let mut hasher = Sha256::new();
        hasher.update(b"liquidity_pool:constant_product");
        hasher.update(POOL_FEE_BP.to_be_bytes());
        hash_asset(&mut hasher, &self.asset_a);
        hash_asset(&mut hasher, &self.asset_b);
        PoolId(hasher.finalize().into())
    }
}

fn hash_asset(hasher: &mut Sha256, asset: &AssetIdentity) {
    match asset {
        AssetIdentity::Native => hasher.update([0u8]),
        AssetIdentity::AlphaNum4 { code, issuer } => {
            hasher.update([1u8]);
            hasher.update(code.as_bytes());
            hasher.update([0u8]); // code terminator
            hasher.update(issuer.as_bytes());
        }
        AssetIdentity::AlphaNum12 { code, issuer } => {
            hasher.update([2u8]);
            hasher.update(code.as_bytes());
            hasher.update([0u8]);
            hasher.update(issuer.as_bytes());
        }
    }
}

/// A rational price, numerator over denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub n: i32,
    pub d: i32,
}

impl Price {
    pub fn new(n: i32, d: i32) -> Result<Self, PoolError> {
        if n <= 0 || d <= 0 {
            return Err(PoolError::InvalidPrice(format!(
                "{}/{} — numerator and denominator must be strictly positive",
                n, d
            )));
        }
        Ok(Price { n, d })
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.n, self.d)
    }
}

/// An accepted price band for a pool deposit. Invariant: `min <= max`, both
/// strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBound {
    min: Price,
    max: Price,
}

impl PriceBound {
    pub fn new(min: Price, max: Price) -> Result<Self, PoolError> {
        // min <= max via cross-multiplication; i32 components cannot
        // overflow an i64 product.
        if (min.n as i64) * (max.d as i64) > (max.n as i64) * (min.d as i64) {
            return Err(PoolError::InvalidPrice(format!(
                "min {} exceeds max {}",
                min, max
            )));
        }
        Ok(PriceBound { min, max })
    }

    /// The wide band used for a first deposit into a not-yet-existing pool:
    /// any initial ratio between 1/10000 and 10000/1 is accepted. Only valid
    /// for first-deposit scenarios; an existing pool calls for bounds
    /// tightened to its current price.
    pub fn wide_first_deposit() -> Self {
        PriceBound {
            min: Price { n: 1, d: 10_000 },
            max: Price { n: 10_000, d: 1 },
        }
    }

    pub fn min(&self) -> Price {
        self.min
    }

    pub fn max(&self) -> Price {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;

    fn token_pair() -> (AssetIdentity, AssetIdentity) {
        let issuer = KeyPair::random().address();
        (
            AssetIdentity::Native,
            AssetIdentity::issued("LONGTOKEN", issuer).unwrap(),
        )
    }

    #[test]
    fn pool_id_is_deterministic() {
        let (native, token) = token_pair();
        let pool = LiquidityPoolDescriptor::constant_product(native.clone(), token.clone()).unwrap();
        assert_eq!(pool.id(), pool.id());

        let again = LiquidityPoolDescriptor::constant_product(native, token).unwrap();
        assert_eq!(pool.id(), again.id());
    }

    #[test]
    fn pool_id_ignores_argument_order() {
        let (native, token) = token_pair();
        let ab = LiquidityPoolDescriptor::constant_product(native.clone(), token.clone()).unwrap();
        let ba = LiquidityPoolDescriptor::constant_product(token, native).unwrap();
        assert_eq!(ab.id(), ba.id());
        assert_eq!(ab.asset_a(), ba.asset_a());
    }

    #[test]
    fn distinct_pairs_get_distinct_ids() {
        let issuer = KeyPair::random().address();
        let token_a = AssetIdentity::issued("TOKA", issuer).unwrap();
        let token_b = AssetIdentity::issued("TOKB", issuer).unwrap();
        let pool_a =
            LiquidityPoolDescriptor::constant_product(AssetIdentity::Native, token_a).unwrap();
        let pool_b =
            LiquidityPoolDescriptor::constant_product(AssetIdentity::Native, token_b).unwrap();
        assert_ne!(pool_a.id(), pool_b.id());
    }

    #[test]
    fn rejects_duplicate_assets() {
        assert!(matches!(
            LiquidityPoolDescriptor::constant_product(AssetIdentity::Native, AssetIdentity::Native),
            Err(PoolError::DuplicateAsset(_))
        ));
    }

    #[test]
    fn pool_id_hex_round_trips() {
        let (native, token) = token_pair();
        let id = LiquidityPoolDescriptor::constant_product(native, token)
            .unwrap()
            .id();
        assert_eq!(id.to_string().parse::<PoolId>().unwrap(), id);
    }

    #[test]
    fn price_must_be_strictly_positive() {
        assert!(Price::new(0, 1).is_err());
        assert!(Price::new(1, 0).is_err());
        assert!(Price::new(-1, 2).is_err());
        assert!(Price::new(1, 2).is_ok());
    }

    #[test]
    fn bound_rejects_min_above_max() {
        let min = Price::new(2, 1).unwrap();
        let max = Price::new(1, 2).unwrap();
        assert!(PriceBound::new(min, max).is_err());
        assert!(PriceBound::new(max, min).is_ok());
    }

    #[test]
    fn equal_bounds_are_allowed() {
        let p = Price::new(3, 7).unwrap();
        assert!(PriceBound::new(p, p).is_ok());
    }

    #[test]
    fn wide_bound_brackets_any_sane_ratio() {
        let wide = PriceBound::wide_first_deposit();
        // 100 native : 500000 token → ratio 1/5000, inside [1/10000, 10000].
        let (min, max) = (wide.min(), wide.max());
        let ratio_n = 1i64;
        let ratio_d = 5000i64;
        assert!((min.n as i64) * ratio_d <= ratio_n * (min.d as i64));
        assert!(ratio_n * (max.d as i64) <= (max.n as i64) * ratio_d);
    }
}
