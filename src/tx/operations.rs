//! The operation vocabulary used by the bootstrap workflows.

use serde::Serialize;

use crate::amount::Amount;
use crate::asset::AssetIdentity;
use crate::crypto::Address;
use crate::error::BuildError;
use crate::pool::{LiquidityPoolDescriptor, PoolId, PriceBound};

/// What a trustline authorizes an account to hold: an issued asset or a
/// pool's share class.
#[derive(Debug, Clone, Serialize)]
pub enum TrustLine {
    Asset(AssetIdentity),
    PoolShare(LiquidityPoolDescriptor),
}

/// A single ledger operation. Several operations in one plan commit
/// atomically; the workflows lean on that for compound actions like
/// "create LP-share trustline, then deposit" in one transaction.
#[derive(Debug, Clone, Serialize)]
pub enum Operation {
    /// Authorize the source account to hold `line`, up to `limit`.
    ChangeTrust { line: TrustLine, limit: Amount },

    /// Send `amount` of `asset` to `destination`. A payment from the
    /// asset's issuer is a mint.
    Payment {
        destination: Address,
        asset: AssetIdentity,
        amount: Amount,
    },

    /// Update the source account's home domain.
    SetOptions { home_domain: String },

    /// Deposit into a constant-product pool, bounded by a price band.
    LiquidityPoolDeposit {
        pool_id: PoolId,
        max_amount_a: Amount,
        max_amount_b: Amount,
        bounds: PriceBound,
    },
}

impl Operation {
    /// Reject malformed operations before a plan is formed.
    pub fn validate(&self) -> Result<(), BuildError> {
        match self {
            Operation::ChangeTrust { limit, .. } => {
                if !limit.is_positive() {
                    return Err(BuildError::NonPositiveAmount {
                        context: "change_trust limit",
                        amount: limit.to_string(),
                    });
                }
            }
            Operation::Payment { amount, .. } => {
                if !amount.is_positive() {
                    return Err(BuildError::NonPositiveAmount {
                        context: "payment amount",
                        amount: amount.to_string(),
                    });
                }
            }
            Operation::SetOptions { home_domain } => {
                if home_domain.len() > 32 {
                    return Err(BuildError::HomeDomainTooLong(home_domain.clone()));
                }
            }
            Operation::LiquidityPoolDeposit {
                max_amount_a,
                max_amount_b,
                ..
            } => {
                for (context, amount) in [
                    ("deposit max_amount_a", max_amount_a),
                    ("deposit max_amount_b", max_amount_b),
                ] {
                    if !amount.is_positive() {
                        return Err(BuildError::NonPositiveAmount {
                            context,
                            amount: amount.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Operation::ChangeTrust { .. } => "change_trust",
            Operation::Payment { .. } => "payment",
            Operation::SetOptions { .. } => "set_options",
            Operation::LiquidityPoolDeposit { .. } => "liquidity_pool_deposit",
        }
    }
}
