//! Preflight safety checks.
//!
//! Read-only validation gating irreversible on-ledger actions. Every check
//! runs before any transaction is built; a failure aborts the workflow
//! before any network-mutating call, with a machine-distinguishable reason
//! the operator can act on.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::amount::Amount;
use crate::asset::AssetIdentity;
use crate::crypto::{Address, KeyPair, SecretString};
use crate::error::BootstrapError;
use crate::horizon::{AccountSnapshot, LedgerClient};
use crate::pool::{Price, PriceBound};

/// Machine-distinguishable preflight failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreflightReason {
    InsufficientBalance,
    MissingTrustline,
    InvalidPriceBounds,
    MissingCredential,
    AccountNotFound,
}

/// A failed safety check. Fatal for the current run; actionable by the
/// operator.
#[derive(Debug, Clone, Error)]
pub enum PreflightError {
    #[error("insufficient {asset} on {account}: have {available}, need {required}")]
    InsufficientBalance {
        account: Address,
        asset: String,
        available: Amount,
        required: Amount,
    },

    #[error("{account} holds no trustline for {asset} — create the asset trustline first")]
    MissingTrustline { account: Address, asset: String },

    #[error("invalid price bounds: {0}")]
    InvalidPriceBounds(String),

    #[error("missing credential: {0}")]
    MissingCredential(String),

    #[error("account {account} does not exist on the ledger")]
    AccountNotFound { account: Address },
}

impl PreflightError {
    pub fn reason(&self) -> PreflightReason {
        match self {
            Self::InsufficientBalance { .. } => PreflightReason::InsufficientBalance,
            Self::MissingTrustline { .. } => PreflightReason::MissingTrustline,
            Self::InvalidPriceBounds(_) => PreflightReason::InvalidPriceBounds,
            Self::MissingCredential(_) => PreflightReason::MissingCredential,
            Self::AccountNotFound { .. } => PreflightReason::AccountNotFound,
        }
    }
}

/// Decoded credentials for the mint workflow.
#[derive(Debug)]
pub struct MintCredentials {
    pub issuer: KeyPair,
    pub distributor: KeyPair,
    pub token_code: String,
}

/// Check that both mint secrets are present and well-formed and the token
/// code is usable. Pure — no network access.
pub fn check_mint_credentials(
    issuer_secret: Option<&SecretString>,
    distributor_secret: Option<&SecretString>,
    token_code: Option<&str>,
) -> Result<MintCredentials, PreflightError> {
    let issuer = decode_secret("issuer", issuer_secret)?;
    let distributor = decode_secret("distributor", distributor_secret)?;
    let token_code = token_code
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| PreflightError::MissingCredential("TOKEN_CODE is not set".into()))?;
    Ok(MintCredentials {
        issuer,
        distributor,
        token_code: token_code.to_string(),
    })
}

fn decode_secret(role: &str, secret: Option<&SecretString>) -> Result<KeyPair, PreflightError> {
    let secret = secret.ok_or_else(|| {
        PreflightError::MissingCredential(format!("{} secret is not set", role))
    })?;
    KeyPair::from_secret_seed(secret.expose()).map_err(|e| {
        PreflightError::MissingCredential(format!("{} secret is not a valid seed: {}", role, e))
    })
}

/// Validate a price band. For a not-yet-existing pool the band must be wide
/// enough to accept an arbitrary initial ratio; [`PriceBound::wide_first_deposit`]
/// satisfies that. An existing pool calls for bounds tightened to its
/// current price — this system always uses the wide band and is therefore
/// only correct for first-deposit scenarios.
pub fn check_price_bounds(min: Price, max: Price) -> Result<PriceBound, PreflightError> {
    PriceBound::new(min, max).map_err(|e| PreflightError::InvalidPriceBounds(e.to_string()))
}

/// Validator for checks that need ledger state.
pub struct PreflightValidator<C> {
    client: Arc<C>,
}

impl<C: LedgerClient> PreflightValidator<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// The liquidity-bootstrap checklist, evaluated against the
    /// distributor's current balances:
    ///
    /// - native balance ≥ deposit + one whole unit (fee and dust margin)
    /// - a trustline for the target asset with balance ≥ the token deposit
    ///
    /// A missing asset trustline fails fast rather than being auto-created;
    /// it is an explicit prerequisite, unlike the LP-share trustline which
    /// the deposit transaction creates itself. Thresholds are inclusive: a
    /// balance exactly equal to the requirement passes.
    pub async fn check_liquidity_deposit(
        &self,
        distributor: &Address,
        asset: &AssetIdentity,
        native_deposit: Amount,
        token_deposit: Amount,
    ) -> Result<AccountSnapshot, BootstrapError> {
        let snapshot = self
            .client
            .get_account(distributor)
            .await?
            .ok_or(PreflightError::AccountNotFound {
                account: *distributor,
            })?;

        let required_native = native_deposit.checked_add(Amount::ONE).ok_or_else(|| {
            BootstrapError::Configuration(format!(
                "native deposit {} overflows the ledger's amount range",
                native_deposit
            ))
        })?;

        let native = snapshot.native_balance().unwrap_or(Amount::ZERO);
        info!(account = %distributor, balance = %native, required = %required_native, "native balance check");
        if native < required_native {
            return Err(PreflightError::InsufficientBalance {
                account: *distributor,
                asset: "native".into(),
                available: native,
                required: required_native,
            }
            .into());
        }

        let code = asset.code().unwrap_or_default();
        let issuer = asset.issuer().ok_or_else(|| {
            BootstrapError::Configuration("deposit asset must be an issued asset".into())
        })?;
        let line = snapshot.trustline(code, &issuer).ok_or_else(|| {
            PreflightError::MissingTrustline {
                account: *distributor,
                asset: asset.to_string(),
            }
        })?;

        info!(account = %distributor, asset = %asset, balance = %line.balance, required = %token_deposit, "trustline balance check");
        if line.balance < token_deposit {
            return Err(PreflightError::InsufficientBalance {
                account: *distributor,
                asset: asset.to_string(),
                available: line.balance,
                required: token_deposit,
            }
            .into());
        }

        Ok(snapshot)
    }
}
