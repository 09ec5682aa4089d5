//! Error taxonomy for the bootstrap workflows.
//!
//! Five terminal categories, mirroring the stages of a workflow step:
//! configuration problems (no network call attempted), preflight failures,
//! malformed operation sets, ledger-rejected submissions, and transport
//! failures. Every error halts the current workflow step; nothing here is
//! retried automatically, because a retry against an already-rejected
//! transaction would reuse a stale sequence number.

use thiserror::Error;

use crate::amount::AmountError;
use crate::asset::AssetError;
use crate::crypto::{Address, KeyError};
use crate::horizon::{ClientError, RejectionPayload};
use crate::pool::PoolError;
use crate::preflight::PreflightError;

/// Top-level error for a workflow step.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Missing or placeholder credentials/parameters. Fatal before any
    /// network call.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A safety check failed before the transaction was built.
    #[error(transparent)]
    Preflight(#[from] PreflightError),

    /// The operation set could not form a valid transaction plan.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// The network validated and rejected the transaction. Carries the
    /// ledger's structured rejection payload verbatim for diagnosis.
    #[error("ledger rejected transaction: {0}")]
    Submission(RejectionPayload),

    /// Transport-level failure talking to the ledger.
    #[error("network failure: {0}")]
    Network(String),
}

impl BootstrapError {
    /// Stable category label for logs.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Preflight(_) => "preflight",
            Self::Build(_) => "build",
            Self::Submission(_) => "submission",
            Self::Network(_) => "network",
        }
    }

    /// True when the failure happened before anything was sent to the
    /// ledger, i.e. re-running is always safe.
    pub fn before_submission(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::Preflight(_) | Self::Build(_)
        )
    }
}

impl From<ClientError> for BootstrapError {
    fn from(err: ClientError) -> Self {
        BootstrapError::Network(err.to_string())
    }
}

impl From<KeyError> for BootstrapError {
    fn from(err: KeyError) -> Self {
        BootstrapError::Configuration(err.to_string())
    }
}

/// A malformed operation set or plan parameter, caught before signing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("transaction plan has no operations")]
    EmptyOperations,

    #[error("{context}: amount must be strictly positive, got {amount}")]
    NonPositiveAmount {
        context: &'static str,
        amount: String,
    },

    #[error("home domain '{0}' exceeds 32 characters")]
    HomeDomainTooLong(String),

    #[error("fee per operation must be strictly positive, got {0}")]
    NonPositiveFee(i64),

    #[error("sequence number must be strictly positive, got {0}")]
    InvalidSequence(i64),

    #[error("no signing key provided for transaction source {0}")]
    MissingSigner(Address),

    #[error("signing key {0} does not match any account named by the transaction")]
    UnexpectedSigner(Address),

    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Pool(#[from] PoolError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_are_stable() {
        assert_eq!(
            BootstrapError::Configuration("x".into()).category(),
            "configuration"
        );
        assert_eq!(
            BootstrapError::Network("down".into()).category(),
            "network"
        );
    }

    #[test]
    fn pre_submission_errors_are_safe_to_rerun() {
        assert!(BootstrapError::Configuration("x".into()).before_submission());
        assert!(BootstrapError::Build(BuildError::EmptyOperations).before_submission());
        assert!(!BootstrapError::Network("down".into()).before_submission());
    }
}
