//! Ledger client adapter.
//!
//! A thin capability interface over the ledger's HTTP API: account lookup,
//! fee/ledger statistics, pool existence probe, and transaction submission.
//! Network I/O only — no retries are performed here; failures surface
//! verbatim to the caller. A missing account is `Ok(None)`, distinct from a
//! transport failure, because the former is a terminal precondition failure
//! while the latter might be retried by a caller's policy (this system has
//! none).

mod client;
mod types;

pub use client::HorizonClient;
pub use types::{
    AccountSnapshot, BalanceEntry, LedgerStats, OperationRecord, RejectionPayload, ResultCodes,
    SubmissionResult, TransactionRecord,
};

use async_trait::async_trait;
use thiserror::Error;

use crate::crypto::Address;
use crate::pool::PoolId;
use crate::tx::SignedEnvelope;

/// Transport and decoding failures from the ledger HTTP API.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("transport error talking to {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    #[error("unexpected status {status} from {endpoint}")]
    UnexpectedStatus { endpoint: String, status: u16 },

    #[error("malformed response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

/// Capability interface consumed by the orchestrator and validators.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Fetch an account snapshot. `Ok(None)` means the ledger has no such
    /// account.
    async fn get_account(&self, address: &Address) -> Result<Option<AccountSnapshot>, ClientError>;

    /// Current base fee and, when the network publishes one, a
    /// percentile-based fee recommendation.
    async fn latest_ledger_stats(&self) -> Result<LedgerStats, ClientError>;

    /// Whether a liquidity pool with this identifier exists on-ledger.
    async fn pool_exists(&self, pool_id: &PoolId) -> Result<bool, ClientError>;

    /// Submit a signed envelope. Expected rejections come back as the
    /// `Rejected` variant, transport failures as `NetworkFailure` — this
    /// call does not error.
    async fn submit(&self, envelope: &SignedEnvelope) -> SubmissionResult;
}
