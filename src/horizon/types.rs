//! Resource types for the ledger HTTP API.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::amount::Amount;
use crate::crypto::Address;
use crate::pool::PoolId;
use crate::tx::TxHash;

/// A point-in-time view of an on-ledger account.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountSnapshot {
    pub account_id: Address,

    /// Last confirmed sequence number. Horizon renders this as a string;
    /// it is parsed on deserialization.
    #[serde(deserialize_with = "i64_from_string")]
    pub sequence: i64,

    #[serde(default)]
    pub balances: Vec<BalanceEntry>,
}

impl AccountSnapshot {
    /// The native-asset balance, if the account reports one.
    pub fn native_balance(&self) -> Option<Amount> {
        self.balances
            .iter()
            .find(|b| b.asset_type == "native")
            .map(|b| b.balance)
    }

    /// The trustline entry for an issued asset, if present.
    pub fn trustline(&self, code: &str, issuer: &Address) -> Option<&BalanceEntry> {
        let issuer_str = issuer.to_string();
        self.balances.iter().find(|b| {
            b.asset_code.as_deref() == Some(code) && b.asset_issuer.as_deref() == Some(&issuer_str)
        })
    }

    /// The pool-share balance entry for a given pool, if present.
    pub fn pool_share(&self, pool_id: &PoolId) -> Option<&BalanceEntry> {
        let id_hex = pool_id.to_string();
        self.balances.iter().find(|b| {
            b.asset_type == "liquidity_pool_shares"
                && b.liquidity_pool_id
                    .as_deref()
                    .is_some_and(|id| id.eq_ignore_ascii_case(&id_hex))
        })
    }
}

/// One entry of an account's `balances[]` array.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceEntry {
    pub asset_type: String,
    #[serde(default)]
    pub asset_code: Option<String>,
    #[serde(default)]
    pub asset_issuer: Option<String>,
    #[serde(default)]
    pub liquidity_pool_id: Option<String>,
    pub balance: Amount,
}

/// Fee-relevant statistics from the latest ledger.
#[derive(Debug, Clone, Copy)]
pub struct LedgerStats {
    /// Base fee in stroops, from the latest closed ledger.
    pub base_fee: i64,

    /// 70th-percentile charged fee, when the network publishes fee
    /// statistics.
    pub recommended_p70: Option<i64>,
}

/// Terminal outcome of one submission attempt. Never mutated after
/// creation.
#[derive(Debug, Clone)]
pub enum SubmissionResult {
    /// The ledger included the transaction.
    Accepted { hash: TxHash, ledger: u32 },

    /// The network validated and rejected the transaction.
    Rejected { payload: RejectionPayload },

    /// The submission never reached a verdict (transport failure).
    NetworkFailure { message: String },
}

impl SubmissionResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmissionResult::Accepted { .. })
    }

    /// Escalate a non-accepted outcome into the error taxonomy: rejections
    /// become `Submission` errors carrying the ledger's payload, transport
    /// failures become `Network` errors.
    pub fn into_result(self) -> Result<(TxHash, u32), crate::error::BootstrapError> {
        match self {
            SubmissionResult::Accepted { hash, ledger } => Ok((hash, ledger)),
            SubmissionResult::Rejected { payload } => {
                Err(crate::error::BootstrapError::Submission(payload))
            }
            SubmissionResult::NetworkFailure { message } => {
                Err(crate::error::BootstrapError::Network(message))
            }
        }
    }

    /// One-line description for workflow reports.
    pub fn describe(&self) -> String {
        match self {
            SubmissionResult::Accepted { hash, ledger } => {
                format!("accepted in ledger {} ({})", ledger, hash)
            }
            SubmissionResult::Rejected { payload } => format!("rejected: {}", payload),
            SubmissionResult::NetworkFailure { message } => {
                format!("network failure: {}", message)
            }
        }
    }
}

/// The ledger's structured rejection body, carried verbatim for diagnosis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionPayload {
    pub status: u16,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub result_codes: Option<ResultCodes>,
    /// The full response body, untouched.
    pub raw: serde_json::Value,
}

/// Result codes extracted from the rejection body's `extras`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultCodes {
    #[serde(default)]
    pub transaction: Option<String>,
    #[serde(default)]
    pub operations: Vec<String>,
}

impl RejectionPayload {
    /// Parse a 4xx response body. Non-JSON bodies are preserved as a raw
    /// string value.
    pub fn from_body(status: u16, body: &str) -> Self {
        let raw: serde_json::Value = serde_json::from_str(body)
            .unwrap_or_else(|_| serde_json::Value::String(body.to_string()));

        let title = raw
            .get("title")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let detail = raw
            .get("detail")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let result_codes = raw
            .get("extras")
            .and_then(|e| e.get("result_codes"))
            .and_then(|rc| serde_json::from_value(rc.clone()).ok());

        RejectionPayload {
            status,
            title,
            detail,
            result_codes,
            raw,
        }
    }
}

impl fmt::Display for RejectionPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status {}", self.status)?;
        if let Some(title) = &self.title {
            write!(f, " {}", title)?;
        }
        if let Some(codes) = &self.result_codes {
            if let Some(tx) = &codes.transaction {
                write!(f, " [{}", tx)?;
                if !codes.operations.is_empty() {
                    write!(f, ": {}", codes.operations.join(", "))?;
                }
                write!(f, "]")?;
            }
        }
        Ok(())
    }
}

/// A transaction touching a pool, as listed by the pool-transactions
/// resource.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRecord {
    pub hash: String,
    pub created_at: DateTime<Utc>,
}

/// An operation touching a pool, as listed by the pool-operations resource.
#[derive(Debug, Clone, Deserialize)]
pub struct OperationRecord {
    pub id: String,
    pub source_account: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

fn i64_from_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}
