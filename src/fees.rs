//! Fee estimation from ledger statistics.

use tracing::debug;

use crate::error::BootstrapError;
use crate::horizon::LedgerStats;

/// How to pick a fee from the network's statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeePolicy {
    /// The current base fee. Preferred for irreversible bootstrap
    /// transactions, where overpaying buys nothing.
    Conservative,

    /// The 70th-percentile charged fee when available, for congestion
    /// resilience; falls back to the base fee.
    Recommended,
}

/// Derive a fee-per-operation scalar from a statistics snapshot.
///
/// The base fee is the floor in both policies. A non-positive fee from the
/// network is a configuration failure — no transaction is ever built with
/// a zero or negative fee.
pub fn per_operation(stats: &LedgerStats, policy: FeePolicy) -> Result<i64, BootstrapError> {
    if stats.base_fee <= 0 {
        return Err(BootstrapError::Configuration(format!(
            "network reported a non-positive base fee ({})",
            stats.base_fee
        )));
    }

    let fee = match policy {
        FeePolicy::Conservative => stats.base_fee,
        FeePolicy::Recommended => match stats.recommended_p70 {
            Some(p70) if p70 > stats.base_fee => p70,
            _ => stats.base_fee,
        },
    };

    debug!(base_fee = stats.base_fee, p70 = ?stats.recommended_p70, fee, ?policy, "fee estimated");
    Ok(fee)
}
