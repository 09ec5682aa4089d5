//! Per-account sequence-number tracking.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::crypto::Address;
use crate::error::BootstrapError;
use crate::horizon::LedgerClient;
use crate::preflight::PreflightError;

/// Tracks the last confirmed sequence number per account and hands out the
/// next usable one.
///
/// `next_sequence` is a pure function of the last confirmed state: calling
/// it twice without an intervening confirmed submission yields the same
/// value. The returned value must be consumed by exactly one submission —
/// reusing it for a second transaction produces a colliding sequence number
/// on-ledger. After an accepted submission, `mark_submitted` records the
/// consumed value so a lagging ledger view can never hand the same number
/// out again.
///
/// Operational constraint: the re-query strategy means at most one
/// in-flight, unconfirmed transaction per account is safe. Two independent
/// processes acting on the same account can still race each other.
pub struct SequenceCache<C> {
    client: Arc<C>,
    confirmed: Mutex<HashMap<Address, i64>>,
}

impl<C: LedgerClient> SequenceCache<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            confirmed: Mutex::new(HashMap::new()),
        }
    }

    /// The next sequence number for `account`: its current confirmed
    /// sequence plus one.
    pub async fn next_sequence(&self, account: &Address) -> Result<i64, BootstrapError> {
        let snapshot = self
            .client
            .get_account(account)
            .await?
            .ok_or(PreflightError::AccountNotFound { account: *account })?;

        let mut confirmed = self.confirmed.lock().expect("sequence cache poisoned");
        let entry = confirmed.entry(*account).or_insert(snapshot.sequence);
        if snapshot.sequence < *entry {
            warn!(
                account = %account,
                queried = snapshot.sequence,
                cached = *entry,
                "ledger returned a stale sequence, keeping the cached value"
            );
        }
        *entry = (*entry).max(snapshot.sequence);
        let next = *entry + 1;
        debug!(account = %account, sequence = next, "sequence reserved");
        Ok(next)
    }

    /// Record that `account` consumed `sequence` in an accepted
    /// transaction, invalidating the pre-submission cache state.
    pub fn mark_submitted(&self, account: &Address, sequence: i64) {
        let mut confirmed = self.confirmed.lock().expect("sequence cache poisoned");
        let entry = confirmed.entry(*account).or_insert(sequence);
        *entry = (*entry).max(sequence);
        debug!(account = %account, sequence, "sequence confirmed");
    }
}
