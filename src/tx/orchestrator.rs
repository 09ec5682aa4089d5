//! Build, sign, and submit transactions.

use std::sync::Arc;

use tracing::{info, warn};

use crate::crypto::{Address, KeyPair};
use crate::error::BuildError;
use crate::horizon::{LedgerClient, SubmissionResult};
use crate::tx::plan::{DecoratedSignature, Network, SignedEnvelope, TransactionPlan};
use crate::tx::Operation;

/// Assembles operation sets into plans, signs them with the correct keys,
/// and submits them through the ledger client.
///
/// Submission outcomes are values, not errors: a ledger rejection carries
/// the network's structured payload and is never retried here — the
/// operator decides on a fix (bump sequence, adjust bounds) and re-runs.
pub struct Orchestrator<C> {
    client: Arc<C>,
    network: Network,
}

impl<C: LedgerClient> Orchestrator<C> {
    pub fn new(client: Arc<C>, network: Network) -> Self {
        Self { client, network }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Assemble a validated transaction plan.
    pub fn build(
        &self,
        source: Address,
        sequence: i64,
        fee_per_operation: i64,
        operations: Vec<Operation>,
        timeout_secs: u64,
    ) -> Result<TransactionPlan, BuildError> {
        TransactionPlan::new(source, sequence, fee_per_operation, operations, timeout_secs)
    }

    /// Sign a plan with exactly the keys whose accounts the transaction
    /// names. A missing source key or an unrelated extra key is a build
    /// error — signing never proceeds partially.
    pub fn sign(
        &self,
        plan: TransactionPlan,
        keys: &[&KeyPair],
    ) -> Result<SignedEnvelope, BuildError> {
        let source = plan.source();
        if !keys.iter().any(|k| k.address() == source) {
            return Err(BuildError::MissingSigner(source));
        }
        if let Some(stranger) = keys.iter().find(|k| k.address() != source) {
            return Err(BuildError::UnexpectedSigner(stranger.address()));
        }

        let hash = plan.content_hash(&self.network);
        let signatures: Vec<DecoratedSignature> = keys
            .iter()
            .map(|key| DecoratedSignature {
                hint: key.address().hint(),
                signature: key.sign(hash.as_bytes()).to_vec(),
            })
            .collect();

        Ok(SignedEnvelope::assemble(plan, hash, signatures))
    }

    /// Submit a signed envelope and classify the outcome.
    pub async fn submit(&self, envelope: &SignedEnvelope) -> SubmissionResult {
        let result = self.client.submit(envelope).await;
        match &result {
            SubmissionResult::Accepted { hash, ledger } => {
                info!(hash = %hash, ledger = %ledger, "transaction accepted");
            }
            SubmissionResult::Rejected { payload } => {
                warn!(payload = %payload, "ledger rejected transaction");
            }
            SubmissionResult::NetworkFailure { message } => {
                warn!(error = %message, "submission failed before reaching a verdict");
            }
        }
        result
    }
}
