//! The per-step submission pipeline shared by all workflows.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::crypto::KeyPair;
use crate::error::BootstrapError;
use crate::fees::{self, FeePolicy};
use crate::horizon::{LedgerClient, SubmissionResult};
use crate::sequence::SequenceCache;
use crate::tx::{Operation, Orchestrator};
use crate::workflow::WorkflowStep;

/// Shared services a ledger step needs: the client, the orchestrator, the
/// sequence cache, and the fee policy for this run.
pub struct StepContext<C> {
    pub client: Arc<C>,
    pub orchestrator: Orchestrator<C>,
    pub sequences: SequenceCache<C>,
    pub fee_policy: FeePolicy,
    pub timeout_secs: u64,
}

impl<C: LedgerClient> StepContext<C> {
    pub fn new(
        client: Arc<C>,
        orchestrator: Orchestrator<C>,
        fee_policy: FeePolicy,
        timeout_secs: u64,
    ) -> Self {
        let sequences = SequenceCache::new(client.clone());
        Self {
            client,
            orchestrator,
            sequences,
            fee_policy,
            timeout_secs,
        }
    }
}

/// One transaction as a workflow step: estimate the fee, reserve the
/// signer's next sequence number, build and sign the plan, submit, and on
/// acceptance record the consumed sequence.
pub struct LedgerStep<C> {
    name: String,
    ctx: Arc<StepContext<C>>,
    signer: KeyPair,
    operations: Vec<Operation>,
}

impl<C: LedgerClient> LedgerStep<C> {
    pub fn new(
        name: impl Into<String>,
        ctx: Arc<StepContext<C>>,
        signer: KeyPair,
        operations: Vec<Operation>,
    ) -> Self {
        Self {
            name: name.into(),
            ctx,
            signer,
            operations,
        }
    }
}

#[async_trait]
impl<C: LedgerClient + 'static> WorkflowStep for LedgerStep<C> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&mut self) -> Result<SubmissionResult, BootstrapError> {
        let stats = self.ctx.client.latest_ledger_stats().await?;
        let fee = fees::per_operation(&stats, self.ctx.fee_policy)?;

        let source = self.signer.address();
        let sequence = self.ctx.sequences.next_sequence(&source).await?;
        debug!(
            step = %self.name,
            source = %source,
            sequence,
            fee,
            operations = self.operations.len(),
            "building transaction"
        );

        let plan = self.ctx.orchestrator.build(
            source,
            sequence,
            fee,
            self.operations.clone(),
            self.ctx.timeout_secs,
        )?;
        let envelope = self.ctx.orchestrator.sign(plan, &[&self.signer])?;

        let result = self.ctx.orchestrator.submit(&envelope).await;
        if result.is_accepted() {
            self.ctx.sequences.mark_submitted(&source, sequence);
        }
        Ok(result)
    }
}
