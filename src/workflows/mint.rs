//! Trustline → mint-payment workflow.

use std::sync::Arc;

use tracing::info;

use crate::amount::Amount;
use crate::asset::AssetIdentity;
use crate::crypto::{KeyPair, SecretString};
use crate::error::BootstrapError;
use crate::horizon::LedgerClient;
use crate::preflight::{self, MintCredentials};
use crate::tx::{Operation, TrustLine};
use crate::workflow::{Sequencer, WorkflowState, WorkflowStep};
use crate::workflows::step::{LedgerStep, StepContext};

/// Two dependent steps, each with its own signing account:
///
/// 1. the distributor creates a trustline for the token (its transaction,
///    its sequence number), then
/// 2. the issuer pays the minted supply to the distributor — which only
///    succeeds once the trustline from step 1 has landed.
///
/// The sequencer makes a partial failure visible: an accepted trustline
/// with a rejected mint leaves the run `Failed` at step 2 with step 1's
/// result still on record.
pub struct MintWorkflow<C> {
    ctx: Arc<StepContext<C>>,
    issuer: KeyPair,
    distributor: KeyPair,
    asset: AssetIdentity,
    mint_amount: Amount,
    mint_limit: Amount,
}

impl<C: LedgerClient + 'static> MintWorkflow<C> {
    /// Validate credentials and assemble the workflow. Fails before any
    /// network call when a secret is missing or malformed.
    pub fn prepare(
        ctx: Arc<StepContext<C>>,
        issuer_secret: Option<&SecretString>,
        distributor_secret: Option<&SecretString>,
        token_code: Option<&str>,
        mint_amount: Amount,
        mint_limit: Amount,
    ) -> Result<Self, BootstrapError> {
        let MintCredentials {
            issuer,
            distributor,
            token_code,
        } = preflight::check_mint_credentials(issuer_secret, distributor_secret, token_code)?;

        let asset = AssetIdentity::issued(&token_code, issuer.address())
            .map_err(crate::error::BuildError::from)?;

        info!(issuer = %issuer.address(), distributor = %distributor.address(), asset = %asset, "mint workflow prepared");
        Ok(Self {
            ctx,
            issuer,
            distributor,
            asset,
            mint_amount,
            mint_limit,
        })
    }

    pub async fn run(self) -> Sequencer {
        let trustline = LedgerStep::new(
            "create trustline",
            self.ctx.clone(),
            self.distributor.clone(),
            vec![Operation::ChangeTrust {
                line: TrustLine::Asset(self.asset.clone()),
                limit: self.mint_limit,
            }],
        );
        let mint = LedgerStep::new(
            "mint payment",
            self.ctx.clone(),
            self.issuer.clone(),
            vec![Operation::Payment {
                destination: self.distributor.address(),
                asset: self.asset.clone(),
                amount: self.mint_amount,
            }],
        );

        let mut sequencer = Sequencer::new("mint");
        let steps: Vec<Box<dyn WorkflowStep>> = vec![Box::new(trustline), Box::new(mint)];
        sequencer.run(steps).await;

        if *sequencer.state() == WorkflowState::Completed {
            self.report_distributor_balances().await;
        }
        sequencer
    }

    /// Post-mint balance listing, matching the operator's final check.
    /// Read-only; a failure here does not change the workflow outcome.
    async fn report_distributor_balances(&self) {
        match self.ctx.client.get_account(&self.distributor.address()).await {
            Ok(Some(snapshot)) => {
                for entry in &snapshot.balances {
                    match entry.asset_code.as_deref() {
                        Some(code) => info!(asset = code, balance = %entry.balance, "distributor balance"),
                        None => info!(asset = %entry.asset_type, balance = %entry.balance, "distributor balance"),
                    }
                }
            }
            Ok(None) => info!("distributor account not found while listing balances"),
            Err(e) => info!(error = %e, "could not list distributor balances"),
        }
    }
}
