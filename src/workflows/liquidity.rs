//! Liquidity-bootstrap workflow: preflight, then a pool-creating first
//! deposit.

use std::sync::Arc;

use tracing::info;

use crate::amount::Amount;
use crate::asset::AssetIdentity;
use crate::crypto::{Address, KeyPair, SecretString};
use crate::error::{BootstrapError, BuildError};
use crate::horizon::{LedgerClient, SubmissionResult};
use crate::pool::{LiquidityPoolDescriptor, PoolId, PriceBound};
use crate::preflight::PreflightValidator;
use crate::tx::{Operation, TrustLine, TxHash};
use crate::workflow::{Sequencer, WorkflowState, WorkflowStep};
use crate::workflows::step::{LedgerStep, StepContext};

/// What the liquidity bootstrap run produced, for the result artifact and
/// operator reference.
#[derive(Debug)]
pub struct LiquidityOutcome {
    pub pool_id: PoolId,
    pub state: WorkflowState,
    /// Hash and ledger of the accepted deposit transaction, when the run
    /// completed.
    pub accepted: Option<(TxHash, u32)>,
    /// The distributor's LP-share balance observed after the deposit, when
    /// Horizon already shows it.
    pub lp_share_balance: Option<Amount>,
}

/// The deposit itself is one atomic transaction of two operations: the
/// LP-share trustline and the pool deposit. The pool comes into existence
/// with the first accepted deposit; its identifier is computable up front
/// from the ordered asset pair.
pub struct LiquidityWorkflow<C> {
    ctx: Arc<StepContext<C>>,
    distributor: KeyPair,
    asset: AssetIdentity,
    pool: LiquidityPoolDescriptor,
    native_deposit: Amount,
    token_deposit: Amount,
    bounds: PriceBound,
}

impl<C: LedgerClient + 'static> LiquidityWorkflow<C> {
    pub fn prepare(
        ctx: Arc<StepContext<C>>,
        distributor_secret: Option<&SecretString>,
        token_code: Option<&str>,
        issuer_address: Option<&str>,
        native_deposit: Amount,
        token_deposit: Amount,
    ) -> Result<Self, BootstrapError> {
        let secret = distributor_secret.ok_or_else(|| {
            BootstrapError::Configuration("DISTRIBUTOR_SECRET is not set".to_string())
        })?;
        let distributor = KeyPair::from_secret_seed(secret.expose())?;

        let issuer: Address = issuer_address
            .ok_or_else(|| {
                BootstrapError::Configuration("ISSUER_PUBLIC_ADDRESS is not set".to_string())
            })?
            .trim()
            .parse()?;
        let code = token_code
            .ok_or_else(|| BootstrapError::Configuration("TOKEN_CODE is not set".to_string()))?;

        let asset = AssetIdentity::issued(code, issuer).map_err(BuildError::from)?;
        let pool =
            LiquidityPoolDescriptor::constant_product(AssetIdentity::Native, asset.clone())
                .map_err(BuildError::from)?;

        // Wide bounds: valid only for a first deposit into an empty pool.
        let bounds = PriceBound::wide_first_deposit();

        info!(
            distributor = %distributor.address(),
            asset = %asset,
            pool_id = %pool.id(),
            "liquidity workflow prepared"
        );
        Ok(Self {
            ctx,
            distributor,
            asset,
            pool,
            native_deposit,
            token_deposit,
            bounds,
        })
    }

    pub fn pool_id(&self) -> PoolId {
        self.pool.id()
    }

    pub async fn run(self) -> Result<LiquidityOutcome, BootstrapError> {
        let validator = PreflightValidator::new(self.ctx.client.clone());
        validator
            .check_liquidity_deposit(
                &self.distributor.address(),
                &self.asset,
                self.native_deposit,
                self.token_deposit,
            )
            .await?;
        info!("preflight checklist passed");

        // Informational only: the deposit is built the same way either
        // way. Tightening bounds to an existing pool's price is an open
        // gap, not implemented here.
        let pool_id = self.pool.id();
        if self.ctx.client.pool_exists(&pool_id).await? {
            info!(pool_id = %pool_id, "pool exists — adding liquidity");
        } else {
            info!(pool_id = %pool_id, "creating pool via first deposit");
        }

        let deposit = LedgerStep::new(
            "pool deposit",
            self.ctx.clone(),
            self.distributor.clone(),
            vec![
                Operation::ChangeTrust {
                    line: TrustLine::PoolShare(self.pool.clone()),
                    limit: Amount::MAX,
                },
                Operation::LiquidityPoolDeposit {
                    pool_id,
                    max_amount_a: self.native_deposit,
                    max_amount_b: self.token_deposit,
                    bounds: self.bounds,
                },
            ],
        );

        let mut sequencer = Sequencer::new("lp-bootstrap");
        let steps: Vec<Box<dyn WorkflowStep>> = vec![Box::new(deposit)];
        sequencer.run(steps).await;

        let accepted = sequencer.reports().iter().find_map(|r| match &r.result {
            SubmissionResult::Accepted { hash, ledger } => Some((*hash, *ledger)),
            _ => None,
        });

        let lp_share_balance = if accepted.is_some() {
            self.observe_lp_shares(&pool_id).await
        } else {
            None
        };

        Ok(LiquidityOutcome {
            pool_id,
            state: sequencer.state().clone(),
            accepted,
            lp_share_balance,
        })
    }

    /// Re-read the distributor account after the deposit. Horizon may lag;
    /// an absent share entry is reported, not an error.
    async fn observe_lp_shares(&self, pool_id: &PoolId) -> Option<Amount> {
        match self.ctx.client.get_account(&self.distributor.address()).await {
            Ok(Some(snapshot)) => match snapshot.pool_share(pool_id) {
                Some(entry) => {
                    info!(balance = %entry.balance, "LP share balance");
                    Some(entry.balance)
                }
                None => {
                    info!("LP shares not visible yet (check the ledger explorer)");
                    None
                }
            },
            _ => {
                info!("could not re-read distributor balances after deposit");
                None
            }
        }
    }
}
