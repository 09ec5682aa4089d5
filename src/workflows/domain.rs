//! Issuer home-domain workflow.

use std::sync::Arc;

use tracing::info;

use crate::crypto::{KeyPair, SecretString};
use crate::error::BootstrapError;
use crate::horizon::LedgerClient;
use crate::tx::Operation;
use crate::workflow::{Sequencer, WorkflowStep};
use crate::workflows::step::{LedgerStep, StepContext};

/// Single-step workflow: the issuer sets its home domain so wallets and
/// explorers can resolve the token's metadata.
pub struct DomainWorkflow<C> {
    ctx: Arc<StepContext<C>>,
    issuer: KeyPair,
    home_domain: String,
}

impl<C: LedgerClient + 'static> DomainWorkflow<C> {
    pub fn prepare(
        ctx: Arc<StepContext<C>>,
        issuer_secret: Option<&SecretString>,
        home_domain: Option<&str>,
    ) -> Result<Self, BootstrapError> {
        let secret = issuer_secret.ok_or_else(|| {
            BootstrapError::Configuration("ISSUER_SECRET is not set".to_string())
        })?;
        let issuer = KeyPair::from_secret_seed(secret.expose())?;

        let home_domain = home_domain
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| BootstrapError::Configuration("HOME_DOMAIN is not set".to_string()))?
            .to_string();

        info!(issuer = %issuer.address(), home_domain = %home_domain, "home-domain workflow prepared");
        Ok(Self {
            ctx,
            issuer,
            home_domain,
        })
    }

    pub async fn run(self) -> Sequencer {
        let step = LedgerStep::new(
            "set home domain",
            self.ctx.clone(),
            self.issuer.clone(),
            vec![Operation::SetOptions {
                home_domain: self.home_domain.clone(),
            }],
        );

        let mut sequencer = Sequencer::new("set-domain");
        let steps: Vec<Box<dyn WorkflowStep>> = vec![Box::new(step)];
        sequencer.run(steps).await;
        sequencer
    }
}
