//! Concrete bootstrap workflows: mint, home domain, liquidity bootstrap.
//!
//! Each workflow runs its preflight checks up front, then drives the
//! sequencer through one or more ledger steps built from the shared
//! per-step pipeline in [`step`].

mod domain;
mod liquidity;
mod mint;
mod step;

pub use domain::DomainWorkflow;
pub use liquidity::{LiquidityOutcome, LiquidityWorkflow};
pub use mint::MintWorkflow;
pub use step::{LedgerStep, StepContext};
