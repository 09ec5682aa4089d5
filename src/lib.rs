//! Asset bootstrap toolkit for a Stellar-style ledger.
//!
//! Issues and bootstraps a custom asset: trustline creation, supply mint,
//! home-domain setup, and a pool-creating first liquidity deposit, plus
//! post-hoc analytics over pool activity.
//!
//! The core is the transaction orchestration path: fee estimation,
//! per-account sequence tracking, multi-operation transaction assembly,
//! preflight safety validation, signing, submission, and response
//! classification across dependent multi-step workflows.

pub mod amount;
pub mod analytics;
pub mod asset;
pub mod config;
pub mod crypto;
pub mod error;
pub mod fees;
pub mod horizon;
pub mod pool;
pub mod preflight;
pub mod report;
pub mod sequence;
pub mod tx;
pub mod workflow;
pub mod workflows;

// Re-export the types most callers touch.
pub use amount::Amount;
pub use config::BootstrapConfig;
pub use error::{BootstrapError, BuildError};
pub use horizon::{HorizonClient, LedgerClient, SubmissionResult};
pub use workflow::{Sequencer, WorkflowState};
