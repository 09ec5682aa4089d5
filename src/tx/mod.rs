//! Transaction assembly: operations, plans, envelopes, and the
//! orchestrator that builds, signs, and submits them.

mod operations;
mod orchestrator;
mod plan;

pub use operations::{Operation, TrustLine};
pub use orchestrator::Orchestrator;
pub use plan::{DecoratedSignature, Network, SignedEnvelope, TransactionPlan, TxHash};
