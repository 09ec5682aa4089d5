//! Shared test fixtures: a scriptable in-memory ledger client.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use pi_bootstrap::crypto::Address;
use pi_bootstrap::horizon::{
    AccountSnapshot, ClientError, LedgerClient, LedgerStats, RejectionPayload, SubmissionResult,
};
use pi_bootstrap::pool::PoolId;
use pi_bootstrap::tx::SignedEnvelope;

/// What the fake should answer to the next submission.
pub enum Verdict {
    Accept,
    Reject(&'static str),
}

/// A record of one submission the fake ledger saw.
pub struct Submission {
    pub source: Address,
    pub sequence: i64,
    pub operation_labels: Vec<&'static str>,
    pub signature_count: usize,
}

/// In-memory ledger: seeded accounts, a base fee, and a script of
/// submission verdicts (defaulting to accept). An accepted submission
/// advances the source account's stored sequence, so dependent steps see
/// the confirmed on-ledger effect.
pub struct FakeLedger {
    accounts: Mutex<HashMap<Address, serde_json::Value>>,
    stats: LedgerStats,
    verdicts: Mutex<VecDeque<Verdict>>,
    pub submissions: Mutex<Vec<Submission>>,
    next_ledger: Mutex<u32>,
}

impl FakeLedger {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            stats: LedgerStats {
                base_fee: 1_000_000,
                recommended_p70: Some(1_500_000),
            },
            verdicts: Mutex::new(VecDeque::new()),
            submissions: Mutex::new(Vec::new()),
            next_ledger: Mutex::new(5000),
        }
    }

    /// Seed an account with a sequence number and a balances array given
    /// as (asset_type, asset_code, asset_issuer, balance) tuples.
    pub fn seed_account(
        &self,
        address: Address,
        sequence: i64,
        balances: &[(&str, Option<&str>, Option<&str>, &str)],
    ) {
        let balances_json: Vec<serde_json::Value> = balances
            .iter()
            .map(|(asset_type, code, issuer, balance)| {
                let mut entry = serde_json::json!({
                    "asset_type": asset_type,
                    "balance": balance,
                });
                if let Some(code) = code {
                    entry["asset_code"] = serde_json::json!(code);
                }
                if let Some(issuer) = issuer {
                    entry["asset_issuer"] = serde_json::json!(issuer);
                }
                entry
            })
            .collect();

        let value = serde_json::json!({
            "account_id": address.to_string(),
            "sequence": sequence.to_string(),
            "balances": balances_json,
        });
        self.accounts.lock().unwrap().insert(address, value);
    }

    pub fn script_verdicts(&self, verdicts: Vec<Verdict>) {
        *self.verdicts.lock().unwrap() = verdicts.into();
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }
}

#[async_trait]
impl LedgerClient for FakeLedger {
    async fn get_account(&self, address: &Address) -> Result<Option<AccountSnapshot>, ClientError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .get(address)
            .map(|v| serde_json::from_value(v.clone()).expect("seeded account is valid")))
    }

    async fn latest_ledger_stats(&self) -> Result<LedgerStats, ClientError> {
        Ok(self.stats)
    }

    async fn pool_exists(&self, _pool_id: &PoolId) -> Result<bool, ClientError> {
        Ok(false)
    }

    async fn submit(&self, envelope: &SignedEnvelope) -> SubmissionResult {
        let plan = envelope.plan();
        self.submissions.lock().unwrap().push(Submission {
            source: plan.source(),
            sequence: plan.sequence(),
            operation_labels: plan.operations().iter().map(|op| op.label()).collect(),
            signature_count: envelope.signatures().len(),
        });

        let verdict = self
            .verdicts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Verdict::Accept);

        match verdict {
            Verdict::Accept => {
                // Confirmed on-ledger effect: the source account's sequence
                // advances to the consumed value.
                if let Some(account) = self.accounts.lock().unwrap().get_mut(&plan.source()) {
                    account["sequence"] = serde_json::json!(plan.sequence().to_string());
                }
                let mut ledger = self.next_ledger.lock().unwrap();
                *ledger += 1;
                SubmissionResult::Accepted {
                    hash: envelope.hash(),
                    ledger: *ledger,
                }
            }
            Verdict::Reject(body) => SubmissionResult::Rejected {
                payload: RejectionPayload::from_body(400, body),
            },
        }
    }
}
