//! Transaction plans, content hashing, and signed envelopes.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::crypto::Address;
use crate::error::BuildError;
use crate::tx::Operation;

/// Network identity: the passphrase and its hash, mixed into every content
/// hash so a signature for one network can never validate on another.
#[derive(Debug, Clone)]
pub struct Network {
    passphrase: String,
    id: [u8; 32],
}

impl Network {
    pub fn new(passphrase: &str) -> Self {
        let id = Sha256::digest(passphrase.as_bytes()).into();
        Network {
            passphrase: passphrase.to_string(),
            id,
        }
    }

    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    pub fn id(&self) -> &[u8; 32] {
        &self.id
    }
}

/// A 32-byte transaction content hash, hex-rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash([u8; 32]);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed transaction hash '{0}'")]
pub struct MalformedHash(String);

impl TxHash {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for TxHash {
    type Err = MalformedHash;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| MalformedHash(s.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| MalformedHash(s.to_string()))?;
        Ok(TxHash(arr))
    }
}

/// An ordered operation sequence bound to a source account, sequence
/// number, fee, and timeout. Immutable once signed — the envelope owns it.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionPlan {
    source: Address,
    sequence: i64,
    fee_per_operation: i64,
    operations: Vec<Operation>,
    timeout_secs: u64,
}

impl TransactionPlan {
    /// Validate and assemble a plan. Operations are checked individually;
    /// the fee and sequence must be strictly positive.
    pub fn new(
        source: Address,
        sequence: i64,
        fee_per_operation: i64,
        operations: Vec<Operation>,
        timeout_secs: u64,
    ) -> Result<Self, BuildError> {
        if operations.is_empty() {
            return Err(BuildError::EmptyOperations);
        }
        if fee_per_operation <= 0 {
            return Err(BuildError::NonPositiveFee(fee_per_operation));
        }
        if sequence <= 0 {
            return Err(BuildError::InvalidSequence(sequence));
        }
        for op in &operations {
            op.validate()?;
        }
        Ok(Self {
            source,
            sequence,
            fee_per_operation,
            operations,
            timeout_secs,
        })
    }

    pub fn source(&self) -> Address {
        self.source
    }

    pub fn sequence(&self) -> i64 {
        self.sequence
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// Total fee: fee-per-operation times operation count.
    pub fn total_fee(&self) -> i64 {
        self.fee_per_operation * self.operations.len() as i64
    }

    /// Canonical byte encoding of the plan, the input to hashing and the
    /// transport encoding.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).expect("plan serialization is infallible")
    }

    /// Content hash: SHA-256 over the network id followed by the canonical
    /// plan bytes. Signatures bind to this hash.
    pub fn content_hash(&self, network: &Network) -> TxHash {
        let mut hasher = Sha256::new();
        hasher.update(network.id());
        hasher.update(self.canonical_bytes());
        TxHash(hasher.finalize().into())
    }
}

/// An ed25519 signature plus the signer's 4-byte key hint.
#[derive(Debug, Clone, Serialize)]
pub struct DecoratedSignature {
    pub hint: [u8; 4],
    pub signature: Vec<u8>,
}

/// A transaction plan bundled with its signatures, ready for submission.
///
/// Construction goes through [`crate::tx::Orchestrator::sign`], which
/// guarantees a non-empty signature list bound to the plan's content hash.
#[derive(Debug, Clone, Serialize)]
pub struct SignedEnvelope {
    plan: TransactionPlan,
    hash: TxHash,
    signatures: Vec<DecoratedSignature>,
}

impl SignedEnvelope {
    pub(crate) fn assemble(
        plan: TransactionPlan,
        hash: TxHash,
        signatures: Vec<DecoratedSignature>,
    ) -> Self {
        debug_assert!(!signatures.is_empty());
        Self {
            plan,
            hash,
            signatures,
        }
    }

    pub fn plan(&self) -> &TransactionPlan {
        &self.plan
    }

    pub fn hash(&self) -> TxHash {
        self.hash
    }

    pub fn signatures(&self) -> &[DecoratedSignature] {
        &self.signatures
    }

    /// Transport encoding for the submission endpoint: base64 over the
    /// canonical envelope bytes.
    pub fn to_transport_base64(&self) -> String {
        let bytes = bincode::serialize(self).expect("envelope serialization is infallible");
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;
    use crate::crypto::KeyPair;

    fn sample_plan(sequence: i64) -> TransactionPlan {
        let source = KeyPair::random().address();
        TransactionPlan::new(
            source,
            sequence,
            100,
            vec![Operation::SetOptions {
                home_domain: "token.example.org".into(),
            }],
            300,
        )
        .unwrap()
    }

    #[test]
    fn rejects_empty_operations() {
        let source = KeyPair::random().address();
        assert!(matches!(
            TransactionPlan::new(source, 1, 100, vec![], 300),
            Err(BuildError::EmptyOperations)
        ));
    }

    #[test]
    fn rejects_non_positive_fee_and_sequence() {
        let source = KeyPair::random().address();
        let op = Operation::SetOptions {
            home_domain: "a.example".into(),
        };
        assert!(matches!(
            TransactionPlan::new(source, 1, 0, vec![op.clone()], 300),
            Err(BuildError::NonPositiveFee(0))
        ));
        assert!(matches!(
            TransactionPlan::new(source, -3, 100, vec![op], 300),
            Err(BuildError::InvalidSequence(-3))
        ));
    }

    #[test]
    fn total_fee_scales_with_operation_count() {
        let source = KeyPair::random().address();
        let issuer = KeyPair::random().address();
        let ops = vec![
            Operation::SetOptions {
                home_domain: "a.example".into(),
            },
            Operation::Payment {
                destination: source,
                asset: crate::asset::AssetIdentity::issued("TOK", issuer).unwrap(),
                amount: Amount::parse("5").unwrap(),
            },
        ];
        let plan = TransactionPlan::new(source, 1, 100, ops, 300).unwrap();
        assert_eq!(plan.total_fee(), 200);
    }

    #[test]
    fn content_hash_is_stable_and_network_bound() {
        let plan = sample_plan(7);
        let testnet = Network::new("Pi Testnet");
        let mainnet = Network::new("Pi Network");

        assert_eq!(plan.content_hash(&testnet), plan.content_hash(&testnet));
        assert_ne!(plan.content_hash(&testnet), plan.content_hash(&mainnet));
    }

    #[test]
    fn content_hash_covers_sequence() {
        let source = KeyPair::random().address();
        let op = Operation::SetOptions {
            home_domain: "a.example".into(),
        };
        let network = Network::new("Pi Testnet");
        let a = TransactionPlan::new(source, 1, 100, vec![op.clone()], 300).unwrap();
        let b = TransactionPlan::new(source, 2, 100, vec![op], 300).unwrap();
        assert_ne!(a.content_hash(&network), b.content_hash(&network));
    }

    #[test]
    fn tx_hash_hex_round_trips() {
        let plan = sample_plan(1);
        let hash = plan.content_hash(&Network::new("Pi Testnet"));
        assert_eq!(hash.to_string().parse::<TxHash>().unwrap(), hash);
    }
}
