//! Addresses, signing keypairs, and secret handling.

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use zeroize::Zeroize;

use super::strkey;

/// Errors decoding key material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("malformed key: {0}")]
    Malformed(String),
}

/// A public account identifier (ed25519 public key).
///
/// Displays as a strkey account id (G...). Used as the map key for sequence
/// tracking, so it is `Eq + Hash + Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; 32]);

impl Address {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Address(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First four key bytes, attached to signatures so verifiers can match
    /// a signature to a signer without trying every key.
    pub fn hint(&self) -> [u8; 4] {
        [self.0[0], self.0[1], self.0[2], self.0[3]]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&strkey::encode_account_id(&self.0))
    }
}

impl FromStr for Address {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        strkey::decode_account_id(s).map(Address)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A signing keypair derived from a strkey secret seed.
///
/// The embedded `SigningKey` zeroizes its own material on drop. `Debug`
/// prints only the public address — the seed never reaches logs.
#[derive(Clone)]
pub struct KeyPair {
    signing: SigningKey,
    address: Address,
}

impl KeyPair {
    /// Derive a keypair from a secret seed (S...).
    pub fn from_secret_seed(seed: &str) -> Result<Self, KeyError> {
        let mut seed_bytes = strkey::decode_secret_seed(seed.trim())?;
        let signing = SigningKey::from_bytes(&seed_bytes);
        seed_bytes.zeroize();
        Ok(Self::from_signing_key(signing))
    }

    /// Generate a fresh random keypair (test and tooling use).
    pub fn random() -> Self {
        let mut rng = rand::rngs::OsRng;
        Self::from_signing_key(SigningKey::generate(&mut rng))
    }

    fn from_signing_key(signing: SigningKey) -> Self {
        let verifying: VerifyingKey = signing.verifying_key();
        let address = Address(verifying.to_bytes());
        Self { signing, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a 32-byte content hash, returning the 64-byte signature.
    pub fn sign(&self, hash: &[u8; 32]) -> [u8; 64] {
        self.signing.sign(hash).to_bytes()
    }

    /// The strkey secret seed. Only used by the `verify` command, which the
    /// operator runs interactively to confirm credentials.
    pub fn secret_seed(&self) -> SecretString {
        SecretString::new(strkey::encode_secret_seed(&self.signing.to_bytes()))
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("address", &self.address.to_string())
            .finish_non_exhaustive()
    }
}

/// A string that zeroizes on drop and redacts itself in Debug output.
///
/// Configuration holds secret seeds in this wrapper so an accidental
/// `{:?}` of the config cannot leak them.
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: String) -> Self {
        SecretString(value)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString(***)")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}
