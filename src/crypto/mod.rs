//! Key material: strkey text encoding and ed25519 signing keys.

mod keys;
mod strkey;

pub use keys::{Address, KeyError, KeyPair, SecretString};
pub use strkey::{decode_account_id, decode_secret_seed, encode_account_id, encode_secret_seed};
