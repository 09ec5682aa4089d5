//! Environment-driven configuration.
//!
//! All recognized options are read once at startup into an explicit,
//! immutable struct that the workflows receive by reference — there is no
//! process-wide mutable configuration state. A `.env` file is honored when
//! present.
//!
//! Secrets set to a known placeholder value abort loading immediately;
//! options that are merely absent only fail when the selected workflow
//! actually requires them. Either way, nothing reaches the network first.

use once_cell::sync::Lazy;

use crate::amount::Amount;
use crate::crypto::SecretString;
use crate::error::BootstrapError;
use crate::tx::Network;

pub const DEFAULT_HORIZON_URL: &str = "https://api.testnet.minepi.com";
pub const DEFAULT_NETWORK_PASSPHRASE: &str = "Pi Testnet";

/// Default minted supply: 10M tokens.
const DEFAULT_MINT_AMOUNT: &str = "10000000";

/// Default trustline ceiling: 1B tokens.
const DEFAULT_MINT_LIMIT: &str = "1000000000";

/// Ledger-side transaction time-to-live.
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Template values that ship in example env files and must never be used
/// as credentials.
static PLACEHOLDER_VALUES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "ISSUER WALLET SECRET here",
        "DISTRIBUTOR WALLET SECRET HERE",
        "YOUR SECRET HERE",
        "changeme",
    ]
});

fn is_placeholder(value: &str) -> bool {
    PLACEHOLDER_VALUES
        .iter()
        .any(|p| p.eq_ignore_ascii_case(value))
}

/// The full configuration surface, constructed once per run.
#[derive(Debug)]
pub struct BootstrapConfig {
    pub horizon_url: String,
    pub network_passphrase: String,
    issuer_secret: Option<SecretString>,
    distributor_secret: Option<SecretString>,
    pub token_code: Option<String>,
    pub issuer_public_address: Option<String>,
    pub home_domain: Option<String>,
    pub mint_amount: Amount,
    pub mint_limit: Amount,
    pub lp_native_deposit: Option<Amount>,
    pub lp_token_deposit: Option<Amount>,
    pub tx_timeout_secs: u64,
}

impl BootstrapConfig {
    /// Load from the process environment, honoring a `.env` file.
    pub fn from_env() -> Result<Self, BootstrapError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (tests inject a map here).
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, BootstrapError> {
        let issuer_secret = secret_option(&lookup, "ISSUER_SECRET")?;
        let distributor_secret = secret_option(&lookup, "DISTRIBUTOR_SECRET")?;

        let mint_amount = amount_with_default(&lookup, "MINT_Amount", DEFAULT_MINT_AMOUNT)?;
        let mint_limit = amount_with_default(&lookup, "MINT_LIMIT", DEFAULT_MINT_LIMIT)?;
        for (key, value) in [("MINT_Amount", mint_amount), ("MINT_LIMIT", mint_limit)] {
            if !value.is_positive() {
                return Err(BootstrapError::Configuration(format!(
                    "{} must be strictly positive, got {}",
                    key, value
                )));
            }
        }

        Ok(Self {
            horizon_url: string_with_default(&lookup, "HORIZON_URL", DEFAULT_HORIZON_URL),
            network_passphrase: string_with_default(
                &lookup,
                "NETWORK_PASSPHRASE",
                DEFAULT_NETWORK_PASSPHRASE,
            ),
            issuer_secret,
            distributor_secret,
            token_code: string_option(&lookup, "TOKEN_CODE"),
            issuer_public_address: string_option(&lookup, "ISSUER_PUBLIC_ADDRESS"),
            home_domain: string_option(&lookup, "HOME_DOMAIN"),
            mint_amount,
            mint_limit,
            lp_native_deposit: amount_option(&lookup, "LP_PI_DEPOSIT")?,
            lp_token_deposit: amount_option(&lookup, "LP_TOKEN_DEPOSIT")?,
            tx_timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    pub fn issuer_secret(&self) -> Option<&SecretString> {
        self.issuer_secret.as_ref()
    }

    pub fn distributor_secret(&self) -> Option<&SecretString> {
        self.distributor_secret.as_ref()
    }

    /// The network identity derived from the configured passphrase.
    pub fn network(&self) -> Network {
        Network::new(&self.network_passphrase)
    }

    /// Both liquidity deposit legs, required and strictly positive.
    pub fn require_lp_deposits(&self) -> Result<(Amount, Amount), BootstrapError> {
        let native = self.lp_native_deposit.ok_or_else(|| {
            BootstrapError::Configuration("LP_PI_DEPOSIT is not set".to_string())
        })?;
        let token = self.lp_token_deposit.ok_or_else(|| {
            BootstrapError::Configuration("LP_TOKEN_DEPOSIT is not set".to_string())
        })?;
        for (key, value) in [("LP_PI_DEPOSIT", native), ("LP_TOKEN_DEPOSIT", token)] {
            if !value.is_positive() {
                return Err(BootstrapError::Configuration(format!(
                    "{} must be strictly positive, got {}",
                    key, value
                )));
            }
        }
        Ok((native, token))
    }
}

fn string_option(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn string_with_default(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> String {
    string_option(lookup, key).unwrap_or_else(|| default.to_string())
}

fn secret_option(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<SecretString>, BootstrapError> {
    match string_option(lookup, key) {
        Some(value) if is_placeholder(&value) => Err(BootstrapError::Configuration(format!(
            "{} is set to a placeholder value",
            key
        ))),
        Some(value) => Ok(Some(SecretString::new(value))),
        None => Ok(None),
    }
}

fn amount_option(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<Amount>, BootstrapError> {
    string_option(lookup, key)
        .map(|v| {
            Amount::parse(&v).map_err(|e| {
                BootstrapError::Configuration(format!("{} is not a valid amount: {}", key, e))
            })
        })
        .transpose()
}

fn amount_with_default(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<Amount, BootstrapError> {
    amount_option(lookup, key).map(|opt| {
        opt.unwrap_or_else(|| Amount::parse(default).expect("default amounts are valid"))
    })
}
