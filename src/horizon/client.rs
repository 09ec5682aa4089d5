//! HTTP implementation of the ledger client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use super::types::{
    AccountSnapshot, LedgerStats, OperationRecord, RejectionPayload, SubmissionResult,
    TransactionRecord,
};
use super::{ClientError, LedgerClient};
use crate::crypto::Address;
use crate::pool::PoolId;
use crate::tx::{SignedEnvelope, TxHash};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Horizon-style HTTP API client.
///
/// One blocking round-trip per call; no retries, no failover. Rejections on
/// submission come back as values, not errors.
pub struct HorizonClient {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct Embedded<T> {
    #[serde(rename = "_embedded")]
    embedded: Records<T>,
}

#[derive(Debug, Deserialize)]
struct Records<T> {
    records: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct LedgerRecord {
    base_fee_in_stroops: i64,
}

#[derive(Debug, Deserialize)]
struct FeeStats {
    fee_charged: FeeCharged,
}

#[derive(Debug, Deserialize)]
struct FeeCharged {
    p70: String,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    hash: String,
    ledger: u32,
}

impl HorizonClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClientError::Transport {
                endpoint: base_url.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let endpoint = self.url(path);
        let response = self
            .http
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| ClientError::Transport {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                endpoint,
                status: status.as_u16(),
            });
        }

        response.json().await.map_err(|e| ClientError::Decode {
            endpoint,
            message: e.to_string(),
        })
    }

    /// Recent transactions touching a pool, newest first.
    pub async fn pool_transactions(
        &self,
        pool_id: &PoolId,
        limit: u32,
    ) -> Result<Vec<TransactionRecord>, ClientError> {
        let path = format!(
            "/liquidity_pools/{}/transactions?order=desc&limit={}",
            pool_id, limit
        );
        let page: Embedded<TransactionRecord> = self.get_json(&path).await?;
        Ok(page.embedded.records)
    }

    /// Recent operations touching a pool, newest first.
    pub async fn pool_operations(
        &self,
        pool_id: &PoolId,
        limit: u32,
    ) -> Result<Vec<OperationRecord>, ClientError> {
        let path = format!(
            "/liquidity_pools/{}/operations?order=desc&limit={}",
            pool_id, limit
        );
        let page: Embedded<OperationRecord> = self.get_json(&path).await?;
        Ok(page.embedded.records)
    }
}

#[async_trait]
impl LedgerClient for HorizonClient {
    async fn get_account(&self, address: &Address) -> Result<Option<AccountSnapshot>, ClientError> {
        let endpoint = self.url(&format!("/accounts/{}", address));
        let response = self
            .http
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| ClientError::Transport {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => response
                .json()
                .await
                .map(Some)
                .map_err(|e| ClientError::Decode {
                    endpoint,
                    message: e.to_string(),
                }),
            status => Err(ClientError::UnexpectedStatus {
                endpoint,
                status: status.as_u16(),
            }),
        }
    }

    async fn latest_ledger_stats(&self) -> Result<LedgerStats, ClientError> {
        let page: Embedded<LedgerRecord> = self.get_json("/ledgers?order=desc&limit=1").await?;
        let latest = page
            .embedded
            .records
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::Decode {
                endpoint: self.url("/ledgers"),
                message: "empty ledger list".to_string(),
            })?;

        // Fee statistics are advisory; a missing or malformed fee_stats
        // resource degrades to "no recommendation" rather than failing the
        // whole query.
        let recommended_p70 = match self.get_json::<FeeStats>("/fee_stats").await {
            Ok(stats) => stats.fee_charged.p70.parse().ok(),
            Err(e) => {
                warn!(error = %e, "fee statistics unavailable, proceeding with base fee only");
                None
            }
        };

        Ok(LedgerStats {
            base_fee: latest.base_fee_in_stroops,
            recommended_p70,
        })
    }

    async fn pool_exists(&self, pool_id: &PoolId) -> Result<bool, ClientError> {
        let endpoint = self.url(&format!("/liquidity_pools/{}", pool_id));
        let response = self
            .http
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| ClientError::Transport {
                endpoint: endpoint.clone(),
                message: e.to_string(),
            })?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(ClientError::UnexpectedStatus {
                endpoint,
                status: status.as_u16(),
            }),
        }
    }

    async fn submit(&self, envelope: &SignedEnvelope) -> SubmissionResult {
        // An unsigned envelope reaching this point is a programmer error,
        // not an operational condition.
        assert!(
            !envelope.signatures().is_empty(),
            "refusing to submit an unsigned transaction envelope"
        );

        let endpoint = self.url("/transactions");
        debug!(endpoint = %endpoint, hash = %envelope.hash(), "submitting transaction");

        let response = self
            .http
            .post(&endpoint)
            .form(&[("tx", envelope.to_transport_base64())])
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                return SubmissionResult::NetworkFailure {
                    message: e.to_string(),
                }
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => {
                return SubmissionResult::NetworkFailure {
                    message: format!("reading response body: {}", e),
                }
            }
        };

        if status.is_success() {
            match serde_json::from_str::<SubmitResponse>(&body) {
                Ok(ok) => match ok.hash.parse::<TxHash>() {
                    Ok(hash) => SubmissionResult::Accepted {
                        hash,
                        ledger: ok.ledger,
                    },
                    Err(e) => SubmissionResult::NetworkFailure {
                        message: format!("malformed transaction hash in response: {}", e),
                    },
                },
                Err(e) => SubmissionResult::NetworkFailure {
                    message: format!("malformed success response: {}", e),
                },
            }
        } else {
            SubmissionResult::Rejected {
                payload: RejectionPayload::from_body(status.as_u16(), &body),
            }
        }
    }
}
