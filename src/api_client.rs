//! Read-only REST client for transaction lookups, used by concrete
//! [`crate::chain::ChainClient`] implementations. Submission and signing
//! stay with the external wallet library.

use crate::{
    chain::TransactionRecord,
    decode,
    error::ChainError,
    types::TxId,
};
use reqwest::StatusCode;
use serde_json::Value;

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ChainError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ChainError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { base_url, http })
    }

    /// Fetch and normalize a transaction by id. Returns `None` when the
    /// API does not know the transaction yet.
    pub async fn transaction(
        &self,
        tx: &TxId,
    ) -> Result<Option<TransactionRecord>, ChainError> {
        let url = format!("{}/extended/v1/tx/{}", self.base_url, tx);
        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ChainError::Transport(format!("transaction request failed: {e}")))?;
        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let bytes = res
            .bytes()
            .await
            .map_err(|e| ChainError::Transport(format!("failed to read response body: {e}")))?;
        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes);
            return Err(ChainError::Transport(format!(
                "chain API responded with {status} when fetching {tx}: {body}"
            )));
        }
        let payload: Value = serde_json::from_slice(&bytes)
            .map_err(|e| ChainError::Decode(format!("invalid transaction payload: {e}")))?;
        decode::decode_transaction(&payload).map(Some)
    }
}
