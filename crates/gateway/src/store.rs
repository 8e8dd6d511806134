//! Transaction store client.

use async_trait::async_trait;
use divvy_core::expense::{ExpensePayload, StoreError, TransactionStore};
use divvy_shared::config::StoreConfig;
use reqwest::{Client, Url};
use tracing::debug;

use crate::error::GatewayError;
use crate::http::{build_client, endpoint, parse_base_url};

/// Store that posts payloads to `{base}/groups/{group}/splitbill`.
#[derive(Debug, Clone)]
pub struct HttpTransactionStore {
    client: Client,
    base_url: Url,
}

impl HttpTransactionStore {
    /// Creates a store client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is unusable or the client cannot be built.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, GatewayError> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            base_url: parse_base_url("store", base_url)?,
        })
    }

    /// Creates a store client from the store configuration.
    ///
    /// # Errors
    ///
    /// See [`HttpTransactionStore::new`].
    pub fn from_config(config: &StoreConfig) -> Result<Self, GatewayError> {
        Self::new(&config.base_url, config.timeout_secs)
    }
}

#[async_trait]
impl TransactionStore for HttpTransactionStore {
    async fn submit(&self, payload: &ExpensePayload) -> Result<(), StoreError> {
        let url = endpoint(&self.base_url, &["groups", &payload.group, "splitbill"]);
        debug!(%url, expense_id = %payload.expense_id, "Posting expense");

        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| StoreError::Unreachable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response.text().await.unwrap_or_default();
        Err(StoreError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
