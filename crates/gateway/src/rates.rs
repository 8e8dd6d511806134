//! Exchange rate service client.
//!
//! Talks to an exchangerate-api style service: `GET {base}/latest/{SOURCE}`
//! answers with every rate quoted against the source currency.

use std::collections::HashMap;

use async_trait::async_trait;
use divvy_core::currency::{RateError, RateProvider};
use divvy_shared::config::RatesConfig;
use divvy_shared::types::CurrencyCode;
use reqwest::{Client, StatusCode, Url};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::error::GatewayError;
use crate::http::{build_client, endpoint, parse_base_url};

/// Body of a `latest` response.
#[derive(Debug, Deserialize)]
struct LatestRates {
    #[serde(default)]
    base: Option<String>,
    rates: HashMap<String, Decimal>,
}

/// Rate provider backed by the HTTP exchange rate service.
#[derive(Debug, Clone)]
pub struct ExchangeRateApiClient {
    client: Client,
    base_url: Url,
}

impl ExchangeRateApiClient {
    /// Creates a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is unusable or the client cannot be built.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, GatewayError> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            base_url: parse_base_url("rates", base_url)?,
        })
    }

    /// Creates a client from the rates configuration.
    ///
    /// # Errors
    ///
    /// See [`ExchangeRateApiClient::new`].
    pub fn from_config(config: &RatesConfig) -> Result<Self, GatewayError> {
        Self::new(&config.base_url, config.timeout_secs)
    }

    async fn latest(&self, source: CurrencyCode) -> Result<LatestRates, RateError> {
        let url = endpoint(&self.base_url, &["latest", source.as_str()]);
        debug!(%url, "Fetching exchange rates");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RateError::Unreachable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RateError::Unsupported { currency: source });
        }
        if status.is_server_error() {
            return Err(RateError::Unreachable(format!("status {status}")));
        }
        if !status.is_success() {
            return Err(RateError::Malformed(format!("status {status}")));
        }

        response.json::<LatestRates>().await.map_err(|e| {
            if e.is_decode() {
                RateError::Malformed(e.to_string())
            } else {
                RateError::Unreachable(e.to_string())
            }
        })
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApiClient {
    async fn rate(&self, from: CurrencyCode, to: CurrencyCode) -> Result<Decimal, RateError> {
        if from == to {
            return Ok(Decimal::ONE);
        }

        let latest = self.latest(from).await?;
        if let Some(base) = latest.base.as_deref()
            && !base.eq_ignore_ascii_case(from.as_str())
        {
            return Err(RateError::Malformed(format!(
                "asked for {from} rates, got {base}"
            )));
        }

        latest
            .rates
            .get(to.as_str())
            .copied()
            .ok_or(RateError::Unsupported { currency: to })
    }
}
