//! Rate caching using Moka.
//!
//! Rates fetched from a remote provider are kept for a short time so that a
//! burst of expenses in the same currency costs one lookup.

use std::time::Duration;

use async_trait::async_trait;
use divvy_shared::config::RatesConfig;
use divvy_shared::types::CurrencyCode;
use moka::future::Cache;
use rust_decimal::Decimal;
use tracing::debug;

use super::error::RateError;
use super::provider::RateProvider;

/// Default cache capacity (number of currency pairs).
const DEFAULT_CACHE_CAPACITY: u64 = 256;

/// Default time-to-live for cached rates (5 minutes).
const DEFAULT_TTL_SECS: u64 = 300;

/// Provider wrapper that caches successful lookups by currency pair.
///
/// Failures are never cached.
#[derive(Clone, Debug)]
pub struct CachedRateProvider<P> {
    inner: P,
    cache: Cache<(CurrencyCode, CurrencyCode), Decimal>,
}

impl<P: RateProvider> CachedRateProvider<P> {
    /// Wraps a provider with default settings.
    ///
    /// Default: 256 pairs max, 5 minute TTL.
    #[must_use]
    pub fn new(inner: P) -> Self {
        Self::with_config(inner, DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Wraps a provider with a custom capacity and time-to-live.
    #[must_use]
    pub fn with_config(inner: P, max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { inner, cache }
    }

    /// Wraps a provider using the `[rates]` configuration section.
    #[must_use]
    pub fn from_config(inner: P, config: &RatesConfig) -> Self {
        Self::with_config(inner, config.cache_capacity, config.cache_ttl_secs)
    }

    /// Returns the wrapped provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Drops every cached rate.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Returns the number of cached pairs.
    ///
    /// The count is eventually consistent; call `run_pending_tasks` first for
    /// an exact figure.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs cache maintenance tasks.
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}

#[async_trait]
impl<P: RateProvider> RateProvider for CachedRateProvider<P> {
    async fn rate(&self, from: CurrencyCode, to: CurrencyCode) -> Result<Decimal, RateError> {
        if let Some(rate) = self.cache.get(&(from, to)).await {
            debug!(%from, %to, %rate, "exchange rate cache hit");
            return Ok(rate);
        }

        let rate = self.inner.rate(from, to).await?;
        self.cache.insert((from, to), rate).await;
        Ok(rate)
    }
}
