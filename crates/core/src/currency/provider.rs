//! Exchange rate providers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use divvy_shared::types::CurrencyCode;
use rust_decimal::Decimal;

use super::error::RateError;

/// Source of exchange rates.
///
/// `rate(from, to)` returns how many units of `to` one unit of `from` buys.
/// Implementations must tell "currency not supported" apart from "source
/// unreachable or malformed" through the `RateError` variant they return.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Looks up the rate for `from -> to`.
    ///
    /// # Errors
    ///
    /// Returns `RateError::Unsupported` if either currency is unknown to the
    /// provider, `Unreachable` or `Malformed` if the lookup itself failed.
    async fn rate(&self, from: CurrencyCode, to: CurrencyCode) -> Result<Decimal, RateError>;
}

#[async_trait]
impl<P: RateProvider + ?Sized> RateProvider for Arc<P> {
    async fn rate(&self, from: CurrencyCode, to: CurrencyCode) -> Result<Decimal, RateError> {
        (**self).rate(from, to).await
    }
}

/// Provider backed by a fixed table of rates.
///
/// A pair that is missing directly is answered with the inverse of the
/// opposite pair when that one is known.
#[derive(Debug, Clone, Default)]
pub struct StaticRateProvider {
    rates: HashMap<(CurrencyCode, CurrencyCode), Decimal>,
}

impl StaticRateProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rate for `from -> to`.
    #[must_use]
    pub fn with_rate(mut self, from: CurrencyCode, to: CurrencyCode, rate: Decimal) -> Self {
        self.rates.insert((from, to), rate);
        self
    }

    fn lookup(&self, from: CurrencyCode, to: CurrencyCode) -> Option<Decimal> {
        if from == to {
            return Some(Decimal::ONE);
        }
        // Direct
        if let Some(rate) = self.rates.get(&(from, to)) {
            return Some(*rate);
        }
        // Inverse
        self.rates
            .get(&(to, from))
            .filter(|rate| !rate.is_zero())
            .and_then(|rate| Decimal::ONE.checked_div(*rate))
    }
}

#[async_trait]
impl RateProvider for StaticRateProvider {
    async fn rate(&self, from: CurrencyCode, to: CurrencyCode) -> Result<Decimal, RateError> {
        self.lookup(from, to)
            .ok_or(RateError::Unsupported { currency: from })
    }
}
