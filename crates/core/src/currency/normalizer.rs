//! Conversion of input amounts into the baseline currency.

use divvy_shared::types::CurrencyCode;
use rust_decimal::Decimal;
use tracing::debug;

use super::error::CurrencyError;
use super::exchange::ExchangeRate;
use super::provider::RateProvider;

/// Converts `amount` from `source` into `baseline`.
///
/// When both currencies are the same the amount is returned unchanged and the
/// provider is not called.
///
/// # Errors
///
/// Returns `CurrencyError::RateUnavailable` if the provider does not support
/// the currency, `RateSourceError` if it failed or returned a non-positive
/// rate, and `ConversionOverflow` if the product does not fit.
pub async fn normalize<P>(
    amount: Decimal,
    source: CurrencyCode,
    baseline: CurrencyCode,
    provider: &P,
) -> Result<Decimal, CurrencyError>
where
    P: RateProvider + ?Sized,
{
    let rate = resolve_rate(source, baseline, provider).await?;
    rate.convert(amount)
}

async fn resolve_rate<P>(
    source: CurrencyCode,
    baseline: CurrencyCode,
    provider: &P,
) -> Result<ExchangeRate, CurrencyError>
where
    P: RateProvider + ?Sized,
{
    if source == baseline {
        return Ok(ExchangeRate::identity(baseline));
    }

    let rate = provider
        .rate(source, baseline)
        .await
        .map_err(|err| CurrencyError::from_rate_error(err, source, baseline))?;

    if rate <= Decimal::ZERO {
        return Err(CurrencyError::RateSourceError {
            from: source,
            to: baseline,
            reason: format!("non-positive rate {rate}"),
            transient: false,
        });
    }

    debug!(from = %source, to = %baseline, %rate, "resolved exchange rate");
    Ok(ExchangeRate::new(source, baseline, rate))
}

/// Normalizer bound to a provider and a baseline currency.
///
/// `resolve` fetches the rate once so that every amount of a request can be
/// converted with the same rate.
#[derive(Debug, Clone)]
pub struct CurrencyNormalizer<P> {
    provider: P,
    baseline: CurrencyCode,
}

impl<P: RateProvider> CurrencyNormalizer<P> {
    /// Creates a normalizer.
    #[must_use]
    pub const fn new(provider: P, baseline: CurrencyCode) -> Self {
        Self { provider, baseline }
    }

    /// Returns the baseline currency.
    #[must_use]
    pub const fn baseline(&self) -> CurrencyCode {
        self.baseline
    }

    /// Returns the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Resolves the rate from `source` into the baseline currency.
    ///
    /// # Errors
    ///
    /// See [`normalize`].
    pub async fn resolve(&self, source: CurrencyCode) -> Result<ExchangeRate, CurrencyError> {
        resolve_rate(source, self.baseline, &self.provider).await
    }

    /// Converts a single amount into the baseline currency.
    ///
    /// # Errors
    ///
    /// See [`normalize`].
    pub async fn normalize(
        &self,
        amount: Decimal,
        source: CurrencyCode,
    ) -> Result<Decimal, CurrencyError> {
        normalize(amount, source, self.baseline, &self.provider).await
    }
}
