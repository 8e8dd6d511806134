//! Currency error types.

use divvy_shared::types::CurrencyCode;
use rust_decimal::Decimal;
use thiserror::Error;

/// Failure reported by a rate provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateError {
    /// The provider does not know the currency.
    #[error("currency {currency} is not supported by the rate provider")]
    Unsupported {
        /// Currency that could not be resolved.
        currency: CurrencyCode,
    },

    /// The provider could not be reached.
    #[error("rate provider unreachable: {0}")]
    Unreachable(String),

    /// The provider answered with something that is not a usable rate.
    #[error("malformed rate response: {0}")]
    Malformed(String),
}

/// Errors that abort currency normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    /// No rate exists for the currency pair.
    #[error("No exchange rate available for {from} to {to}")]
    RateUnavailable {
        /// Source currency.
        from: CurrencyCode,
        /// Baseline currency.
        to: CurrencyCode,
    },

    /// The rate source failed or returned garbage.
    #[error("Exchange rate source failed for {from} to {to}: {reason}")]
    RateSourceError {
        /// Source currency.
        from: CurrencyCode,
        /// Baseline currency.
        to: CurrencyCode,
        /// Provider failure description.
        reason: String,
        /// True when the source was unreachable rather than wrong.
        transient: bool,
    },

    /// `amount * rate` does not fit in a decimal.
    #[error("Converting {amount} at rate {rate} overflows")]
    ConversionOverflow {
        /// Amount being converted.
        amount: Decimal,
        /// Rate applied.
        rate: Decimal,
    },
}

impl CurrencyError {
    /// Maps a provider failure for the `from -> to` lookup.
    #[must_use]
    pub fn from_rate_error(err: RateError, from: CurrencyCode, to: CurrencyCode) -> Self {
        match err {
            RateError::Unsupported { .. } => Self::RateUnavailable { from, to },
            RateError::Unreachable(reason) => Self::RateSourceError {
                from,
                to,
                reason,
                transient: true,
            },
            RateError::Malformed(reason) => Self::RateSourceError {
                from,
                to,
                reason,
                transient: false,
            },
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::RateUnavailable { .. } => "RATE_UNAVAILABLE",
            Self::RateSourceError { .. } => "RATE_SOURCE_ERROR",
            Self::ConversionOverflow { .. } => "CONVERSION_OVERFLOW",
        }
    }

    /// Returns true if the lookup may succeed when tried again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateSourceError { transient: true, .. })
    }
}
