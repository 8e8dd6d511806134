//! Exchange rate types and logic.

use divvy_shared::types::CurrencyCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::CurrencyError;

/// Exchange rate between two currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Source currency code.
    pub from_currency: CurrencyCode,
    /// Target currency code.
    pub to_currency: CurrencyCode,
    /// Exchange rate (1 from_currency = rate to_currency).
    pub rate: Decimal,
}

impl ExchangeRate {
    /// Creates a new exchange rate.
    #[must_use]
    pub const fn new(from_currency: CurrencyCode, to_currency: CurrencyCode, rate: Decimal) -> Self {
        Self {
            from_currency,
            to_currency,
            rate,
        }
    }

    /// The rate of a currency to itself.
    #[must_use]
    pub const fn identity(currency: CurrencyCode) -> Self {
        Self::new(currency, currency, Decimal::ONE)
    }

    /// Returns true if source and target are the same currency.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.from_currency == self.to_currency
    }

    /// Converts an amount from the source into the target currency.
    ///
    /// The identity rate returns the amount untouched. Otherwise the result is
    /// the exact product `amount * rate`; no rounding is applied here.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::ConversionOverflow` if the product does not fit.
    pub fn convert(&self, amount: Decimal) -> Result<Decimal, CurrencyError> {
        if self.is_identity() {
            return Ok(amount);
        }
        amount
            .checked_mul(self.rate)
            .ok_or(CurrencyError::ConversionOverflow {
                amount,
                rate: self.rate,
            })
    }
}
