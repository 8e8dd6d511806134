//! Normalization of amounts into the baseline currency.
//!
//! Shares are always computed in the baseline currency. Input amounts in any
//! other currency are converted first using a rate from a `RateProvider`.

pub mod cache;
pub mod error;
pub mod exchange;
pub mod normalizer;
pub mod provider;

#[cfg(test)]
mod props;

pub use cache::CachedRateProvider;
pub use error::{CurrencyError, RateError};
pub use exchange::ExchangeRate;
pub use normalizer::{CurrencyNormalizer, normalize};
pub use provider::{RateProvider, StaticRateProvider};
