//! HTTP collaborators for the Divvy allocation engine.
//!
//! The engine talks to an exchange rate service and a transaction store
//! through traits; this crate supplies the reqwest-backed implementations
//! and wires them into a coordinator from [`AppConfig`].

pub mod error;
mod http;
pub mod rates;
pub mod store;

use divvy_core::currency::CachedRateProvider;
use divvy_core::expense::ExpenseCoordinator;
use divvy_shared::config::AppConfig;
use tracing::info;

pub use error::GatewayError;
pub use rates::ExchangeRateApiClient;
pub use store::HttpTransactionStore;

/// Coordinator backed by the HTTP collaborators.
pub type HttpCoordinator =
    ExpenseCoordinator<CachedRateProvider<ExchangeRateApiClient>, HttpTransactionStore>;

/// Builds a coordinator with a cached rate client and an HTTP store.
///
/// # Errors
///
/// Returns an error if either base URL is unusable or a client cannot be
/// built.
pub fn coordinator_from_config(config: &AppConfig) -> Result<HttpCoordinator, GatewayError> {
    let rates = CachedRateProvider::from_config(
        ExchangeRateApiClient::from_config(&config.rates)?,
        &config.rates,
    );
    let store = HttpTransactionStore::from_config(&config.store)?;

    info!(
        rates_url = %config.rates.base_url,
        store_url = %config.store.base_url,
        baseline = %config.baseline_currency,
        "Expense coordinator configured"
    );
    Ok(ExpenseCoordinator::from_config(rates, store, config))
}
