//! Property-based tests for currency normalization.
//!
//! - Identity: normalizing into the same currency returns the input.
//! - Conversion is the exact product of amount and rate.

use divvy_shared::types::CurrencyCode;
use futures::executor::block_on;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::RateError;
use super::normalizer::normalize;
use super::provider::StaticRateProvider;
use crate::testing::FailingProvider;

/// Strategy to generate decimal amounts, negative ones included (-1,000,000.00 to 1,000,000.00).
fn any_amount() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive exchange rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

fn currency() -> impl Strategy<Value = CurrencyCode> {
    prop_oneof![
        Just(CurrencyCode::USD),
        Just(CurrencyCode::EUR),
        Just(CurrencyCode::IRR),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The identity conversion never consults the provider, so even a failing
    /// provider yields the input unchanged.
    #[test]
    fn prop_identity_conversion(amount in any_amount(), code in currency()) {
        let provider = FailingProvider::new(RateError::Unreachable("down".to_string()));
        let result = block_on(normalize(amount, code, code, &provider));
        prop_assert_eq!(result, Ok(amount));
    }

    #[test]
    fn prop_conversion_is_exact_product(amount in any_amount(), rate in positive_rate()) {
        let provider = StaticRateProvider::new()
            .with_rate(CurrencyCode::EUR, CurrencyCode::USD, rate);
        let result = block_on(normalize(amount, CurrencyCode::EUR, CurrencyCode::USD, &provider))
            .unwrap();
        prop_assert_eq!(result, amount * rate);
    }
}
