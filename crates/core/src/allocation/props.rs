//! Property-based tests for cent rounding.
//!
//! - Rounded shares sum exactly to the rounded total
//! - Each rounded share is within one unit of its exact value

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::rounding::{round, round_preserving_sum};

/// Strategy to generate non-negative amounts with up to 6 decimal places.
fn exact_amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000i64).prop_map(|v| Decimal::new(v, 6))
}

/// Strategy to generate decimal places (0 to 4).
fn decimal_places() -> impl Strategy<Value = u32> {
    0u32..=4
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_rounded_sum_equals_rounded_total(
        amounts in prop::collection::vec(exact_amount(), 1..20),
        dp in decimal_places(),
    ) {
        let total = round(amounts.iter().copied().sum(), dp);
        let rounded = round_preserving_sum(&amounts, dp).unwrap();

        prop_assert_eq!(rounded.len(), amounts.len());
        prop_assert_eq!(rounded.iter().copied().sum::<Decimal>(), total);
    }

    #[test]
    fn prop_rounded_share_within_one_unit(
        amounts in prop::collection::vec(exact_amount(), 1..20),
        dp in decimal_places(),
    ) {
        let unit = Decimal::new(1, dp);
        let rounded = round_preserving_sum(&amounts, dp).unwrap();

        for (exact, r) in amounts.iter().zip(rounded.iter()) {
            prop_assert!((*r - *exact).abs() < unit, "exact={} rounded={}", exact, r);
            prop_assert_eq!(r.round_dp(dp), *r);
        }
    }
}
