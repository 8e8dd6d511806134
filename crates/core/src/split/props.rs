//! Property-based tests for the split calculator.
//!
//! - Ratio shares add up to the total and keep the weight ratios
//! - Percentage shares are exactly `(w / 100) * total`
//! - Fixed amounts are the weights
//! - Computing twice gives the same allocation

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{SplitCalculator, SplitMethod, SplitRequest};
use crate::member::{Group, Member};

const NAMES: [&str; 6] = ["ana", "ben", "cai", "dev", "eli", "fay"];

fn group() -> Group {
    Group::new("props", NAMES).unwrap()
}

/// Strategy to generate positive totals (0.01 to 1,000,000.00).
fn positive_total() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate 1 to 6 positive weights with up to 2 decimal places.
fn positive_weights() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec((1i64..100_000i64).prop_map(|v| Decimal::new(v, 2)), 1..=NAMES.len())
}

fn request(method: SplitMethod, total: Option<Decimal>, weights: &[Decimal]) -> SplitRequest {
    let group = group();
    let mut builder = SplitRequest::builder(&group)
        .with_payer(NAMES[0])
        .with_method(method)
        .with_category("props");
    if let Some(total) = total {
        builder = builder.with_total(total);
    }
    for (name, weight) in NAMES.iter().zip(weights) {
        builder = builder.with_participant(*name, *weight);
    }
    builder.build().unwrap()
}

fn member(name: &str) -> Member {
    Member::new(name).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_ratio_sums_to_total(total in positive_total(), weights in positive_weights()) {
        let allocation =
            SplitCalculator::compute_shares(&request(SplitMethod::Ratio, Some(total), &weights))
                .unwrap();

        let diff = (allocation.total() - total).abs();
        prop_assert!(diff <= dec!(0.000000001), "sum {} vs total {}", allocation.total(), total);
    }

    #[test]
    fn prop_ratio_keeps_weight_ratios(total in positive_total(), weights in positive_weights()) {
        prop_assume!(weights.len() >= 2);
        let allocation =
            SplitCalculator::compute_shares(&request(SplitMethod::Ratio, Some(total), &weights))
                .unwrap();

        let first = allocation.get(&member(NAMES[0])).unwrap();
        let second = allocation.get(&member(NAMES[1])).unwrap();
        // share_0 * w_1 == share_1 * w_0, up to division rounding
        let lhs = first * weights[1];
        let rhs = second * weights[0];
        prop_assert!((lhs - rhs).abs() <= dec!(0.000001), "lhs {} rhs {}", lhs, rhs);
    }

    #[test]
    fn prop_percentage_is_exact(total in positive_total(), weights in positive_weights()) {
        let allocation = SplitCalculator::compute_shares(&request(
            SplitMethod::Percentage,
            Some(total),
            &weights,
        ))
        .unwrap();

        for (name, weight) in NAMES.iter().zip(&weights) {
            let expected = (*weight / Decimal::ONE_HUNDRED) * total;
            prop_assert_eq!(allocation.get(&member(name)), Some(expected));
        }
    }

    #[test]
    fn prop_fixed_amount_is_weight(weights in positive_weights()) {
        let allocation =
            SplitCalculator::compute_shares(&request(SplitMethod::FixedAmount, None, &weights))
                .unwrap();

        for (name, weight) in NAMES.iter().zip(&weights) {
            prop_assert_eq!(allocation.get(&member(name)), Some(*weight));
        }
    }

    #[test]
    fn prop_compute_is_idempotent(total in positive_total(), weights in positive_weights()) {
        let request = request(SplitMethod::Ratio, Some(total), &weights);
        let first = SplitCalculator::compute_shares(&request).unwrap();
        let second = SplitCalculator::compute_shares(&request).unwrap();
        prop_assert_eq!(first, second);
    }
}

#[test]
fn scenario_ratio_one_one_two() {
    let allocation = SplitCalculator::compute_shares(&request(
        SplitMethod::Ratio,
        Some(dec!(100.00)),
        &[dec!(1), dec!(1), dec!(2)],
    ))
    .unwrap();

    assert_eq!(allocation.get(&member("ana")), Some(dec!(25.00)));
    assert_eq!(allocation.get(&member("ben")), Some(dec!(25.00)));
    assert_eq!(allocation.get(&member("cai")), Some(dec!(50.00)));
}

#[test]
fn scenario_percentage_sixty_forty() {
    let allocation = SplitCalculator::compute_shares(&request(
        SplitMethod::Percentage,
        Some(dec!(200.00)),
        &[dec!(60), dec!(40)],
    ))
    .unwrap();

    assert_eq!(allocation.get(&member("ana")), Some(dec!(120.00)));
    assert_eq!(allocation.get(&member("ben")), Some(dec!(80.00)));
}
