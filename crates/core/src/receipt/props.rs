//! Property-based tests for receipt allocation.
//!
//! - Shares add up to food cost plus tax
//! - Allocating twice gives the same result

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{Assignment, FoodUnitId, LineItem, Receipt, ReceiptAllocator, ReceiptError};
use crate::member::{Group, Member};

const NAMES: [&str; 3] = ["x", "y", "z"];

fn group() -> Group {
    Group::new("props", NAMES).unwrap()
}

/// Strategy to generate line items: quantity 1 to 4, unit cost 0.01 to 500.00.
fn line_items() -> impl Strategy<Value = Vec<LineItem>> {
    prop::collection::vec(
        (1u32..=4, 1i64..50_000i64).prop_map(|(quantity, cents)| {
            LineItem::new("item", quantity, Decimal::new(cents, 2))
        }),
        1..8,
    )
}

/// Strategy to generate a tax amount (0.00 to 100.00).
fn tax() -> impl Strategy<Value = Decimal> {
    (0i64..10_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Assigns units round-robin starting at `offset`.
fn assign_round_robin(group: &Group, receipt: &Receipt, offset: usize) -> Assignment {
    receipt
        .unit_ids()
        .enumerate()
        .fold(Assignment::builder(group, receipt), |builder, (i, id)| {
            builder.assign(id, NAMES[(i + offset) % NAMES.len()])
        })
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_shares_sum_to_food_cost_plus_tax(
        items in line_items(),
        tax in tax(),
        offset in 0usize..3,
    ) {
        let group = group();
        let receipt = Receipt::new(items, Some(tax));
        let assignment = assign_round_robin(&group, &receipt, offset);

        let food_cost: Decimal = receipt
            .items
            .iter()
            .map(|line| line.unit_cost.unwrap() * Decimal::from(line.quantity))
            .sum();
        let allocation = ReceiptAllocator::allocate(&receipt, &assignment).unwrap();

        let diff = (allocation.total() - (food_cost + tax)).abs();
        prop_assert!(diff <= dec!(0.000000001), "diff {}", diff);
        prop_assert!(allocation.iter().all(|(_, share)| share >= Decimal::ZERO));
    }

    #[test]
    fn prop_allocate_is_idempotent(items in line_items(), tax in tax()) {
        let group = group();
        let receipt = Receipt::new(items, Some(tax));
        let assignment = assign_round_robin(&group, &receipt, 0);

        let first = ReceiptAllocator::allocate(&receipt, &assignment).unwrap();
        let second = ReceiptAllocator::allocate(&receipt, &assignment).unwrap();
        prop_assert_eq!(first, second);
    }
}

#[test]
fn scenario_two_pizzas_to_one_member() {
    let group = group();
    let receipt = Receipt::new(vec![LineItem::new("Pizza", 2, dec!(10.00))], Some(dec!(2.00)));
    let assignment = Assignment::builder(&group, &receipt)
        .assign(FoodUnitId::new(0, 0), "x")
        .assign(FoodUnitId::new(0, 1), "x")
        .build()
        .unwrap();

    let allocation = ReceiptAllocator::allocate(&receipt, &assignment).unwrap();
    assert_eq!(allocation.len(), 1);
    assert_eq!(allocation.get(&Member::new("x").unwrap()), Some(dec!(22.00)));
}

#[test]
fn scenario_zero_food_cost_is_degenerate() {
    let group = group();
    let receipt = Receipt::new(vec![LineItem::new("Water", 2, dec!(0))], Some(dec!(1.00)));
    let assignment = Assignment::builder(&group, &receipt)
        .assign_item(0, "y")
        .build()
        .unwrap();

    assert_eq!(
        ReceiptAllocator::allocate(&receipt, &assignment).unwrap_err(),
        ReceiptError::DegenerateReceipt
    );
}
