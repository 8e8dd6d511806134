//! Itemized receipt allocation.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::assignment::Assignment;
use super::error::ReceiptError;
use super::types::{FoodUnit, Receipt};
use crate::allocation::MonetaryAllocation;

/// Allocates a receipt to members from a unit assignment.
///
/// Each unit carries its own price plus a slice of the tax proportional to
/// that price: `unit_tax = price * tax / total_food_cost`. A member owes the
/// sum over the units assigned to them.
pub struct ReceiptAllocator;

impl ReceiptAllocator {
    /// Checks every precondition and returns the expanded food units.
    ///
    /// Checks run in this order: value ranges, units that do not exist on
    /// the receipt, unassigned units, missing tax or unit costs.
    ///
    /// # Errors
    ///
    /// Returns `InvalidReceipt`, `UnknownFoodUnit`, `IncompleteAssignment`
    /// or `IncompleteReceipt`, in that order of precedence.
    pub fn check(receipt: &Receipt, assignment: &Assignment) -> Result<Vec<FoodUnit>, ReceiptError> {
        Self::check_ranges(receipt)?;

        if let Some((unit, _)) = assignment.iter().find(|(id, _)| !receipt.contains(*id)) {
            return Err(ReceiptError::UnknownFoodUnit { unit });
        }

        let missing: Vec<_> = receipt
            .unit_ids()
            .filter(|id| assignment.get(*id).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ReceiptError::IncompleteAssignment { missing });
        }

        if receipt.tax.is_none() {
            return Err(ReceiptError::IncompleteReceipt {
                field: "tax".to_string(),
            });
        }
        receipt.food_units()
    }

    fn check_ranges(receipt: &Receipt) -> Result<(), ReceiptError> {
        for (index, line) in receipt.items.iter().enumerate() {
            line.check_quantity(index)?;
            if line.unit_cost.is_some_and(|cost| cost < Decimal::ZERO) {
                return Err(ReceiptError::InvalidReceipt {
                    field: format!("items[{index}].unit_cost"),
                    reason: "cannot be negative".to_string(),
                });
            }
        }
        if receipt.tax.is_some_and(|tax| tax.amount < Decimal::ZERO) {
            return Err(ReceiptError::InvalidReceipt {
                field: "tax".to_string(),
                reason: "cannot be negative".to_string(),
            });
        }
        Ok(())
    }

    /// Computes every member's share of the receipt, tax included.
    ///
    /// The shares add up to the food cost plus tax.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::check`], and `DegenerateReceipt` when
    /// the food cost is zero.
    pub fn allocate(
        receipt: &Receipt,
        assignment: &Assignment,
    ) -> Result<MonetaryAllocation, ReceiptError> {
        let units = Self::check(receipt, assignment)?;
        let tax = receipt.tax.map_or(Decimal::ZERO, |tax| tax.amount);

        let total_food_cost = units
            .iter()
            .try_fold(Decimal::ZERO, |acc, unit| acc.checked_add(unit.price))
            .ok_or_else(out_of_range)?;
        if total_food_cost.is_zero() {
            return Err(ReceiptError::DegenerateReceipt);
        }

        let mut shares: BTreeMap<_, Decimal> = BTreeMap::new();
        for unit in &units {
            let Some(member) = assignment.get(unit.id) else {
                continue;
            };
            let unit_tax = unit
                .price
                .checked_mul(tax)
                .and_then(|v| v.checked_div(total_food_cost))
                .ok_or_else(out_of_range)?;
            let owed = shares.entry(member.clone()).or_default();
            *owed = owed
                .checked_add(unit.price)
                .and_then(|v| v.checked_add(unit_tax))
                .ok_or_else(out_of_range)?;
        }

        MonetaryAllocation::from_checked(shares).ok_or_else(out_of_range)
    }
}

fn out_of_range() -> ReceiptError {
    ReceiptError::InvalidReceipt {
        field: "items".to_string(),
        reason: "amounts are out of range".to_string(),
    }
}
