//! Receipt allocation errors.

use thiserror::Error;

use super::types::FoodUnitId;

/// Errors that stop a receipt from being allocated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceiptError {
    /// The parser could not read a value the allocation needs.
    #[error("Receipt is incomplete: missing {field}")]
    IncompleteReceipt {
        /// Path of the missing value, e.g. `tax` or `items[2].unit_cost`.
        field: String,
    },

    /// Some food units have no member assigned.
    #[error("Food units without a member: {}", join_units(.missing))]
    IncompleteAssignment {
        /// Unassigned units in receipt order.
        missing: Vec<FoodUnitId>,
    },

    /// The receipt's food costs add up to zero, so tax cannot be apportioned.
    #[error("Receipt food cost is zero")]
    DegenerateReceipt,

    /// A receipt value is out of range.
    #[error("Invalid receipt {field}: {reason}")]
    InvalidReceipt {
        /// Path of the offending value.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An assignment names a unit the receipt does not have.
    #[error("Food unit {unit} does not exist on the receipt")]
    UnknownFoodUnit {
        /// The unit that was referenced.
        unit: FoodUnitId,
    },
}

impl ReceiptError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::IncompleteReceipt { .. } => "INCOMPLETE_RECEIPT",
            Self::IncompleteAssignment { .. } => "INCOMPLETE_ASSIGNMENT",
            Self::DegenerateReceipt => "DEGENERATE_RECEIPT",
            Self::InvalidReceipt { .. } => "INVALID_RECEIPT",
            Self::UnknownFoodUnit { .. } => "UNKNOWN_FOOD_UNIT",
        }
    }
}

fn join_units(units: &[FoodUnitId]) -> String {
    units
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
