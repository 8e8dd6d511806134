//! Itemized receipt allocation.
//!
//! A parsed receipt is expanded into food units, each unit is assigned to a
//! member, and tax is spread over the units in proportion to their price.

mod assignment;
mod engine;
mod error;
mod types;

#[cfg(test)]
mod props;

pub use assignment::{Assignment, AssignmentBuilder};
pub use engine::ReceiptAllocator;
pub use error::ReceiptError;
pub use types::{
    FoodUnit, FoodUnitId, LineItem, MAX_ITEM_QUANTITY, ParsedReceipt, Receipt, Tax,
};
