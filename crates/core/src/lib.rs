//! Allocation engine for Divvy.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! The two network collaborators (exchange rates and the transaction store) are
//! traits; HTTP implementations live in `divvy-gateway`.
//!
//! # Modules
//!
//! - `member` - Validated members and group rosters
//! - `currency` - Normalization of amounts into the baseline currency
//! - `allocation` - Per-member shares and cent rounding
//! - `split` - Ratio, percentage and fixed-amount splits
//! - `receipt` - Itemized receipt allocation with proportional tax
//! - `expense` - Payload construction, submission and operation objects
//! - `error` - Validation errors and the aggregate engine error

pub mod allocation;
pub mod currency;
pub mod error;
pub mod expense;
pub mod member;
pub mod receipt;
pub mod split;

#[cfg(test)]
mod testing;

pub use allocation::MonetaryAllocation;
pub use error::{EngineError, Stage, ValidationError};
pub use member::{Group, Member};
