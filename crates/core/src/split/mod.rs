//! Split calculation.
//!
//! A `SplitRequest` is built once against a group roster and handed to the
//! `SplitCalculator`, which turns the weights into shares of the total.

mod calculator;
mod types;

#[cfg(test)]
mod props;

pub use calculator::SplitCalculator;
pub use types::{SplitMethod, SplitRequest, SplitRequestBuilder};
