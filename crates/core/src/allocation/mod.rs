//! Per-member monetary allocations and cent rounding.

mod rounding;

#[cfg(test)]
mod props;

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

pub use rounding::{MAX_DECIMAL_PLACES, checked_sum, round, round_preserving_sum};

use crate::error::ValidationError;
use crate::member::Member;

/// Mapping from member to share in the baseline currency.
///
/// Members are kept in name order. Every share is non-negative; a share of
/// zero is allowed and kept. The shares always add up within the decimal
/// range.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct MonetaryAllocation {
    shares: BTreeMap<Member, Decimal>,
}

impl MonetaryAllocation {
    /// Builds an allocation from `(member, share)` pairs.
    ///
    /// A member listed twice keeps the later share.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NegativeAmount` if any share is negative and
    /// `ValidationError::InvalidField` if the shares do not add up within the
    /// decimal range.
    pub fn new<I>(shares: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (Member, Decimal)>,
    {
        let shares: BTreeMap<Member, Decimal> = shares.into_iter().collect();
        if let Some((member, _)) = shares.iter().find(|(_, share)| **share < Decimal::ZERO) {
            return Err(ValidationError::NegativeAmount {
                member: member.to_string(),
            });
        }
        Self::from_checked(shares).ok_or_else(total_out_of_range)
    }

    /// Wraps shares the caller has already checked to be non-negative.
    ///
    /// Returns `None` if the shares overflow when added up.
    pub(crate) fn from_checked(shares: BTreeMap<Member, Decimal>) -> Option<Self> {
        debug_assert!(shares.values().all(|share| *share >= Decimal::ZERO));
        checked_sum(shares.values().copied())?;
        Some(Self { shares })
    }

    /// Returns the share of a member, if any.
    #[must_use]
    pub fn get(&self, member: &Member) -> Option<Decimal> {
        self.shares.get(member).copied()
    }

    /// Iterates over `(member, share)` in member order.
    pub fn iter(&self) -> impl Iterator<Item = (&Member, Decimal)> {
        self.shares.iter().map(|(member, share)| (member, *share))
    }

    /// Number of members with a share.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    /// Returns true if nobody has a share.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Sum of all shares.
    #[must_use]
    pub fn total(&self) -> Decimal {
        // Construction rejects shares whose sum overflows.
        checked_sum(self.shares.values().copied()).unwrap_or(Decimal::MAX)
    }

    /// Returns a copy rounded to `decimal_places` whose shares add up exactly to
    /// the rounded total.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidField` if rounding up a share leaves
    /// the decimal range.
    pub fn rounded(&self, decimal_places: u32) -> Result<Self, ValidationError> {
        let exact: Vec<Decimal> = self.shares.values().copied().collect();
        let rounded =
            round_preserving_sum(&exact, decimal_places).ok_or_else(total_out_of_range)?;
        Ok(Self {
            shares: self.shares.keys().cloned().zip(rounded).collect(),
        })
    }
}

fn total_out_of_range() -> ValidationError {
    ValidationError::InvalidField {
        field: "shares",
        reason: "total is out of range".to_string(),
    }
}
