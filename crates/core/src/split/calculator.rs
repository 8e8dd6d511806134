//! Share computation for split requests.

use rust_decimal::Decimal;
use tracing::warn;

use super::types::{SplitMethod, SplitRequest};
use crate::allocation::{MonetaryAllocation, checked_sum, round};
use crate::error::ValidationError;

/// Computes per-member shares from a split request.
pub struct SplitCalculator;

impl SplitCalculator {
    /// Checks that a request carries everything the calculation needs.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingField` naming the first missing
    /// field, `InvalidField` for a non-positive total and `NoParticipants`
    /// when no weight is greater than zero.
    pub fn validate(request: &SplitRequest) -> Result<SplitMethod, ValidationError> {
        if request.payer().is_none() {
            return Err(ValidationError::MissingField("payer"));
        }
        let method = request
            .method()
            .ok_or(ValidationError::MissingField("method"))?;
        if request.category().is_none_or(|c| c.trim().is_empty()) {
            return Err(ValidationError::MissingField("category"));
        }

        if method.requires_total() {
            let total = request
                .total()
                .ok_or(ValidationError::MissingField("total_amount"))?;
            if total <= Decimal::ZERO {
                return Err(ValidationError::InvalidField {
                    field: "total_amount",
                    reason: format!("must be greater than zero, got {total}"),
                });
            }
        }

        if request.qualifying().next().is_none() {
            return Err(ValidationError::NoParticipants);
        }

        Ok(method)
    }

    /// Computes the share of every participant with a positive weight.
    ///
    /// - `Ratio`: `weight * total / sum(weights)`
    /// - `Percentage`: `(weight / 100) * total`, never renormalized
    /// - `FixedAmount`: the weight itself
    ///
    /// The payer is not removed here.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::validate`], `AmountMismatch` when fixed
    /// amounts disagree with a supplied total, and `InvalidField` if the
    /// weights or the arithmetic leave the decimal range.
    pub fn compute_shares(request: &SplitRequest) -> Result<MonetaryAllocation, ValidationError> {
        let method = Self::validate(request)?;
        let total = request.total().unwrap_or(Decimal::ZERO);

        let shares = match method {
            SplitMethod::Ratio => {
                let weight_sum = checked_sum(request.qualifying().map(|(_, w)| w))
                    .ok_or_else(weights_out_of_range)?;
                request
                    .qualifying()
                    .map(|(member, weight)| {
                        weight
                            .checked_mul(total)
                            .and_then(|v| v.checked_div(weight_sum))
                            .map(|share| (member.clone(), share))
                            .ok_or_else(out_of_range)
                    })
                    .collect::<Result<Vec<_>, _>>()?
            }
            SplitMethod::Percentage => {
                let percent_sum = checked_sum(request.qualifying().map(|(_, w)| w))
                    .ok_or_else(weights_out_of_range)?;
                if percent_sum != Decimal::ONE_HUNDRED {
                    warn!(
                        group = request.group(),
                        percent_sum = %percent_sum,
                        "percentage split does not add up to 100"
                    );
                }
                request
                    .qualifying()
                    .map(|(member, weight)| {
                        weight
                            .checked_div(Decimal::ONE_HUNDRED)
                            .and_then(|p| p.checked_mul(total))
                            .map(|share| (member.clone(), share))
                            .ok_or_else(out_of_range)
                    })
                    .collect::<Result<Vec<_>, _>>()?
            }
            SplitMethod::FixedAmount => {
                let shares: Vec<_> = request
                    .qualifying()
                    .map(|(member, weight)| (member.clone(), weight))
                    .collect();
                if let Some(expected) = request.total() {
                    let actual = checked_sum(shares.iter().map(|(_, share)| *share))
                        .ok_or_else(weights_out_of_range)?;
                    if round(actual, 2) != round(expected, 2) {
                        return Err(ValidationError::AmountMismatch { expected, actual });
                    }
                }
                shares
            }
        };

        MonetaryAllocation::new(shares)
    }
}

fn out_of_range() -> ValidationError {
    ValidationError::InvalidField {
        field: "total_amount",
        reason: "amount is out of range".to_string(),
    }
}

fn weights_out_of_range() -> ValidationError {
    ValidationError::InvalidField {
        field: "participants",
        reason: "weights add up beyond the decimal range".to_string(),
    }
}
