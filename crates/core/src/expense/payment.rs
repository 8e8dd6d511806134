//! Direct payments between two members.

use divvy_shared::types::{CurrencyCode, Money};
use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::member::{Group, Member};

/// Category recorded for payments when none is given.
pub const DEFAULT_PAYMENT_CATEGORY: &str = "payment";

/// A settled transfer: `from` paid `to`.
///
/// Recorded with `from` as payer and `to` as the single consumer, so it
/// offsets what `from` owed `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    group: String,
    from: Member,
    to: Member,
    amount: Money,
    category: String,
    explanation: Option<String>,
}

impl PaymentRequest {
    /// Creates a payment between two members of `group`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownMember` for a name outside the group
    /// and `InvalidField` when both sides are the same member or the amount
    /// is not positive.
    pub fn new(
        group: &Group,
        from: &str,
        to: &str,
        amount: Decimal,
        currency: CurrencyCode,
    ) -> Result<Self, ValidationError> {
        let from = group.resolve(from)?;
        let to = group.resolve(to)?;
        if from == to {
            return Err(ValidationError::InvalidField {
                field: "to",
                reason: "a member cannot pay themselves".to_string(),
            });
        }
        if amount <= Decimal::ZERO {
            return Err(ValidationError::InvalidField {
                field: "amount",
                reason: format!("must be greater than zero, got {amount}"),
            });
        }

        Ok(Self {
            group: group.name().to_string(),
            from,
            to,
            amount: Money::new(amount, currency),
            category: DEFAULT_PAYMENT_CATEGORY.to_string(),
            explanation: None,
        })
    }

    /// Overrides the default category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the explanation.
    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Group name.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Member who paid.
    #[must_use]
    pub fn from(&self) -> &Member {
        &self.from
    }

    /// Member who received the money.
    #[must_use]
    pub fn to(&self) -> &Member {
        &self.to
    }

    /// Amount in the entered currency.
    #[must_use]
    pub const fn amount(&self) -> Money {
        self.amount
    }

    /// Category.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Explanation.
    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }
}
