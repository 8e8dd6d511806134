//! Expense payloads handed to the transaction store.

use chrono::{DateTime, Utc};
use divvy_shared::types::{CurrencyCode, ExpenseId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::allocation::MonetaryAllocation;
use crate::currency::ExchangeRate;
use crate::error::ValidationError;
use crate::member::Member;
use crate::split::SplitMethod;

/// Method tag recorded with an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadMethod {
    /// Ratio split.
    Ratio,
    /// Percentage split.
    Percentage,
    /// Explicit per-member amounts, also used for itemized receipts.
    Amount,
    /// Direct payment between two members.
    Payment,
}

impl From<SplitMethod> for PayloadMethod {
    fn from(method: SplitMethod) -> Self {
        match method {
            SplitMethod::Ratio => Self::Ratio,
            SplitMethod::Percentage => Self::Percentage,
            SplitMethod::FixedAmount => Self::Amount,
        }
    }
}

/// Amount one consumer owes the payer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumerShare {
    /// Member who owes.
    pub consumer: Member,
    /// Amount owed, in the baseline currency.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

/// Record of one expense as accepted by the transaction store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpensePayload {
    /// Identifier of this expense.
    pub expense_id: ExpenseId,
    /// Group the expense belongs to.
    pub group: String,
    /// Member who paid.
    pub payer: Member,
    /// One entry per member other than the payer.
    pub consumers: Vec<ConsumerShare>,
    /// How the expense was split.
    pub method: PayloadMethod,
    /// Lower-cased category.
    pub category: String,
    /// Free-text explanation, stored as entered.
    pub explanation: Option<String>,
    /// When the expense happened.
    pub timestamp: DateTime<Utc>,
    /// Total of the whole allocation, payer's own share included.
    #[serde(with = "rust_decimal::serde::str")]
    pub total_amount: Decimal,
    /// Currency of every amount in the payload.
    pub currency: CurrencyCode,
}

impl ExpensePayload {
    /// Sum of the consumer amounts.
    #[must_use]
    pub fn consumer_total(&self) -> Decimal {
        self.consumers.iter().map(|c| c.amount).sum()
    }
}

/// Who paid and how the expense is described.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionDetails {
    /// Member who paid.
    pub payer: Member,
    /// Category as entered.
    pub category: String,
    /// Optional explanation.
    pub explanation: Option<String>,
    /// Expense time; `None` means now.
    pub timestamp: Option<DateTime<Utc>>,
}

impl SubmissionDetails {
    /// Creates details without explanation, timestamped at submission.
    #[must_use]
    pub fn new(payer: Member, category: impl Into<String>) -> Self {
        Self {
            payer,
            category: category.into(),
            explanation: None,
            timestamp: None,
        }
    }

    /// Sets the explanation.
    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Sets the timestamp.
    #[must_use]
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// An expense that has been normalized, computed and rounded, ready to be
/// handed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedExpense {
    /// The payload that will be submitted.
    pub payload: ExpensePayload,
    /// Rounded allocation, payer included.
    pub allocation: MonetaryAllocation,
    /// Rate the input was converted with.
    pub rate: ExchangeRate,
}

impl PreparedExpense {
    /// Builds the payload from a baseline-currency allocation.
    ///
    /// The whole allocation is rounded first so the recorded amounts keep
    /// adding up; the payer's own share is then left out of the consumers.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingField` for a blank category,
    /// `ValidationError::NoConsumers` when only the payer has a share, and
    /// `ValidationError::InvalidField` if rounding leaves the decimal range.
    pub fn assemble(
        group: &str,
        allocation: &MonetaryAllocation,
        details: SubmissionDetails,
        method: PayloadMethod,
        rate: ExchangeRate,
        decimal_places: u32,
    ) -> Result<Self, ValidationError> {
        let category = details.category.trim().to_lowercase();
        if category.is_empty() {
            return Err(ValidationError::MissingField("category"));
        }

        let rounded = allocation.rounded(decimal_places)?;
        let consumers: Vec<ConsumerShare> = rounded
            .iter()
            .filter(|(member, _)| **member != details.payer)
            .map(|(member, amount)| ConsumerShare {
                consumer: member.clone(),
                amount,
            })
            .collect();
        if consumers.is_empty() {
            return Err(ValidationError::NoConsumers);
        }

        let payload = ExpensePayload {
            expense_id: ExpenseId::new(),
            group: group.to_string(),
            payer: details.payer,
            consumers,
            method,
            category,
            explanation: details.explanation,
            timestamp: details.timestamp.unwrap_or_else(Utc::now),
            total_amount: rounded.total(),
            currency: rate.to_currency,
        };

        Ok(Self {
            payload,
            allocation: rounded,
            rate,
        })
    }
}
