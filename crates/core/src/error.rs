//! Engine error types.
//!
//! Each component has its own error enum; `EngineError` aggregates them for
//! the operations that run the whole pipeline and knows which stage failed.

use std::fmt;

use divvy_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::currency::CurrencyError;
use crate::expense::{PreparedExpense, StoreError};
use crate::receipt::ReceiptError;

/// Missing or invalid caller input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was not supplied.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A field was supplied but its value is unusable.
    #[error("Invalid {field}: {reason}")]
    InvalidField {
        /// Field name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The named member is not on the group roster.
    #[error("Member '{member}' is not part of group '{group}'")]
    UnknownMember {
        /// Group name.
        group: String,
        /// Name that failed to resolve.
        member: String,
    },

    /// A participant weight was negative.
    #[error("Weight for '{member}' cannot be negative")]
    NegativeWeight {
        /// Participant name.
        member: String,
    },

    /// No participant has a weight greater than zero.
    #[error("At least one participant must have a weight greater than zero")]
    NoParticipants,

    /// Fixed amounts do not add up to the stated total.
    #[error("Fixed amounts sum to {actual}, expected {expected}")]
    AmountMismatch {
        /// The total supplied with the request.
        expected: Decimal,
        /// The sum of the fixed amounts.
        actual: Decimal,
    },

    /// A share was negative.
    #[error("Amount for '{member}' cannot be negative")]
    NegativeAmount {
        /// Member the share belongs to.
        member: String,
    },

    /// After removing the payer nobody owes anything.
    #[error("Expense has no consumers besides the payer")]
    NoConsumers,
}

impl ValidationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidField { .. } => "INVALID_FIELD",
            Self::UnknownMember { .. } => "UNKNOWN_MEMBER",
            Self::NegativeWeight { .. } => "NEGATIVE_WEIGHT",
            Self::NoParticipants => "NO_PARTICIPANTS",
            Self::AmountMismatch { .. } => "AMOUNT_MISMATCH",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::NoConsumers => "NO_CONSUMERS",
        }
    }

    /// Returns the name of the field the caller has to fix.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingField(field) | Self::InvalidField { field, .. } => *field,
            Self::UnknownMember { .. } => "member",
            Self::NegativeWeight { .. } | Self::NoParticipants => "participants",
            Self::AmountMismatch { .. } => "total_amount",
            Self::NegativeAmount { .. } => "amount",
            Self::NoConsumers => "consumers",
        }
    }
}

/// Pipeline stage an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Input validation and split calculation.
    Validation,
    /// Receipt preconditions and allocation.
    Receipt,
    /// Currency normalization.
    Normalization,
    /// Handing the payload to the transaction store.
    Submission,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validation => "validation",
            Self::Receipt => "receipt",
            Self::Normalization => "normalization",
            Self::Submission => "submission",
        };
        f.write_str(name)
    }
}

/// Any failure of an expense operation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Caller input was missing or invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Receipt allocation preconditions were not met.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    /// Currency normalization failed.
    #[error(transparent)]
    Currency(#[from] CurrencyError),

    /// The transaction store rejected the payload or could not be reached.
    ///
    /// The prepared expense is handed back so it can be resubmitted without
    /// normalizing and allocating again.
    #[error("Submission failed: {source}")]
    SubmissionFailed {
        /// Store failure.
        #[source]
        source: StoreError,
        /// The expense that was being submitted.
        prepared: Box<PreparedExpense>,
    },
}

impl EngineError {
    /// Returns the stage that failed.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::Validation(_) => Stage::Validation,
            Self::Receipt(_) => Stage::Receipt,
            Self::Currency(_) => Stage::Normalization,
            Self::SubmissionFailed { .. } => Stage::Submission,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.error_code(),
            Self::Receipt(err) => err.error_code(),
            Self::Currency(err) => err.error_code(),
            Self::SubmissionFailed { .. } => "SUBMISSION_FAILED",
        }
    }

    /// Returns true if running the same operation again may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Validation(_) | Self::Receipt(_) => false,
            Self::Currency(err) => err.is_retryable(),
            Self::SubmissionFailed { source, .. } => source.is_retryable(),
        }
    }

    /// Takes back the prepared expense from a failed submission.
    #[must_use]
    pub fn into_prepared(self) -> Option<PreparedExpense> {
        match self {
            Self::SubmissionFailed { prepared, .. } => Some(*prepared),
            _ => None,
        }
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        let message = format!("[{}] {err}", err.stage());
        match &err {
            EngineError::Validation(_) => Self::Validation(message),
            EngineError::Receipt(ReceiptError::DegenerateReceipt) => Self::BusinessRule(message),
            EngineError::Receipt(_) => Self::Validation(message),
            EngineError::Currency(CurrencyError::RateUnavailable { .. }) => {
                Self::BusinessRule(message)
            }
            EngineError::Currency(CurrencyError::ConversionOverflow { .. }) => {
                Self::Internal(message)
            }
            EngineError::Currency(CurrencyError::RateSourceError { .. })
            | EngineError::SubmissionFailed { .. } => Self::ExternalService(message),
        }
    }
}
