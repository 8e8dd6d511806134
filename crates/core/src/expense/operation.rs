//! Expense operations.
//!
//! An operation owns everything one user action needs and runs it end to end
//! with a single `run` call.

use chrono::{DateTime, Utc};
use divvy_shared::types::OperationId;
use tracing::info;

use super::coordinator::ExpenseCoordinator;
use super::payload::{ExpensePayload, SubmissionDetails};
use super::payment::PaymentRequest;
use super::store::TransactionStore;
use crate::currency::RateProvider;
use crate::error::EngineError;
use crate::member::Group;
use crate::receipt::{Assignment, Receipt};
use crate::split::SplitRequest;

/// What an operation records.
#[derive(Debug, Clone)]
pub enum ExpenseInput {
    /// A split of a total between participants.
    Split(SplitRequest),
    /// An itemized receipt with unit assignments.
    Itemized {
        /// Group roster the assignment was made against.
        group: Group,
        /// Parsed receipt.
        receipt: Receipt,
        /// Unit to member assignment.
        assignment: Assignment,
        /// Payer and description.
        details: SubmissionDetails,
    },
    /// A direct payment between two members.
    Payment(PaymentRequest),
}

impl ExpenseInput {
    const fn kind(&self) -> &'static str {
        match self {
            Self::Split(_) => "split",
            Self::Itemized { .. } => "itemized",
            Self::Payment(_) => "payment",
        }
    }
}

/// One user-initiated expense, run once.
#[derive(Debug, Clone)]
pub struct ExpenseOperation {
    id: OperationId,
    input: ExpenseInput,
    timestamp: Option<DateTime<Utc>>,
}

impl ExpenseOperation {
    /// Creates an operation for any input.
    #[must_use]
    pub fn new(input: ExpenseInput) -> Self {
        Self {
            id: OperationId::new(),
            input,
            timestamp: None,
        }
    }

    /// Creates a split operation.
    #[must_use]
    pub fn split(request: SplitRequest) -> Self {
        Self::new(ExpenseInput::Split(request))
    }

    /// Creates an itemized receipt operation.
    #[must_use]
    pub fn itemized(
        group: Group,
        receipt: Receipt,
        assignment: Assignment,
        details: SubmissionDetails,
    ) -> Self {
        Self::new(ExpenseInput::Itemized {
            group,
            receipt,
            assignment,
            details,
        })
    }

    /// Creates a payment operation.
    #[must_use]
    pub fn payment(payment: PaymentRequest) -> Self {
        Self::new(ExpenseInput::Payment(payment))
    }

    /// Records the expense at `timestamp` instead of when it is run.
    #[must_use]
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Operation id, for correlating log lines.
    #[must_use]
    pub const fn id(&self) -> OperationId {
        self.id
    }

    /// The input this operation records.
    #[must_use]
    pub const fn input(&self) -> &ExpenseInput {
        &self.input
    }

    /// Validates, normalizes, computes and submits the expense.
    ///
    /// # Errors
    ///
    /// Returns the first failing stage's error. A failed submission carries
    /// the prepared expense for a manual retry.
    #[tracing::instrument(skip_all, fields(operation_id = %self.id, kind = self.input.kind()))]
    pub async fn run<R, S>(
        self,
        coordinator: &ExpenseCoordinator<R, S>,
    ) -> Result<ExpensePayload, EngineError>
    where
        R: RateProvider,
        S: TransactionStore,
    {
        let prepared = match self.input {
            ExpenseInput::Split(request) => {
                coordinator.prepare_split(&request, self.timestamp).await?
            }
            ExpenseInput::Itemized {
                group,
                receipt,
                assignment,
                mut details,
            } => {
                if self.timestamp.is_some() {
                    details.timestamp = self.timestamp;
                }
                coordinator
                    .prepare_itemized(&group, &receipt, &assignment, details)
                    .await?
            }
            ExpenseInput::Payment(payment) => {
                coordinator.prepare_payment(&payment, self.timestamp).await?
            }
        };

        let payload = coordinator.submit(prepared).await?;
        info!(expense_id = %payload.expense_id, "Expense operation completed");
        Ok(payload)
    }
}
