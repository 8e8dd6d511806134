//! Expense submission coordinator.
//!
//! Sequences one expense through the pipeline:
//! validate -> normalize (rate lookup) -> compute -> build payload -> submit.
//! Nothing is kept between operations; a failed submission hands the
//! prepared expense back inside the error.

use chrono::{DateTime, Utc};
use divvy_shared::AppConfig;
use divvy_shared::types::CurrencyCode;
use tracing::{debug, info, warn};

use super::locks::GroupLocks;
use super::payload::{ExpensePayload, PayloadMethod, PreparedExpense, SubmissionDetails};
use super::payment::PaymentRequest;
use super::store::TransactionStore;
use crate::allocation::{MAX_DECIMAL_PLACES, MonetaryAllocation};
use crate::currency::{CurrencyNormalizer, ExchangeRate, RateProvider};
use crate::error::{EngineError, ValidationError};
use crate::member::Group;
use crate::receipt::{Assignment, Receipt, ReceiptAllocator};
use crate::split::{SplitCalculator, SplitRequest};

/// Default number of decimal places recorded amounts are rounded to.
const DEFAULT_DECIMAL_PLACES: u32 = 2;

/// Runs expenses through normalization, allocation and submission.
#[derive(Debug)]
pub struct ExpenseCoordinator<R, S> {
    normalizer: CurrencyNormalizer<R>,
    store: S,
    decimal_places: u32,
    locks: Option<GroupLocks>,
}

impl<R, S> ExpenseCoordinator<R, S>
where
    R: RateProvider,
    S: TransactionStore,
{
    /// Creates a coordinator that rounds to cents and serializes submissions
    /// per group.
    #[must_use]
    pub fn new(rates: R, store: S, baseline: CurrencyCode) -> Self {
        Self {
            normalizer: CurrencyNormalizer::new(rates, baseline),
            store,
            decimal_places: DEFAULT_DECIMAL_PLACES,
            locks: Some(GroupLocks::new()),
        }
    }

    /// Creates a coordinator from the application configuration.
    #[must_use]
    pub fn from_config(rates: R, store: S, config: &AppConfig) -> Self {
        Self::new(rates, store, config.baseline_currency)
            .with_decimal_places(config.submission.decimal_places)
            .with_group_serialization(config.submission.serialize_per_group)
    }

    /// Sets the number of decimal places recorded amounts are rounded to,
    /// capped at [`MAX_DECIMAL_PLACES`].
    #[must_use]
    pub fn with_decimal_places(mut self, decimal_places: u32) -> Self {
        if decimal_places > MAX_DECIMAL_PLACES {
            warn!(decimal_places, max = MAX_DECIMAL_PLACES, "decimal places capped");
        }
        self.decimal_places = decimal_places.min(MAX_DECIMAL_PLACES);
        self
    }

    /// Enables or disables the one-submission-per-group lock.
    #[must_use]
    pub fn with_group_serialization(mut self, enabled: bool) -> Self {
        self.locks = enabled.then(GroupLocks::new);
        self
    }

    /// Baseline currency every payload is recorded in.
    #[must_use]
    pub const fn baseline(&self) -> CurrencyCode {
        self.normalizer.baseline()
    }

    /// Returns the transaction store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates, normalizes and computes a split request.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any rate lookup when the request is
    /// incomplete, a currency error when normalization fails and a
    /// validation error for an unusable allocation.
    #[tracing::instrument(skip_all, fields(group = request.group(), currency = %request.currency()))]
    pub async fn prepare_split(
        &self,
        request: &SplitRequest,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<PreparedExpense, EngineError> {
        let method = SplitCalculator::validate(request)?;
        let payer = request
            .payer()
            .cloned()
            .ok_or(ValidationError::MissingField("payer"))?;

        let rate = self.normalizer.resolve(request.currency()).await?;
        let converted = request.converted(&rate)?;
        let allocation = SplitCalculator::compute_shares(&converted)?;
        debug!(%method, participants = allocation.len(), "computed split shares");

        let details = SubmissionDetails {
            payer,
            category: request.category().unwrap_or_default().to_string(),
            explanation: request.explanation().map(str::to_string),
            timestamp,
        };
        self.assemble(request.group(), &allocation, details, method.into(), rate)
    }

    /// Checks, normalizes and allocates an itemized receipt.
    ///
    /// # Errors
    ///
    /// Returns a receipt error before any rate lookup when the receipt or
    /// assignment is unusable, a validation error for a payer outside the
    /// group, and a currency error when normalization fails.
    #[tracing::instrument(skip_all, fields(group = group.name(), currency = %receipt.currency))]
    pub async fn prepare_itemized(
        &self,
        group: &Group,
        receipt: &Receipt,
        assignment: &Assignment,
        details: SubmissionDetails,
    ) -> Result<PreparedExpense, EngineError> {
        group.ensure_member(&details.payer)?;
        ReceiptAllocator::check(receipt, assignment)?;

        let rate = self.normalizer.resolve(receipt.currency).await?;
        let converted = receipt.converted(&rate)?;
        let allocation = ReceiptAllocator::allocate(&converted, assignment)?;
        debug!(units = assignment.len(), "allocated receipt");

        self.assemble(group.name(), &allocation, details, PayloadMethod::Amount, rate)
    }

    /// Normalizes a direct payment.
    ///
    /// # Errors
    ///
    /// Returns a currency error when normalization fails.
    #[tracing::instrument(skip_all, fields(group = payment.group(), currency = %payment.amount().currency))]
    pub async fn prepare_payment(
        &self,
        payment: &PaymentRequest,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<PreparedExpense, EngineError> {
        let money = payment.amount();
        let rate = self.normalizer.resolve(money.currency).await?;
        let amount = rate.convert(money.amount)?;

        let allocation = MonetaryAllocation::new([(payment.to().clone(), amount)])?;
        let details = SubmissionDetails {
            payer: payment.from().clone(),
            category: payment.category().to_string(),
            explanation: payment.explanation().map(str::to_string),
            timestamp,
        };
        self.assemble(payment.group(), &allocation, details, PayloadMethod::Payment, rate)
    }

    /// Builds and submits a payload for an allocation that is already in the
    /// baseline currency.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a payer outside the group, a blank
    /// category or an allocation without consumers, and `SubmissionFailed`
    /// when the store refuses the payload.
    pub async fn submit_allocation(
        &self,
        group: &Group,
        allocation: &MonetaryAllocation,
        details: SubmissionDetails,
        method: PayloadMethod,
    ) -> Result<ExpensePayload, EngineError> {
        group.ensure_member(&details.payer)?;
        let prepared = self.assemble(
            group.name(),
            allocation,
            details,
            method,
            ExchangeRate::identity(self.baseline()),
        )?;
        self.submit(prepared).await
    }

    /// Hands a prepared expense to the transaction store.
    ///
    /// With group serialization enabled, waits for any in-flight submission
    /// of the same group first. There is no retry.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::SubmissionFailed` carrying the prepared expense
    /// when the store is unreachable or rejects it.
    #[tracing::instrument(
        skip_all,
        fields(group = %prepared.payload.group, expense_id = %prepared.payload.expense_id)
    )]
    pub async fn submit(&self, prepared: PreparedExpense) -> Result<ExpensePayload, EngineError> {
        let _guard = match &self.locks {
            Some(locks) => Some(locks.acquire(&prepared.payload.group).await),
            None => None,
        };

        match self.store.submit(&prepared.payload).await {
            Ok(()) => {
                info!(
                    method = ?prepared.payload.method,
                    consumers = prepared.payload.consumers.len(),
                    total = %prepared.payload.total_amount,
                    "Expense submitted"
                );
                Ok(prepared.payload)
            }
            Err(source) => {
                warn!(error = %source, "Expense submission failed");
                Err(EngineError::SubmissionFailed {
                    source,
                    prepared: Box::new(prepared),
                })
            }
        }
    }

    fn assemble(
        &self,
        group: &str,
        allocation: &MonetaryAllocation,
        details: SubmissionDetails,
        method: PayloadMethod,
        rate: ExchangeRate,
    ) -> Result<PreparedExpense, EngineError> {
        Ok(PreparedExpense::assemble(
            group,
            allocation,
            details,
            method,
            rate,
            self.decimal_places,
        )?)
    }
}
