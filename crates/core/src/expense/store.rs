//! Transaction store collaborator.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use super::payload::ExpensePayload;

/// Failure to hand a payload to the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("Transaction store unreachable: {0}")]
    Unreachable(String),

    /// The store answered and refused the payload.
    #[error("Transaction store rejected the expense (status {status}): {message}")]
    Rejected {
        /// Status code returned by the store.
        status: u16,
        /// Response body or reason.
        message: String,
    },
}

impl StoreError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unreachable(_) => "STORE_UNREACHABLE",
            Self::Rejected { .. } => "STORE_REJECTED",
        }
    }

    /// Returns true if resubmitting the same payload may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }
}

/// Destination for finished expense payloads.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Records one expense.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unreachable` on transport failure and
    /// `StoreError::Rejected` if the store refused the payload.
    async fn submit(&self, payload: &ExpensePayload) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: TransactionStore + ?Sized> TransactionStore for Arc<S> {
    async fn submit(&self, payload: &ExpensePayload) -> Result<(), StoreError> {
        (**self).submit(payload).await
    }
}

/// Store that keeps payloads in memory, in submission order.
#[derive(Debug, Default)]
pub struct MemoryTransactionStore {
    submitted: Mutex<Vec<ExpensePayload>>,
}

impl MemoryTransactionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every payload recorded so far.
    pub async fn submitted(&self) -> Vec<ExpensePayload> {
        self.submitted.lock().await.clone()
    }
}

#[async_trait]
impl TransactionStore for MemoryTransactionStore {
    async fn submit(&self, payload: &ExpensePayload) -> Result<(), StoreError> {
        self.submitted.lock().await.push(payload.clone());
        Ok(())
    }
}
