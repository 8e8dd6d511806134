//! Expense submission.
//!
//! Turns allocations into payloads and hands them to the transaction store.

mod coordinator;
mod locks;
mod operation;
mod payload;
mod payment;
mod store;

pub use coordinator::ExpenseCoordinator;
pub use locks::{GroupGuard, GroupLocks};
pub use operation::{ExpenseInput, ExpenseOperation};
pub use payload::{
    ConsumerShare, ExpensePayload, PayloadMethod, PreparedExpense, SubmissionDetails,
};
pub use payment::{DEFAULT_PAYMENT_CATEGORY, PaymentRequest};
pub use store::{MemoryTransactionStore, StoreError, TransactionStore};
