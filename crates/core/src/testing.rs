//! Collaborator doubles shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use divvy_shared::types::CurrencyCode;
use rust_decimal::Decimal;

use crate::currency::{RateError, RateProvider};
use crate::expense::{ExpensePayload, StoreError, TransactionStore};

/// Wraps a provider and counts the lookups that reach it.
#[derive(Debug)]
pub struct CountingProvider<P> {
    inner: P,
    calls: AtomicUsize,
}

impl<P> CountingProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<P: RateProvider> RateProvider for CountingProvider<P> {
    async fn rate(&self, from: CurrencyCode, to: CurrencyCode) -> Result<Decimal, RateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.rate(from, to).await
    }
}

/// Provider that always fails with the same error.
#[derive(Debug)]
pub struct FailingProvider(RateError);

impl FailingProvider {
    pub fn new(err: RateError) -> Self {
        Self(err)
    }
}

#[async_trait]
impl RateProvider for FailingProvider {
    async fn rate(&self, _from: CurrencyCode, _to: CurrencyCode) -> Result<Decimal, RateError> {
        Err(self.0.clone())
    }
}

/// Store that always fails with the same error.
#[derive(Debug)]
pub struct FailingStore(StoreError);

impl FailingStore {
    pub fn new(err: StoreError) -> Self {
        Self(err)
    }
}

#[async_trait]
impl TransactionStore for FailingStore {
    async fn submit(&self, _payload: &ExpensePayload) -> Result<(), StoreError> {
        Err(self.0.clone())
    }
}

/// Store that takes a while per submission and records peak concurrency.
#[derive(Debug)]
pub struct SlowStore {
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    completed: AtomicUsize,
}

impl SlowStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        }
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionStore for SlowStore {
    async fn submit(&self, _payload: &ExpensePayload) -> Result<(), StoreError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
