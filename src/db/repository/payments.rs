//! Payment persistence operations.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{NewPayment, Payment, PaymentFilter, PaymentId};

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Insert a payment. The referenced reservation must exist.
    async fn store_payment(&self, new: NewPayment) -> RepositoryResult<Payment>;

    async fn fetch_payment(&self, id: PaymentId) -> RepositoryResult<Payment>;

    /// Payments matching the filter, ordered by paid-on date.
    async fn fetch_payments(&self, filter: PaymentFilter) -> RepositoryResult<Vec<Payment>>;
}
