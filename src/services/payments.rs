//! Payment bookkeeping for reservations.

use crate::db::repository::FullRepository;
use crate::models::{NewPayment, Payment, PaymentFilter, PaymentId};

use super::{reference_error, ServiceError, ServiceResult};

/// Record a payment against an existing reservation.
pub async fn create_payment(repo: &dyn FullRepository, new: NewPayment) -> ServiceResult<Payment> {
    new.validate().map_err(ServiceError::Validation)?;
    repo.fetch_reservation(new.reservation_id)
        .await
        .map_err(|e| reference_error(e, "reservation", new.reservation_id.value()))?;
    Ok(repo.store_payment(new).await?)
}

pub async fn get_payment(repo: &dyn FullRepository, id: PaymentId) -> ServiceResult<Payment> {
    Ok(repo.fetch_payment(id).await?)
}

/// Payments matching the filter, ordered by paid-on date.
pub async fn list_payments(
    repo: &dyn FullRepository,
    filter: PaymentFilter,
) -> ServiceResult<Vec<Payment>> {
    Ok(repo.fetch_payments(filter).await?)
}
