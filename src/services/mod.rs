//! Service layer for business logic and orchestration.
//!
//! This module sits between the HTTP handlers and the repository. Services
//! orchestrate repository calls, enforce referential and lifecycle rules,
//! and run every reservation write through the admission checks in
//! [`crate::booking`]. Handlers never talk to the repository directly.

pub mod clients;
pub mod courts;
pub mod payments;
pub mod reports;
pub mod reservations;
pub mod seed;
pub mod tournaments;

pub use courts::OperatingWindow;
pub use reports::{ClientActivity, CourtUsage, DailyCourtUsage, MonthlyUsage, UsageReport};
pub use reservations::ReservationDraft;
pub use seed::SeedSummary;

use thiserror::Error;

use crate::booking::BookingError;
use crate::db::repository::RepositoryError;

/// Failures surfaced by the service layer.
///
/// `Booking` and `Repository` wrap the lower layers unchanged so callers can
/// still tell a scheduling rejection from a storage failure. `Validation` and
/// `Conflict` cover rules the services enforce themselves, such as payload
/// references to missing entities or illegal status transitions.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    pub(crate) fn conflict(message: impl Into<String>) -> Self {
        ServiceError::Conflict(message.into())
    }
}

/// Map a repository not-found on a *referenced* entity to a validation
/// error: a payload pointing at a missing client or court is bad input, not
/// a missing resource.
pub(crate) fn reference_error(err: RepositoryError, entity: &str, id: i64) -> ServiceError {
    if err.is_not_found() {
        ServiceError::validation(format!("{entity} {id} does not exist"))
    } else {
        ServiceError::Repository(err)
    }
}
