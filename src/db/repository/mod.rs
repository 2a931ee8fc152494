//! Repository abstraction for the booking store.
//!
//! One trait per concern, combined into [`FullRepository`] for consumers that
//! need the whole store behind a single `Arc<dyn FullRepository>`. Backends
//! implement every trait; see `db::repositories` for the in-memory and
//! PostgreSQL implementations.

pub mod clients;
pub mod courts;
pub mod error;
pub mod payments;
pub mod reports;
pub mod reservations;
pub mod tournaments;

pub use clients::ClientRepository;
pub use courts::CourtRepository;
pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use payments::PaymentRepository;
pub use reports::{ReportingRepository, ReservationFact};
pub use reservations::{GuardedWrite, ReservationRepository};
pub use tournaments::TournamentRepository;

use async_trait::async_trait;

/// Liveness probe surface, used by the health endpoint.
#[async_trait]
pub trait SystemRepository: Send + Sync {
    /// Verify the backend can serve queries. For Postgres this executes a
    /// trivial statement; the in-memory store always succeeds.
    async fn health_check(&self) -> RepositoryResult<()>;
}

/// The complete repository surface.
pub trait FullRepository:
    ClientRepository
    + CourtRepository
    + ReservationRepository
    + TournamentRepository
    + PaymentRepository
    + ReportingRepository
    + SystemRepository
{
}

impl<T> FullRepository for T where
    T: ClientRepository
        + CourtRepository
        + ReservationRepository
        + TournamentRepository
        + PaymentRepository
        + ReportingRepository
        + SystemRepository
{
}
