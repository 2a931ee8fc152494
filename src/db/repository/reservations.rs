//! Reservation persistence operations.
//!
//! The write operations here are conflict-guarded: the overlap scan and the
//! row write execute as one atomic unit per backend (serializable
//! transaction for Postgres, store-wide write lock for the in-memory
//! implementation), both invoking [`crate::booking::find_conflict`] as the
//! single overlap decision. Of two racing conflicting writes, at most one
//! commits; the loser observes [`GuardedWrite::Conflict`].

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::RepositoryResult;
use crate::booking::ConflictInfo;
use crate::models::{
    CourtId, NewReservation, Reservation, ReservationFilter, ReservationId, ReservationStatus,
    ReservationUpdate,
};

/// Outcome of a conflict-guarded reservation write.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardedWrite {
    /// The write committed.
    Committed(Reservation),
    /// An active reservation already occupies an overlapping interval;
    /// nothing was written.
    Conflict(ConflictInfo),
}

impl GuardedWrite {
    /// The committed reservation, if the write went through.
    pub fn committed(self) -> Option<Reservation> {
        match self {
            GuardedWrite::Committed(reservation) => Some(reservation),
            GuardedWrite::Conflict(_) => None,
        }
    }
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Insert a reservation after an overlap scan of the same court and
    /// date, atomically with respect to other guarded writes.
    ///
    /// Referential checks (client and court existence) are the caller's
    /// job; the backend still enforces them as a last line of defence.
    async fn store_reservation_checked(
        &self,
        new: NewReservation,
    ) -> RepositoryResult<GuardedWrite>;

    /// Move an existing reservation to the given effective values, excluding
    /// the reservation itself from the overlap scan so an unchanged interval
    /// never self-conflicts. Fails with a validation error when the stored
    /// reservation is cancelled.
    async fn reschedule_reservation_checked(
        &self,
        id: ReservationId,
        update: ReservationUpdate,
    ) -> RepositoryResult<GuardedWrite>;

    async fn fetch_reservation(&self, id: ReservationId) -> RepositoryResult<Reservation>;

    /// Reservations matching the filter, ordered by (date, start time).
    async fn fetch_reservations(
        &self,
        filter: ReservationFilter,
    ) -> RepositoryResult<Vec<Reservation>>;

    /// Every reservation of one `(court, date)` partition, all statuses.
    /// This is the read the availability checker consumes; status filtering
    /// is the checker's job, not the storage layer's.
    async fn fetch_for_court_date(
        &self,
        court_id: CourtId,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<Reservation>>;

    /// Write the status field and bump `updated_at`. Transition validity is
    /// enforced by the service layer.
    async fn set_reservation_status(
        &self,
        id: ReservationId,
        status: ReservationStatus,
    ) -> RepositoryResult<Reservation>;

    async fn delete_reservation(&self, id: ReservationId) -> RepositoryResult<()>;
}
