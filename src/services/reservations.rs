//! Reservation booking, rescheduling, and lifecycle transitions.
//!
//! Every write runs the admission rules in [`crate::booking`] before handing
//! the candidate to a conflict-guarded repository write, so the overlap scan
//! and the row write happen inside one atomic unit per backend. Of two
//! racing requests for the same interval, exactly one commits.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::booking::{self, BookingError, BookingPolicy, TimeRange};
use crate::db::repository::{FullRepository, GuardedWrite};
use crate::models::{
    ClientId, CourtId, NewReservation, Reservation, ReservationFilter, ReservationId,
    ReservationStatus, ReservationUpdate,
};

use super::{reference_error, ServiceError, ServiceResult};

/// Booking request as received from a client, before any admission check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReservationDraft {
    pub client_id: ClientId,
    pub court_id: CourtId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Partial reschedule request; `None` fields keep their current value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReservationPatch {
    pub client_id: Option<ClientId>,
    pub court_id: Option<CourtId>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

/// Book a court interval for a client.
///
/// Admission order: referenced entities exist, interval well-formed, not in
/// the past, minimum duration, then the overlap-guarded insert. The new
/// reservation starts out `Pending`.
pub async fn create_reservation(
    repo: &dyn FullRepository,
    policy: &BookingPolicy,
    draft: ReservationDraft,
    now: NaiveDateTime,
) -> ServiceResult<Reservation> {
    repo.fetch_client(draft.client_id)
        .await
        .map_err(|e| reference_error(e, "client", draft.client_id.value()))?;
    repo.fetch_court(draft.court_id)
        .await
        .map_err(|e| reference_error(e, "court", draft.court_id.value()))?;

    let range = TimeRange::new(draft.start_time, draft.end_time)?;
    booking::validate_candidate(policy, draft.date, &range, now, true)?;

    let write = repo
        .store_reservation_checked(NewReservation {
            client_id: draft.client_id,
            court_id: draft.court_id,
            date: draft.date,
            start_time: range.start(),
            end_time: range.end(),
            status: ReservationStatus::Pending,
        })
        .await?;
    admitted(write)
}

/// Reschedule a reservation by merging a partial request over the stored
/// row. The reservation itself is excluded from the overlap scan, so an
/// unchanged interval never conflicts with itself.
///
/// Editing an already-elapsed reservation skips the not-in-the-past rule;
/// the record is historical and corrections must stay possible.
pub async fn update_reservation(
    repo: &dyn FullRepository,
    policy: &BookingPolicy,
    id: ReservationId,
    patch: ReservationPatch,
    now: NaiveDateTime,
) -> ServiceResult<Reservation> {
    let current = repo.fetch_reservation(id).await?;
    if current.status == ReservationStatus::Cancelled {
        return Err(ServiceError::conflict(format!(
            "reservation {id} is cancelled and cannot be rescheduled"
        )));
    }

    if let Some(client_id) = patch.client_id {
        repo.fetch_client(client_id)
            .await
            .map_err(|e| reference_error(e, "client", client_id.value()))?;
    }
    if let Some(court_id) = patch.court_id {
        repo.fetch_court(court_id)
            .await
            .map_err(|e| reference_error(e, "court", court_id.value()))?;
    }

    let effective = ReservationUpdate {
        client_id: patch.client_id.unwrap_or(current.client_id),
        court_id: patch.court_id.unwrap_or(current.court_id),
        date: patch.date.unwrap_or(current.date),
        start_time: patch.start_time.unwrap_or(current.start_time),
        end_time: patch.end_time.unwrap_or(current.end_time),
    };
    let range = TimeRange::new(effective.start_time, effective.end_time)?;
    let enforce_future = !current.is_elapsed(now);
    booking::validate_candidate(policy, effective.date, &range, now, enforce_future)?;

    let write = repo.reschedule_reservation_checked(id, effective).await?;
    admitted(write)
}

pub async fn get_reservation(
    repo: &dyn FullRepository,
    id: ReservationId,
) -> ServiceResult<Reservation> {
    Ok(repo.fetch_reservation(id).await?)
}

/// Reservations matching the filter, ordered by (date, start time).
pub async fn list_reservations(
    repo: &dyn FullRepository,
    filter: ReservationFilter,
) -> ServiceResult<Vec<Reservation>> {
    Ok(repo.fetch_reservations(filter).await?)
}

/// Move a pending reservation to confirmed. Confirming twice is a no-op;
/// confirming a cancelled reservation is a conflict.
pub async fn confirm_reservation(
    repo: &dyn FullRepository,
    id: ReservationId,
) -> ServiceResult<Reservation> {
    let current = repo.fetch_reservation(id).await?;
    match current.status {
        ReservationStatus::Confirmed => Ok(current),
        ReservationStatus::Cancelled => Err(ServiceError::conflict(format!(
            "reservation {id} is cancelled and cannot be confirmed"
        ))),
        ReservationStatus::Pending => {
            Ok(repo
                .set_reservation_status(id, ReservationStatus::Confirmed)
                .await?)
        }
    }
}

/// Cancel a reservation, freeing its interval immediately. Cancelling twice
/// is a no-op.
pub async fn cancel_reservation(
    repo: &dyn FullRepository,
    id: ReservationId,
) -> ServiceResult<Reservation> {
    let current = repo.fetch_reservation(id).await?;
    if current.status == ReservationStatus::Cancelled {
        return Ok(current);
    }
    Ok(repo
        .set_reservation_status(id, ReservationStatus::Cancelled)
        .await?)
}

/// Remove a reservation row. Blocked while payments reference it; cancelling
/// is the normal way to free a slot.
pub async fn delete_reservation(repo: &dyn FullRepository, id: ReservationId) -> ServiceResult<()> {
    Ok(repo.delete_reservation(id).await?)
}

/// Pre-flight availability probe for `[start_time, end_time)` on one court
/// and date.
///
/// A malformed interval is an error, not "unavailable": the bounds are never
/// swapped on the caller's behalf. The answer is advisory; the guarded write
/// re-checks under its own atomic unit.
pub async fn check_availability(
    repo: &dyn FullRepository,
    court_id: CourtId,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    exclude: Option<ReservationId>,
) -> ServiceResult<bool> {
    repo.fetch_court(court_id).await?;
    let range = TimeRange::new(start_time, end_time)?;
    let existing = repo.fetch_for_court_date(court_id, date).await?;
    Ok(booking::is_available(&range, exclude, &existing))
}

fn admitted(write: GuardedWrite) -> ServiceResult<Reservation> {
    match write {
        GuardedWrite::Committed(reservation) => Ok(reservation),
        GuardedWrite::Conflict(info) => Err(BookingError::Conflict(info).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::ReservationRepository;
    use crate::models::{CourtKind, NewClient, NewCourt};
    use crate::services::courts::OperatingWindow;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    /// Morning of the 10th; bookings on the 10th afternoon are in the future.
    fn clock() -> NaiveDateTime {
        day(10).and_hms_opt(9, 0, 0).unwrap()
    }

    async fn seeded() -> (LocalRepository, ClientId, CourtId) {
        let repo = LocalRepository::new();
        let client = crate::services::clients::create_client(
            &repo,
            NewClient {
                first_name: "Lucia".to_string(),
                last_name: "Paredes".to_string(),
                phone: "1133445566".to_string(),
                email: "lucia@example.com".to_string(),
            },
        )
        .await
        .unwrap();
        let court = crate::services::courts::create_court(
            &repo,
            NewCourt {
                name: "Futbol 5 Norte".to_string(),
                kind: CourtKind::Futbol5,
            },
            &OperatingWindow::default(),
        )
        .await
        .unwrap();
        (repo, client.id, court.id)
    }

    fn draft(client: ClientId, court: CourtId, d: NaiveDate, from: NaiveTime, to: NaiveTime) -> ReservationDraft {
        ReservationDraft {
            client_id: client,
            court_id: court,
            date: d,
            start_time: from,
            end_time: to,
        }
    }

    #[tokio::test]
    async fn create_starts_pending_and_blocks_overlap() {
        let (repo, client, court) = seeded().await;
        let policy = BookingPolicy::default();

        let first = create_reservation(
            &repo,
            &policy,
            draft(client, court, day(10), t(18, 0), t(19, 0)),
            clock(),
        )
        .await
        .unwrap();
        assert_eq!(first.status, ReservationStatus::Pending);

        let err = create_reservation(
            &repo,
            &policy,
            draft(client, court, day(10), t(18, 30), t(19, 30)),
            clock(),
        )
        .await
        .unwrap_err();
        match err {
            ServiceError::Booking(BookingError::Conflict(info)) => {
                assert_eq!(info.reservation_id, first.id);
                assert_eq!(info.start_time, t(18, 0));
            }
            other => panic!("expected booking conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn back_to_back_bookings_are_admitted() {
        let (repo, client, court) = seeded().await;
        let policy = BookingPolicy::default();

        create_reservation(
            &repo,
            &policy,
            draft(client, court, day(10), t(18, 0), t(19, 0)),
            clock(),
        )
        .await
        .unwrap();
        let second = create_reservation(
            &repo,
            &policy,
            draft(client, court, day(10), t(19, 0), t(20, 0)),
            clock(),
        )
        .await
        .unwrap();
        assert_eq!(second.start_time, t(19, 0));
    }

    #[tokio::test]
    async fn admission_rules_run_in_order() {
        let (repo, client, court) = seeded().await;
        let policy = BookingPolicy::default();

        // Reversed interval.
        let err = create_reservation(
            &repo,
            &policy,
            draft(client, court, day(10), t(19, 0), t(18, 0)),
            clock(),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Booking(BookingError::InvalidInterval { .. })
        ));

        // In the past relative to the clock.
        let err = create_reservation(
            &repo,
            &policy,
            draft(client, court, day(9), t(18, 0), t(19, 0)),
            clock(),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Booking(BookingError::PastScheduling { .. })
        ));

        // Below the one-hour minimum.
        let err = create_reservation(
            &repo,
            &policy,
            draft(client, court, day(10), t(18, 0), t(18, 30)),
            clock(),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Booking(BookingError::InvalidInterval { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_references_are_validation_errors() {
        let (repo, client, court) = seeded().await;
        let policy = BookingPolicy::default();

        let err = create_reservation(
            &repo,
            &policy,
            draft(ClientId(999), court, day(10), t(18, 0), t(19, 0)),
            clock(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = create_reservation(
            &repo,
            &policy,
            draft(client, CourtId(999), day(10), t(18, 0), t(19, 0)),
            clock(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn reschedule_excludes_itself_but_not_others() {
        let (repo, client, court) = seeded().await;
        let policy = BookingPolicy::default();

        let first = create_reservation(
            &repo,
            &policy,
            draft(client, court, day(10), t(18, 0), t(19, 0)),
            clock(),
        )
        .await
        .unwrap();
        let second = create_reservation(
            &repo,
            &policy,
            draft(client, court, day(10), t(20, 0), t(21, 0)),
            clock(),
        )
        .await
        .unwrap();

        // Stretching the first booking within its own interval is fine.
        let stretched = update_reservation(
            &repo,
            &policy,
            first.id,
            ReservationPatch {
                end_time: Some(t(19, 30)),
                ..Default::default()
            },
            clock(),
        )
        .await
        .unwrap();
        assert_eq!(stretched.end_time, t(19, 30));

        // Moving it onto the second one is a conflict naming the second.
        let err = update_reservation(
            &repo,
            &policy,
            first.id,
            ReservationPatch {
                start_time: Some(t(20, 0)),
                end_time: Some(t(21, 0)),
                ..Default::default()
            },
            clock(),
        )
        .await
        .unwrap_err();
        match err {
            ServiceError::Booking(BookingError::Conflict(info)) => {
                assert_eq!(info.reservation_id, second.id);
            }
            other => panic!("expected booking conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancel_frees_the_interval_immediately() {
        let (repo, client, court) = seeded().await;
        let policy = BookingPolicy::default();

        let original = create_reservation(
            &repo,
            &policy,
            draft(client, court, day(10), t(18, 0), t(19, 0)),
            clock(),
        )
        .await
        .unwrap();
        let cancelled = cancel_reservation(&repo, original.id).await.unwrap();
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);

        // Same interval books again right away.
        let replacement = create_reservation(
            &repo,
            &policy,
            draft(client, court, day(10), t(18, 0), t(19, 0)),
            clock(),
        )
        .await
        .unwrap();
        assert_ne!(replacement.id, original.id);

        // Cancelling again is a no-op; rescheduling is not allowed.
        let again = cancel_reservation(&repo, original.id).await.unwrap();
        assert_eq!(again.status, ReservationStatus::Cancelled);
        let err = update_reservation(
            &repo,
            &policy,
            original.id,
            ReservationPatch::default(),
            clock(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn confirm_transitions_and_idempotence() {
        let (repo, client, court) = seeded().await;
        let policy = BookingPolicy::default();

        let reservation = create_reservation(
            &repo,
            &policy,
            draft(client, court, day(10), t(18, 0), t(19, 0)),
            clock(),
        )
        .await
        .unwrap();

        let confirmed = confirm_reservation(&repo, reservation.id).await.unwrap();
        assert_eq!(confirmed.status, ReservationStatus::Confirmed);
        let twice = confirm_reservation(&repo, reservation.id).await.unwrap();
        assert_eq!(twice.status, ReservationStatus::Confirmed);

        cancel_reservation(&repo, reservation.id).await.unwrap();
        let err = confirm_reservation(&repo, reservation.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn availability_probe_reflects_active_bookings() {
        let (repo, client, court) = seeded().await;
        let policy = BookingPolicy::default();

        assert!(check_availability(&repo, court, day(10), t(18, 0), t(19, 0), None)
            .await
            .unwrap());

        let reservation = create_reservation(
            &repo,
            &policy,
            draft(client, court, day(10), t(18, 0), t(19, 0)),
            clock(),
        )
        .await
        .unwrap();
        assert!(!check_availability(&repo, court, day(10), t(18, 30), t(19, 30), None)
            .await
            .unwrap());

        // Excluding the holder itself reports the interval as free.
        assert!(check_availability(
            &repo,
            court,
            day(10),
            t(18, 0),
            t(19, 0),
            Some(reservation.id)
        )
        .await
        .unwrap());

        // Reversed bounds are an error, never silently swapped.
        let err = check_availability(&repo, court, day(10), t(19, 0), t(18, 0), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Booking(BookingError::InvalidInterval { .. })
        ));

        cancel_reservation(&repo, reservation.id).await.unwrap();
        assert!(check_availability(&repo, court, day(10), t(18, 0), t(19, 0), None)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn elapsed_reservations_can_be_corrected() {
        let (repo, client, court) = seeded().await;
        let policy = BookingPolicy::default();

        // Stored directly: an old confirmed booking from two days ago.
        let old = repo
            .store_reservation_checked(NewReservation {
                client_id: client,
                court_id: court,
                date: day(8),
                start_time: t(18, 0),
                end_time: t(19, 0),
                status: ReservationStatus::Confirmed,
            })
            .await
            .unwrap()
            .committed()
            .unwrap();

        // The not-in-the-past rule is skipped for the historical record.
        let fixed = update_reservation(
            &repo,
            &policy,
            old.id,
            ReservationPatch {
                start_time: Some(t(19, 0)),
                end_time: Some(t(20, 0)),
                ..Default::default()
            },
            clock(),
        )
        .await
        .unwrap();
        assert_eq!(fixed.start_time, t(19, 0));

        // A future booking cannot be moved into the past.
        let upcoming = create_reservation(
            &repo,
            &policy,
            draft(client, court, day(11), t(18, 0), t(19, 0)),
            clock(),
        )
        .await
        .unwrap();
        let err = update_reservation(
            &repo,
            &policy,
            upcoming.id,
            ReservationPatch {
                date: Some(day(9)),
                ..Default::default()
            },
            clock(),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Booking(BookingError::PastScheduling { .. })
        ));
    }
}
