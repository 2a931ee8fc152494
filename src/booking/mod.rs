//! Availability and overlap-conflict checking for court reservations.
//!
//! This is the single decision procedure for admitting a reservation. Every
//! write path (create, reschedule, seed) and the pre-flight availability
//! query go through the functions in this module; nothing else in the crate
//! re-implements the overlap rule, and model construction never touches it.
//!
//! Admission order for a candidate `(court, date, [start, end))`:
//! 1. interval well-formedness (`start < end`),
//! 2. not in the past (skipped for administrative backfill),
//! 3. minimum duration per [`BookingPolicy`],
//! 4. overlap against the active reservations of the same court and date.
//!
//! Intervals are half-open, so back-to-back bookings never conflict, and
//! cancelled reservations are ignored entirely.

pub mod error;
pub mod interval;


pub use error::{BookingError, ConflictInfo};
pub use interval::TimeRange;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::models::{Reservation, ReservationId};

/// Tunable booking rules.
///
/// The minimum duration is a policy knob, not a constant: the default is one
/// hour but deployments vary it per facility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookingPolicy {
    pub min_duration: Duration,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        BookingPolicy {
            min_duration: Duration::minutes(60),
        }
    }
}

impl BookingPolicy {
    pub fn new(min_duration: Duration) -> Self {
        BookingPolicy { min_duration }
    }

    /// Read the policy from `BOOKING_MIN_MINUTES`, falling back to the
    /// default when unset or unparsable.
    pub fn from_env() -> Self {
        let minutes = std::env::var("BOOKING_MIN_MINUTES")
            .ok()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|m| *m > 0);
        match minutes {
            Some(m) => BookingPolicy::new(Duration::minutes(m)),
            None => BookingPolicy::default(),
        }
    }

    /// Rule 3: the candidate must last at least the configured minimum.
    pub fn ensure_min_duration(&self, range: &TimeRange) -> Result<(), BookingError> {
        if range.duration() < self.min_duration {
            return Err(BookingError::invalid(format!(
                "duration {} min is below the {} min minimum",
                range.duration().num_minutes(),
                self.min_duration.num_minutes()
            )));
        }
        Ok(())
    }
}

/// Rule 2: the candidate must not start strictly before `now`.
///
/// `now` is the facility wall clock at the instant of the check; callers on
/// administrative backfill paths (bulk loads, edits of already-elapsed
/// reservations) skip this rule instead of calling it.
pub fn ensure_not_past(
    date: NaiveDate,
    range: &TimeRange,
    now: NaiveDateTime,
) -> Result<(), BookingError> {
    if date.and_time(range.start()) < now {
        return Err(BookingError::PastScheduling {
            date,
            start_time: range.start(),
        });
    }
    Ok(())
}

/// The first active reservation colliding with `candidate`, if any.
///
/// `existing` is the reservation set of one `(court, date)` partition as read
/// from storage; rows that are cancelled or equal to `exclude` are skipped,
/// so callers do not need to pre-filter. `exclude` carries the id of a
/// reservation being edited so it cannot conflict with itself.
pub fn find_conflict<'a>(
    candidate: &TimeRange,
    exclude: Option<ReservationId>,
    existing: &'a [Reservation],
) -> Option<&'a Reservation> {
    existing.iter().find(|r| {
        if !r.status.is_active() {
            return false;
        }
        if exclude == Some(r.id) {
            return false;
        }
        let occupied = TimeRange::new_unchecked(r.start_time, r.end_time);
        candidate.overlaps(&occupied)
    })
}

/// Boolean form of the overlap check, backing the pre-flight endpoint.
pub fn is_available(
    candidate: &TimeRange,
    exclude: Option<ReservationId>,
    existing: &[Reservation],
) -> bool {
    find_conflict(candidate, exclude, existing).is_none()
}

/// Asserting form used on write paths: `Err(Conflict)` carries the id and
/// interval of the reservation in the way.
pub fn ensure_no_conflict(
    candidate: &TimeRange,
    exclude: Option<ReservationId>,
    existing: &[Reservation],
) -> Result<(), BookingError> {
    match find_conflict(candidate, exclude, existing) {
        None => Ok(()),
        Some(taken) => Err(BookingError::Conflict(ConflictInfo {
            reservation_id: taken.id,
            start_time: taken.start_time,
            end_time: taken.end_time,
        })),
    }
}

/// Rules 1 through 3 in order. The overlap rule runs separately because it
/// needs the stored reservation set (inside the storage write's atomic unit).
pub fn validate_candidate(
    policy: &BookingPolicy,
    date: NaiveDate,
    range: &TimeRange,
    now: NaiveDateTime,
    enforce_future: bool,
) -> Result<(), BookingError> {
    if enforce_future {
        ensure_not_past(date, range, now)?;
    }
    policy.ensure_min_duration(range)?;
    Ok(())
}
