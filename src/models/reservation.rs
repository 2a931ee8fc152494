//! Reservation records and status lifecycle.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{ClientId, CourtId, ReservationId};

/// Lifecycle of a reservation.
///
/// Created as `Pending`, then moved to `Confirmed` or `Cancelled`. Only
/// `Pending` and `Confirmed` reservations occupy court time; `Cancelled` rows
/// are kept as history and never rescheduled.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    /// Whether this reservation holds its interval for overlap purposes.
    pub fn is_active(&self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Confirmed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ReservationStatus::Pending),
            "confirmed" => Ok(ReservationStatus::Confirmed),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            other => Err(format!(
                "unknown reservation status '{other}' (expected pending, confirmed or cancelled)"
            )),
        }
    }
}

/// A court booking for one client on one calendar date.
///
/// Invariant: `start_time < end_time`. The interval is half-open,
/// `[start_time, end_time)`, so a booking ending at 18:00 does not collide
/// with one starting at 18:00.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub client_id: ClientId,
    pub court_id: CourtId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// True when the whole interval lies before `now` (wall clock of the
    /// facility). Used to recognise edits of historical records.
    pub fn is_elapsed(&self, now: NaiveDateTime) -> bool {
        self.date.and_time(self.end_time) <= now
    }
}

/// Reservation fields without identity, used on creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewReservation {
    pub client_id: ClientId,
    pub court_id: CourtId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: ReservationStatus,
}

/// Effective values for a reschedule, after merging a partial request over
/// the stored reservation. Always complete; merging happens in the service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReservationUpdate {
    pub client_id: ClientId,
    pub court_id: CourtId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Listing filters; `None` means no constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReservationFilter {
    pub court_id: Option<CourtId>,
    pub client_id: Option<ClientId>,
    pub date: Option<NaiveDate>,
    pub status: Option<ReservationStatus>,
}

impl ReservationFilter {
    pub fn matches(&self, reservation: &Reservation) -> bool {
        self.court_id.map_or(true, |c| reservation.court_id == c)
            && self.client_id.map_or(true, |c| reservation.client_id == c)
            && self.date.map_or(true, |d| reservation.date == d)
            && self.status.map_or(true, |s| reservation.status == s)
    }
}
