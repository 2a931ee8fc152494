//! Booking admission errors.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ReservationId;

/// Reference to the reservation a candidate interval collides with.
///
/// Carried inside [`BookingError::Conflict`] so callers can tell the user
/// exactly which booking is in the way and when it runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConflictInfo {
    pub reservation_id: ReservationId,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl ConflictInfo {
    pub fn for_reservation(taken: &crate::models::Reservation) -> Self {
        ConflictInfo {
            reservation_id: taken.id,
            start_time: taken.start_time,
            end_time: taken.end_time,
        }
    }
}

/// Why a candidate reservation was rejected.
///
/// All variants are client-input errors: recoverable by resubmitting a
/// corrected interval, never retried internally, never fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BookingError {
    /// The candidate interval is malformed (non-positive span, or shorter
    /// than the configured minimum duration).
    #[error("invalid interval: {reason}")]
    InvalidInterval { reason: String },

    /// The candidate starts before the current wall-clock instant.
    #[error("cannot schedule in the past ({date} {start_time})")]
    PastScheduling {
        date: NaiveDate,
        start_time: NaiveTime,
    },

    /// The candidate overlaps an active reservation on the same court/date.
    #[error(
        "overlaps reservation {} running [{}, {})",
        .0.reservation_id, .0.start_time, .0.end_time
    )]
    Conflict(ConflictInfo),
}

impl BookingError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        BookingError::InvalidInterval {
            reason: reason.into(),
        }
    }

    /// The colliding reservation, when this is a conflict.
    pub fn conflict_info(&self) -> Option<&ConflictInfo> {
        match self {
            BookingError::Conflict(info) => Some(info),
            _ => None,
        }
    }
}
