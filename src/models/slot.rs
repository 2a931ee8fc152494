//! Court operating slots.
//!
//! Slots are the daily template of bookable hours for a court, generated when
//! the court is registered and adjustable afterwards. They do not reference a
//! calendar date; reservations do.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CourtId, SlotId};

/// A daily operating slot of one court.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: SlotId,
    pub court_id: CourtId,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Closed slots stay listed but are not offered for booking.
    pub open: bool,
    pub created_at: DateTime<Utc>,
}

/// Slot fields without identity, used on creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotTemplate {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub open: bool,
}

/// Partial slot update; `None` fields keep their current value.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SlotUpdate {
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub open: Option<bool>,
}

impl TimeSlot {
    /// Current mutable fields with a partial update applied.
    pub fn merged(&self, update: &SlotUpdate) -> SlotTemplate {
        SlotTemplate {
            start_time: update.start_time.unwrap_or(self.start_time),
            end_time: update.end_time.unwrap_or(self.end_time),
            open: update.open.unwrap_or(self.open),
        }
    }
}
