//! Court and operating-slot management.
//!
//! Registering a court also generates its daily operating slots, one per
//! hour across the facility's operating window. Slot edits are checked for
//! overlap against the other slots of the same court; the interval model is
//! shared with the reservation checker.

use chrono::NaiveTime;

use crate::booking::TimeRange;
use crate::db::repository::FullRepository;
use crate::models::{
    Court, CourtId, CourtUpdate, NewCourt, SlotId, SlotTemplate, SlotUpdate, TimeSlot,
};

use super::{ServiceError, ServiceResult};

/// Daily operating window of the facility, in whole hours.
///
/// Slots do not cross midnight, so the closing hour is capped at 23.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingWindow {
    open_hour: u32,
    close_hour: u32,
}

impl Default for OperatingWindow {
    fn default() -> Self {
        OperatingWindow {
            open_hour: 14,
            close_hour: 23,
        }
    }
}

impl OperatingWindow {
    pub fn new(open_hour: u32, close_hour: u32) -> Option<Self> {
        if open_hour < close_hour && close_hour <= 23 {
            Some(OperatingWindow {
                open_hour,
                close_hour,
            })
        } else {
            None
        }
    }

    /// Read the window from `COURT_OPEN_HOUR` and `COURT_CLOSE_HOUR`,
    /// falling back to the default (14 to 23) when unset or invalid.
    pub fn from_env() -> Self {
        let fallback = OperatingWindow::default();
        let open = std::env::var("COURT_OPEN_HOUR")
            .ok()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(fallback.open_hour);
        let close = std::env::var("COURT_CLOSE_HOUR")
            .ok()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(fallback.close_hour);
        OperatingWindow::new(open, close).unwrap_or(fallback)
    }

    pub fn open_hour(&self) -> u32 {
        self.open_hour
    }

    pub fn close_hour(&self) -> u32 {
        self.close_hour
    }

    /// One open slot per hour across the window. The window invariant keeps
    /// every hour within `NaiveTime` range, so nothing is skipped.
    pub fn hourly_templates(&self) -> Vec<SlotTemplate> {
        (self.open_hour..self.close_hour)
            .filter_map(|hour| {
                let start_time = NaiveTime::from_hms_opt(hour, 0, 0)?;
                let end_time = NaiveTime::from_hms_opt(hour + 1, 0, 0)?;
                Some(SlotTemplate {
                    start_time,
                    end_time,
                    open: true,
                })
            })
            .collect()
    }
}

/// Register a court and generate its hourly operating slots in one write.
pub async fn create_court(
    repo: &dyn FullRepository,
    new: NewCourt,
    window: &OperatingWindow,
) -> ServiceResult<Court> {
    new.validate().map_err(ServiceError::Validation)?;
    Ok(repo.store_court(new, window.hourly_templates()).await?)
}

pub async fn get_court(repo: &dyn FullRepository, id: CourtId) -> ServiceResult<Court> {
    Ok(repo.fetch_court(id).await?)
}

pub async fn list_courts(repo: &dyn FullRepository) -> ServiceResult<Vec<Court>> {
    Ok(repo.fetch_courts().await?)
}

/// Apply a partial update over the stored fields and persist the result.
pub async fn update_court(
    repo: &dyn FullRepository,
    id: CourtId,
    update: CourtUpdate,
) -> ServiceResult<Court> {
    let current = repo.fetch_court(id).await?;
    let merged = current.merged(&update);
    merged.validate().map_err(ServiceError::Validation)?;
    Ok(repo.update_court(id, merged).await?)
}

/// Remove a court and its slots. Blocked while reservations reference it.
pub async fn delete_court(repo: &dyn FullRepository, id: CourtId) -> ServiceResult<()> {
    Ok(repo.delete_court(id).await?)
}

/// Operating slots of a court, ordered by start time.
pub async fn list_slots(repo: &dyn FullRepository, court_id: CourtId) -> ServiceResult<Vec<TimeSlot>> {
    Ok(repo.fetch_slots(court_id).await?)
}

/// Add one operating slot to a court. The slot must not overlap any other
/// slot of the same court, open or closed.
pub async fn add_slot(
    repo: &dyn FullRepository,
    court_id: CourtId,
    slot: SlotTemplate,
) -> ServiceResult<TimeSlot> {
    let range = TimeRange::new(slot.start_time, slot.end_time)?;
    let existing = repo.fetch_slots(court_id).await?;
    ensure_slot_fits(&range, None, &existing)?;
    Ok(repo.store_slot(court_id, slot).await?)
}

/// Apply a partial update to a slot, re-checking overlap against the other
/// slots of its court.
pub async fn update_slot(
    repo: &dyn FullRepository,
    id: SlotId,
    update: SlotUpdate,
) -> ServiceResult<TimeSlot> {
    let current = repo.fetch_slot(id).await?;
    let merged = current.merged(&update);
    let range = TimeRange::new(merged.start_time, merged.end_time)?;
    let others = repo.fetch_slots(current.court_id).await?;
    ensure_slot_fits(&range, Some(id), &others)?;
    Ok(repo.update_slot(id, merged).await?)
}

pub async fn delete_slot(repo: &dyn FullRepository, id: SlotId) -> ServiceResult<()> {
    Ok(repo.delete_slot(id).await?)
}

fn ensure_slot_fits(
    candidate: &TimeRange,
    exclude: Option<SlotId>,
    existing: &[TimeSlot],
) -> ServiceResult<()> {
    let taken = existing.iter().find(|slot| {
        if exclude == Some(slot.id) {
            return false;
        }
        let held = TimeRange::new_unchecked(slot.start_time, slot.end_time);
        candidate.overlaps(&held)
    });
    match taken {
        None => Ok(()),
        Some(slot) => Err(ServiceError::conflict(format!(
            "slot overlaps existing slot {} running [{}, {})",
            slot.id, slot.start_time, slot.end_time
        ))),
    }
}
