//! Court and operating-slot persistence operations.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Court, CourtId, NewCourt, SlotId, SlotTemplate, TimeSlot};

#[async_trait]
pub trait CourtRepository: Send + Sync {
    /// Insert a court together with its generated operating slots, as one
    /// atomic write. Fails with a conflict error when the name is taken.
    async fn store_court(
        &self,
        new: NewCourt,
        slots: Vec<SlotTemplate>,
    ) -> RepositoryResult<Court>;

    async fn fetch_court(&self, id: CourtId) -> RepositoryResult<Court>;

    /// All courts, ordered by name.
    async fn fetch_courts(&self) -> RepositoryResult<Vec<Court>>;

    async fn update_court(&self, id: CourtId, fields: NewCourt) -> RepositoryResult<Court>;

    /// Remove a court and its slots. Fails with a conflict error while
    /// reservations still reference the court.
    async fn delete_court(&self, id: CourtId) -> RepositoryResult<()>;

    /// Operating slots of a court, ordered by start time. Not-found error
    /// when the court does not exist.
    async fn fetch_slots(&self, court_id: CourtId) -> RepositoryResult<Vec<TimeSlot>>;

    async fn fetch_slot(&self, id: SlotId) -> RepositoryResult<TimeSlot>;

    async fn store_slot(
        &self,
        court_id: CourtId,
        slot: SlotTemplate,
    ) -> RepositoryResult<TimeSlot>;

    async fn update_slot(&self, id: SlotId, fields: SlotTemplate) -> RepositoryResult<TimeSlot>;

    async fn delete_slot(&self, id: SlotId) -> RepositoryResult<()>;
}
