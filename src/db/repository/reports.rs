//! Read models for usage reporting.
//!
//! The repository hands back lightweight fact rows; aggregation (top courts,
//! monthly counts, busiest clients) happens in the service layer.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::RepositoryResult;
use crate::models::{ClientId, CourtId, ReservationStatus};

/// One reservation joined with its court and client names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationFact {
    pub date: NaiveDate,
    pub status: ReservationStatus,
    pub court_id: CourtId,
    pub court_name: String,
    pub client_id: ClientId,
    pub client_name: String,
    pub client_email: String,
}

#[async_trait]
pub trait ReportingRepository: Send + Sync {
    /// Every reservation as a fact row, all statuses. Callers filter by
    /// status as needed.
    async fn fetch_reservation_facts(&self) -> RepositoryResult<Vec<ReservationFact>>;
}
