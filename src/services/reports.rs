//! Usage reporting over reservation facts.
//!
//! The repository hands back one joined fact row per reservation; the
//! aggregations here run in memory. Cancelled reservations never count as
//! usage.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::db::repository::{FullRepository, ReservationFact};
use crate::models::{ClientId, CourtId};

use super::ServiceResult;

/// Reservation count of one court.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourtUsage {
    pub court_id: CourtId,
    pub court_name: String,
    pub reservations: usize,
}

/// Reservation count of one calendar month, keyed `YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyUsage {
    pub month: String,
    pub reservations: usize,
}

/// Reservation count of one court on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCourtUsage {
    pub date: NaiveDate,
    pub court_id: CourtId,
    pub court_name: String,
    pub reservations: usize,
}

/// Reservation count of one client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientActivity {
    pub client_id: ClientId,
    pub client_name: String,
    pub client_email: String,
    pub reservations: usize,
}

/// Facility usage aggregates for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageReport {
    /// Five busiest courts, all time.
    pub top_courts: Vec<CourtUsage>,
    /// Per-month totals, oldest first.
    pub monthly: Vec<MonthlyUsage>,
    /// Per-court daily counts across the 30 days ending today.
    pub last_30_days: Vec<DailyCourtUsage>,
    /// Fifteen most active clients, all time.
    pub top_clients: Vec<ClientActivity>,
}

/// Build the usage report from every active reservation on record.
pub async fn usage_report(
    repo: &dyn FullRepository,
    today: NaiveDate,
) -> ServiceResult<UsageReport> {
    let facts: Vec<ReservationFact> = repo
        .fetch_reservation_facts()
        .await?
        .into_iter()
        .filter(|fact| fact.status.is_active())
        .collect();

    Ok(UsageReport {
        top_courts: compute_top_courts(&facts, 5),
        monthly: compute_monthly(&facts),
        last_30_days: compute_daily_usage(&facts, today),
        top_clients: compute_top_clients(&facts, 15),
    })
}

/// Busiest courts first; ties break on the court name.
pub(crate) fn compute_top_courts(facts: &[ReservationFact], limit: usize) -> Vec<CourtUsage> {
    let mut counts: BTreeMap<CourtId, (String, usize)> = BTreeMap::new();
    for fact in facts {
        let entry = counts
            .entry(fact.court_id)
            .or_insert_with(|| (fact.court_name.clone(), 0));
        entry.1 += 1;
    }

    let mut usage: Vec<CourtUsage> = counts
        .into_iter()
        .map(|(court_id, (court_name, reservations))| CourtUsage {
            court_id,
            court_name,
            reservations,
        })
        .collect();
    usage.sort_by(|a, b| {
        b.reservations
            .cmp(&a.reservations)
            .then_with(|| a.court_name.cmp(&b.court_name))
    });
    usage.truncate(limit);
    usage
}

/// Per-month totals in ascending month order.
pub(crate) fn compute_monthly(facts: &[ReservationFact]) -> Vec<MonthlyUsage> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for fact in facts {
        let month = format!("{:04}-{:02}", fact.date.year(), fact.date.month());
        *counts.entry(month).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(month, reservations)| MonthlyUsage {
            month,
            reservations,
        })
        .collect()
}

/// Per-court daily counts across the 30 days ending at `today`, ordered by
/// date then court.
pub(crate) fn compute_daily_usage(
    facts: &[ReservationFact],
    today: NaiveDate,
) -> Vec<DailyCourtUsage> {
    let cutoff = today - Duration::days(29);
    let mut counts: BTreeMap<(NaiveDate, CourtId), (String, usize)> = BTreeMap::new();
    for fact in facts {
        if fact.date < cutoff || fact.date > today {
            continue;
        }
        let entry = counts
            .entry((fact.date, fact.court_id))
            .or_insert_with(|| (fact.court_name.clone(), 0));
        entry.1 += 1;
    }
    counts
        .into_iter()
        .map(|((date, court_id), (court_name, reservations))| DailyCourtUsage {
            date,
            court_id,
            court_name,
            reservations,
        })
        .collect()
}

/// Most active clients first; ties break on the client name.
pub(crate) fn compute_top_clients(facts: &[ReservationFact], limit: usize) -> Vec<ClientActivity> {
    let mut counts: BTreeMap<ClientId, (String, String, usize)> = BTreeMap::new();
    for fact in facts {
        let entry = counts
            .entry(fact.client_id)
            .or_insert_with(|| (fact.client_name.clone(), fact.client_email.clone(), 0));
        entry.2 += 1;
    }

    let mut activity: Vec<ClientActivity> = counts
        .into_iter()
        .map(|(client_id, (client_name, client_email, reservations))| ClientActivity {
            client_id,
            client_name,
            client_email,
            reservations,
        })
        .collect();
    activity.sort_by(|a, b| {
        b.reservations
            .cmp(&a.reservations)
            .then_with(|| a.client_name.cmp(&b.client_name))
    });
    activity.truncate(limit);
    activity
}
