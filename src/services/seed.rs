//! Demo-data seeding.
//!
//! Populates the repository with a recognisable demo dataset: ten clients,
//! five courts with their operating slots, two tournaments, and roughly
//! ninety days of confirmed reservation history with matching payments.
//!
//! Catalog entities (clients, courts, tournaments) are matched by their
//! unique field first, so re-running the seeder never duplicates them.
//! Reservation history is additive: each run places another batch of
//! historical bookings through the same conflict-guarded write path user
//! bookings take, so seeded rows can never overlap — candidates that collide
//! with an existing reservation are skipped, not forced.
//!
//! Seeded reservations are administrative backfill: the not-in-the-past rule
//! does not apply to them, which is why this module writes through the
//! repository directly instead of [`super::reservations::create_reservation`].

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::db::repository::{FullRepository, GuardedWrite};
use crate::models::{
    Client, Court, CourtKind, NewClient, NewCourt, NewPayment, NewReservation, NewTournament,
    PaymentStatus, ReservationStatus,
};

use super::courts::OperatingWindow;
use super::{clients, courts, tournaments, ServiceResult};

/// How many historical reservations one run tries to place.
const RESERVATION_TARGET: usize = 150;

/// How far back the reservation history reaches, in days.
const HISTORY_DAYS: i64 = 90;

/// Court fees the payment generator picks from.
const PAYMENT_AMOUNTS: [f64; 3] = [15_000.0, 20_000.0, 12_000.0];

const DEMO_CLIENTS: [(&str, &str); 10] = [
    ("Lionel", "Messi"),
    ("Cristiano", "Ronaldo"),
    ("Neymar", "Junior"),
    ("Kylian", "Mbappe"),
    ("Luka", "Modric"),
    ("Erling", "Haaland"),
    ("Vinicius", "Junior"),
    ("Kevin", "De Bruyne"),
    ("Harry", "Kane"),
    ("Sergio", "Ramos"),
];

const DEMO_COURTS: [(&str, CourtKind); 5] = [
    ("Estadio Lusail", CourtKind::Futbol5),
    ("Camp Nou", CourtKind::Futbol7),
    ("Roland Garros", CourtKind::Tenis),
    ("Wimbledon", CourtKind::Tenis),
    ("Padel Center", CourtKind::Padel),
];

/// What one seeding run created. Counts cover this run only; entities that
/// already existed are reused and not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub clients: usize,
    pub courts: usize,
    pub slots: usize,
    pub tournaments: usize,
    pub reservations: usize,
    pub payments: usize,
    /// Candidates dropped because an active reservation already occupied
    /// the interval.
    pub skipped: usize,
}

/// Populate the repository with the demo dataset.
///
/// `today` anchors the history window and the tournament calendar;
/// `rng_seed` makes a run reproducible.
pub async fn seed_demo_data(
    repo: &dyn FullRepository,
    window: &OperatingWindow,
    today: NaiveDate,
    rng_seed: u64,
) -> ServiceResult<SeedSummary> {
    let mut summary = SeedSummary::default();
    let mut rng = StdRng::seed_from_u64(rng_seed);

    let roster = ensure_clients(repo, &mut summary).await?;
    let grounds = ensure_courts(repo, window, &mut summary).await?;
    ensure_tournaments(repo, &grounds, today, &mut summary).await?;
    place_history(repo, &roster, &grounds, window, today, &mut rng, &mut summary).await?;

    Ok(summary)
}

/// Create the demo clients that are not present yet, matched by email.
async fn ensure_clients(
    repo: &dyn FullRepository,
    summary: &mut SeedSummary,
) -> ServiceResult<Vec<Client>> {
    let existing = repo.fetch_clients().await?;
    let mut roster = Vec::with_capacity(DEMO_CLIENTS.len());
    for (index, (first_name, last_name)) in DEMO_CLIENTS.iter().enumerate() {
        let email = format!("{}@goal.com", first_name.to_lowercase());
        if let Some(found) = existing
            .iter()
            .find(|c| c.email.eq_ignore_ascii_case(&email))
        {
            roster.push(found.clone());
            continue;
        }
        let created = clients::create_client(
            repo,
            NewClient {
                first_name: (*first_name).to_string(),
                last_name: (*last_name).to_string(),
                phone: format!("11-5550-{index:04}"),
                email,
            },
        )
        .await?;
        summary.clients += 1;
        roster.push(created);
    }
    Ok(roster)
}

/// Create the demo courts that are not present yet, matched by name. New
/// courts get one operating slot per hour of the window.
async fn ensure_courts(
    repo: &dyn FullRepository,
    window: &OperatingWindow,
    summary: &mut SeedSummary,
) -> ServiceResult<Vec<Court>> {
    let existing = repo.fetch_courts().await?;
    let mut grounds = Vec::with_capacity(DEMO_COURTS.len());
    for (name, kind) in DEMO_COURTS {
        if let Some(found) = existing.iter().find(|c| c.name.eq_ignore_ascii_case(name)) {
            grounds.push(found.clone());
            continue;
        }
        let created = courts::create_court(
            repo,
            NewCourt {
                name: name.to_string(),
                kind,
            },
            window,
        )
        .await?;
        summary.courts += 1;
        summary.slots += window.hourly_templates().len();
        grounds.push(created);
    }
    Ok(grounds)
}

/// Create the season tournaments unless they already exist, and assign
/// matching courts to the new ones.
async fn ensure_tournaments(
    repo: &dyn FullRepository,
    grounds: &[Court],
    today: NaiveDate,
    summary: &mut SeedSummary,
) -> ServiceResult<()> {
    let existing = repo.fetch_tournaments().await?;
    let season: [(&str, NaiveDate, NaiveDate, &str, &[CourtKind]); 2] = [
        (
            "Torneo Apertura",
            today + Duration::days(7),
            today + Duration::days(37),
            "Primer torneo de la temporada.",
            &[CourtKind::Futbol5, CourtKind::Futbol7],
        ),
        (
            "Torneo Clausura",
            today + Duration::days(75),
            today + Duration::days(135),
            "Torneo de cierre de temporada.",
            &[CourtKind::Tenis, CourtKind::Padel],
        ),
    ];

    for (name, starts_on, ends_on, description, kinds) in season {
        if existing.iter().any(|t| t.name.eq_ignore_ascii_case(name)) {
            continue;
        }
        let tournament = tournaments::create_tournament(
            repo,
            NewTournament {
                name: name.to_string(),
                starts_on,
                ends_on,
                description: Some(description.to_string()),
            },
        )
        .await?;
        summary.tournaments += 1;
        for court in grounds.iter().filter(|c| kinds.contains(&c.kind)) {
            tournaments::link_court(repo, tournament.id, court.id).await?;
        }
    }
    Ok(())
}

/// Place random confirmed reservations across the trailing history window,
/// one hour each, on whole hours of the operating window, with a paid
/// payment per booking.
///
/// Every candidate goes through the conflict-guarded insert; a losing
/// candidate is counted as skipped and replaced by a fresh draw. Attempts
/// are bounded so a nearly-full calendar cannot stall the run.
async fn place_history(
    repo: &dyn FullRepository,
    roster: &[Client],
    grounds: &[Court],
    window: &OperatingWindow,
    today: NaiveDate,
    rng: &mut StdRng,
    summary: &mut SeedSummary,
) -> ServiceResult<()> {
    let hours = window.hourly_templates();
    if roster.is_empty() || grounds.is_empty() || hours.is_empty() {
        return Ok(());
    }
    let first_day = today - Duration::days(HISTORY_DAYS);

    let mut attempts = 0;
    let max_attempts = RESERVATION_TARGET * 20;
    while summary.reservations < RESERVATION_TARGET && attempts < max_attempts {
        attempts += 1;
        let client = &roster[rng.gen_range(0..roster.len())];
        let court = &grounds[rng.gen_range(0..grounds.len())];
        let slot = &hours[rng.gen_range(0..hours.len())];
        let date = first_day + Duration::days(rng.gen_range(0..=HISTORY_DAYS));

        let write = repo
            .store_reservation_checked(NewReservation {
                client_id: client.id,
                court_id: court.id,
                date,
                start_time: slot.start_time,
                end_time: slot.end_time,
                status: ReservationStatus::Confirmed,
            })
            .await?;

        match write {
            GuardedWrite::Committed(reservation) => {
                repo.store_payment(NewPayment {
                    reservation_id: reservation.id,
                    amount: PAYMENT_AMOUNTS[rng.gen_range(0..PAYMENT_AMOUNTS.len())],
                    status: PaymentStatus::Paid,
                    paid_on: reservation.date,
                })
                .await?;
                summary.reservations += 1;
                summary.payments += 1;
            }
            GuardedWrite::Conflict(_) => summary.skipped += 1,
        }
    }
    Ok(())
}
