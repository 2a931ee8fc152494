//! In-memory repository implementation.
//!
//! Backs tests and local development. All state lives in a single
//! [`parking_lot::RwLock`]; conflict-guarded reservation writes hold the
//! write lock across the overlap scan and the insert, which gives the
//! at-most-one-winner guarantee within the process.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};

use crate::booking::{self, ConflictInfo, TimeRange};
use crate::db::repository::{
    ClientRepository, CourtRepository, GuardedWrite, PaymentRepository, ReportingRepository,
    RepositoryError, RepositoryResult, ReservationFact, ReservationRepository, SystemRepository,
    TournamentRepository,
};
use crate::models::{
    Client, ClientId, Court, CourtId, NewClient, NewCourt, NewPayment, NewReservation,
    NewTournament, Payment, PaymentFilter, PaymentId, Reservation, ReservationFilter,
    ReservationId, ReservationStatus, ReservationUpdate, SlotId, SlotTemplate, TimeSlot,
    Tournament, TournamentId, TournamentUpdate,
};

#[derive(Default)]
struct Sequences {
    clients: i64,
    courts: i64,
    slots: i64,
    reservations: i64,
    tournaments: i64,
    payments: i64,
}

fn bump(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

#[derive(Default)]
struct Store {
    clients: BTreeMap<i64, Client>,
    courts: BTreeMap<i64, Court>,
    slots: BTreeMap<i64, TimeSlot>,
    reservations: BTreeMap<i64, Reservation>,
    tournaments: BTreeMap<i64, Tournament>,
    tournament_courts: BTreeSet<(i64, i64)>,
    payments: BTreeMap<i64, Payment>,
    sequences: Sequences,
}

impl Store {
    fn court_day(&self, court_id: CourtId, date: NaiveDate) -> Vec<Reservation> {
        let mut rows: Vec<Reservation> = self
            .reservations
            .values()
            .filter(|r| r.court_id == court_id && r.date == date)
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.start_time, r.id.value()));
        rows
    }

    fn email_taken(&self, email: &str, exclude: Option<ClientId>) -> bool {
        self.clients.values().any(|c| {
            Some(c.id) != exclude && c.email.eq_ignore_ascii_case(email)
        })
    }

    fn court_name_taken(&self, name: &str, exclude: Option<CourtId>) -> bool {
        self.courts.values().any(|c| {
            Some(c.id) != exclude && c.name.eq_ignore_ascii_case(name)
        })
    }

    fn tournament_name_taken(&self, name: &str, exclude: Option<TournamentId>) -> bool {
        self.tournaments.values().any(|t| {
            Some(t.id) != exclude && t.name.eq_ignore_ascii_case(name)
        })
    }
}

/// In-memory implementation of the full repository surface.
pub struct LocalRepository {
    store: RwLock<Store>,
}

impl LocalRepository {
    pub fn new() -> Self {
        LocalRepository {
            store: RwLock::new(Store::default()),
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Interval sanity re-check at the storage boundary. The service layer has
/// already validated; a malformed pair reaching this point is a caller bug.
fn stored_range(start: chrono::NaiveTime, end: chrono::NaiveTime) -> RepositoryResult<TimeRange> {
    TimeRange::new(start, end)
        .map_err(|e| RepositoryError::validation(e.to_string()))
}

#[async_trait]
impl ClientRepository for LocalRepository {
    async fn store_client(&self, new: NewClient) -> RepositoryResult<Client> {
        let mut store = self.store.write();
        if store.email_taken(&new.email, None) {
            return Err(RepositoryError::conflict(
                "client",
                format!("email {} already registered", new.email),
            )
            .with_operation("store_client"));
        }
        let now = Utc::now();
        let id = bump(&mut store.sequences.clients);
        let client = Client {
            id: ClientId(id),
            first_name: new.first_name,
            last_name: new.last_name,
            phone: new.phone,
            email: new.email,
            created_at: now,
            updated_at: now,
        };
        store.clients.insert(id, client.clone());
        Ok(client)
    }

    async fn fetch_client(&self, id: ClientId) -> RepositoryResult<Client> {
        self.store
            .read()
            .clients
            .get(&id.value())
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("client", id).with_operation("fetch_client"))
    }

    async fn fetch_clients(&self) -> RepositoryResult<Vec<Client>> {
        Ok(self.store.read().clients.values().cloned().collect())
    }

    async fn update_client(&self, id: ClientId, fields: NewClient) -> RepositoryResult<Client> {
        let mut store = self.store.write();
        if store.email_taken(&fields.email, Some(id)) {
            return Err(RepositoryError::conflict(
                "client",
                format!("email {} already registered", fields.email),
            )
            .with_operation("update_client"));
        }
        let client = store.clients.get_mut(&id.value()).ok_or_else(|| {
            RepositoryError::not_found("client", id).with_operation("update_client")
        })?;
        client.first_name = fields.first_name;
        client.last_name = fields.last_name;
        client.phone = fields.phone;
        client.email = fields.email;
        client.updated_at = Utc::now();
        Ok(client.clone())
    }

    async fn delete_client(&self, id: ClientId) -> RepositoryResult<()> {
        let mut store = self.store.write();
        if !store.clients.contains_key(&id.value()) {
            return Err(RepositoryError::not_found("client", id).with_operation("delete_client"));
        }
        if store.reservations.values().any(|r| r.client_id == id) {
            return Err(RepositoryError::conflict(
                "client",
                format!("client {id} still has reservations"),
            )
            .with_operation("delete_client"));
        }
        store.clients.remove(&id.value());
        Ok(())
    }
}

#[async_trait]
impl CourtRepository for LocalRepository {
    async fn store_court(
        &self,
        new: NewCourt,
        slots: Vec<SlotTemplate>,
    ) -> RepositoryResult<Court> {
        let mut store = self.store.write();
        if store.court_name_taken(&new.name, None) {
            return Err(RepositoryError::conflict(
                "court",
                format!("court name '{}' already in use", new.name),
            )
            .with_operation("store_court"));
        }
        let now = Utc::now();
        let id = bump(&mut store.sequences.courts);
        let court = Court {
            id: CourtId(id),
            name: new.name,
            kind: new.kind,
            created_at: now,
            updated_at: now,
        };
        store.courts.insert(id, court.clone());
        for template in slots {
            let slot_id = bump(&mut store.sequences.slots);
            store.slots.insert(
                slot_id,
                TimeSlot {
                    id: SlotId(slot_id),
                    court_id: court.id,
                    start_time: template.start_time,
                    end_time: template.end_time,
                    open: template.open,
                    created_at: now,
                },
            );
        }
        Ok(court)
    }

    async fn fetch_court(&self, id: CourtId) -> RepositoryResult<Court> {
        self.store
            .read()
            .courts
            .get(&id.value())
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("court", id).with_operation("fetch_court"))
    }

    async fn fetch_courts(&self) -> RepositoryResult<Vec<Court>> {
        let mut courts: Vec<Court> = self.store.read().courts.values().cloned().collect();
        courts.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(courts)
    }

    async fn update_court(&self, id: CourtId, fields: NewCourt) -> RepositoryResult<Court> {
        let mut store = self.store.write();
        if store.court_name_taken(&fields.name, Some(id)) {
            return Err(RepositoryError::conflict(
                "court",
                format!("court name '{}' already in use", fields.name),
            )
            .with_operation("update_court"));
        }
        let court = store.courts.get_mut(&id.value()).ok_or_else(|| {
            RepositoryError::not_found("court", id).with_operation("update_court")
        })?;
        court.name = fields.name;
        court.kind = fields.kind;
        court.updated_at = Utc::now();
        Ok(court.clone())
    }

    async fn delete_court(&self, id: CourtId) -> RepositoryResult<()> {
        let mut store = self.store.write();
        if !store.courts.contains_key(&id.value()) {
            return Err(RepositoryError::not_found("court", id).with_operation("delete_court"));
        }
        if store.reservations.values().any(|r| r.court_id == id) {
            return Err(RepositoryError::conflict(
                "court",
                format!("court {id} still has reservations"),
            )
            .with_operation("delete_court"));
        }
        store.slots.retain(|_, slot| slot.court_id != id);
        store
            .tournament_courts
            .retain(|(_, court)| *court != id.value());
        store.courts.remove(&id.value());
        Ok(())
    }

    async fn fetch_slots(&self, court_id: CourtId) -> RepositoryResult<Vec<TimeSlot>> {
        let store = self.store.read();
        if !store.courts.contains_key(&court_id.value()) {
            return Err(
                RepositoryError::not_found("court", court_id).with_operation("fetch_slots")
            );
        }
        let mut slots: Vec<TimeSlot> = store
            .slots
            .values()
            .filter(|slot| slot.court_id == court_id)
            .cloned()
            .collect();
        slots.sort_by_key(|slot| (slot.start_time, slot.id.value()));
        Ok(slots)
    }

    async fn fetch_slot(&self, id: SlotId) -> RepositoryResult<TimeSlot> {
        self.store
            .read()
            .slots
            .get(&id.value())
            .cloned()
            .ok_or_else(|| RepositoryError::not_found("slot", id).with_operation("fetch_slot"))
    }

    async fn store_slot(
        &self,
        court_id: CourtId,
        slot: SlotTemplate,
    ) -> RepositoryResult<TimeSlot> {
        let mut store = self.store.write();
        if !store.courts.contains_key(&court_id.value()) {
            return Err(
                RepositoryError::not_found("court", court_id).with_operation("store_slot")
            );
        }
        let id = bump(&mut store.sequences.slots);
        let stored = TimeSlot {
            id: SlotId(id),
            court_id,
            start_time: slot.start_time,
            end_time: slot.end_time,
            open: slot.open,
            created_at: Utc::now(),
        };
        store.slots.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_slot(&self, id: SlotId, fields: SlotTemplate) -> RepositoryResult<TimeSlot> {
        let mut store = self.store.write();
        let slot = store
            .slots
            .get_mut(&id.value())
            .ok_or_else(|| RepositoryError::not_found("slot", id).with_operation("update_slot"))?;
        slot.start_time = fields.start_time;
        slot.end_time = fields.end_time;
        slot.open = fields.open;
        Ok(slot.clone())
    }

    async fn delete_slot(&self, id: SlotId) -> RepositoryResult<()> {
        let mut store = self.store.write();
        if store.slots.remove(&id.value()).is_none() {
            return Err(RepositoryError::not_found("slot", id).with_operation("delete_slot"));
        }
        Ok(())
    }
}

#[async_trait]
impl ReservationRepository for LocalRepository {
    async fn store_reservation_checked(
        &self,
        new: NewReservation,
    ) -> RepositoryResult<GuardedWrite> {
        // Write lock held across scan and insert.
        let mut store = self.store.write();
        if !store.clients.contains_key(&new.client_id.value()) {
            return Err(RepositoryError::not_found("client", new.client_id)
                .with_operation("store_reservation"));
        }
        if !store.courts.contains_key(&new.court_id.value()) {
            return Err(RepositoryError::not_found("court", new.court_id)
                .with_operation("store_reservation"));
        }
        let range = stored_range(new.start_time, new.end_time)?;
        let existing = store.court_day(new.court_id, new.date);
        if let Some(taken) = booking::find_conflict(&range, None, &existing) {
            return Ok(GuardedWrite::Conflict(ConflictInfo::for_reservation(taken)));
        }
        let now = Utc::now();
        let id = bump(&mut store.sequences.reservations);
        let reservation = Reservation {
            id: ReservationId(id),
            client_id: new.client_id,
            court_id: new.court_id,
            date: new.date,
            start_time: new.start_time,
            end_time: new.end_time,
            status: new.status,
            created_at: now,
            updated_at: now,
        };
        store.reservations.insert(id, reservation.clone());
        Ok(GuardedWrite::Committed(reservation))
    }

    async fn reschedule_reservation_checked(
        &self,
        id: ReservationId,
        update: ReservationUpdate,
    ) -> RepositoryResult<GuardedWrite> {
        let mut store = self.store.write();
        let current = store.reservations.get(&id.value()).cloned().ok_or_else(|| {
            RepositoryError::not_found("reservation", id).with_operation("reschedule_reservation")
        })?;
        if current.status == ReservationStatus::Cancelled {
            return Err(RepositoryError::validation(format!(
                "reservation {id} is cancelled and cannot be rescheduled"
            ))
            .with_operation("reschedule_reservation"));
        }
        if !store.clients.contains_key(&update.client_id.value()) {
            return Err(RepositoryError::not_found("client", update.client_id)
                .with_operation("reschedule_reservation"));
        }
        if !store.courts.contains_key(&update.court_id.value()) {
            return Err(RepositoryError::not_found("court", update.court_id)
                .with_operation("reschedule_reservation"));
        }
        let range = stored_range(update.start_time, update.end_time)?;
        let existing = store.court_day(update.court_id, update.date);
        if let Some(taken) = booking::find_conflict(&range, Some(id), &existing) {
            return Ok(GuardedWrite::Conflict(ConflictInfo::for_reservation(taken)));
        }
        let reservation = store
            .reservations
            .get_mut(&id.value())
            .ok_or_else(|| RepositoryError::internal("reservation vanished under write lock"))?;
        reservation.client_id = update.client_id;
        reservation.court_id = update.court_id;
        reservation.date = update.date;
        reservation.start_time = update.start_time;
        reservation.end_time = update.end_time;
        reservation.updated_at = Utc::now();
        Ok(GuardedWrite::Committed(reservation.clone()))
    }

    async fn fetch_reservation(&self, id: ReservationId) -> RepositoryResult<Reservation> {
        self.store
            .read()
            .reservations
            .get(&id.value())
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found("reservation", id).with_operation("fetch_reservation")
            })
    }

    async fn fetch_reservations(
        &self,
        filter: ReservationFilter,
    ) -> RepositoryResult<Vec<Reservation>> {
        let mut rows: Vec<Reservation> = self
            .store
            .read()
            .reservations
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.date, r.start_time, r.id.value()));
        Ok(rows)
    }

    async fn fetch_for_court_date(
        &self,
        court_id: CourtId,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<Reservation>> {
        Ok(self.store.read().court_day(court_id, date))
    }

    async fn set_reservation_status(
        &self,
        id: ReservationId,
        status: ReservationStatus,
    ) -> RepositoryResult<Reservation> {
        let mut store = self.store.write();
        let reservation = store.reservations.get_mut(&id.value()).ok_or_else(|| {
            RepositoryError::not_found("reservation", id).with_operation("set_reservation_status")
        })?;
        reservation.status = status;
        reservation.updated_at = Utc::now();
        Ok(reservation.clone())
    }

    async fn delete_reservation(&self, id: ReservationId) -> RepositoryResult<()> {
        let mut store = self.store.write();
        if !store.reservations.contains_key(&id.value()) {
            return Err(
                RepositoryError::not_found("reservation", id).with_operation("delete_reservation")
            );
        }
        if store.payments.values().any(|p| p.reservation_id == id) {
            return Err(RepositoryError::conflict(
                "reservation",
                format!("reservation {id} still has payments"),
            )
            .with_operation("delete_reservation"));
        }
        store.reservations.remove(&id.value());
        Ok(())
    }
}

#[async_trait]
impl TournamentRepository for LocalRepository {
    async fn store_tournament(&self, new: NewTournament) -> RepositoryResult<Tournament> {
        let mut store = self.store.write();
        if store.tournament_name_taken(&new.name, None) {
            return Err(RepositoryError::conflict(
                "tournament",
                format!("tournament name '{}' already in use", new.name),
            )
            .with_operation("store_tournament"));
        }
        let id = bump(&mut store.sequences.tournaments);
        let tournament = Tournament {
            id: TournamentId(id),
            name: new.name,
            starts_on: new.starts_on,
            ends_on: new.ends_on,
            description: new.description,
            created_at: Utc::now(),
        };
        store.tournaments.insert(id, tournament.clone());
        Ok(tournament)
    }

    async fn fetch_tournament(&self, id: TournamentId) -> RepositoryResult<Tournament> {
        self.store
            .read()
            .tournaments
            .get(&id.value())
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found("tournament", id).with_operation("fetch_tournament")
            })
    }

    async fn fetch_tournaments(&self) -> RepositoryResult<Vec<Tournament>> {
        let mut rows: Vec<Tournament> =
            self.store.read().tournaments.values().cloned().collect();
        rows.sort_by_key(|t| (t.starts_on, t.id.value()));
        Ok(rows)
    }

    async fn update_tournament(
        &self,
        id: TournamentId,
        fields: NewTournament,
    ) -> RepositoryResult<Tournament> {
        let mut store = self.store.write();
        if store.tournament_name_taken(&fields.name, Some(id)) {
            return Err(RepositoryError::conflict(
                "tournament",
                format!("tournament name '{}' already in use", fields.name),
            )
            .with_operation("update_tournament"));
        }
        let tournament = store.tournaments.get_mut(&id.value()).ok_or_else(|| {
            RepositoryError::not_found("tournament", id).with_operation("update_tournament")
        })?;
        tournament.name = fields.name;
        tournament.starts_on = fields.starts_on;
        tournament.ends_on = fields.ends_on;
        tournament.description = fields.description;
        Ok(tournament.clone())
    }

    async fn delete_tournament(&self, id: TournamentId) -> RepositoryResult<()> {
        let mut store = self.store.write();
        if store.tournaments.remove(&id.value()).is_none() {
            return Err(
                RepositoryError::not_found("tournament", id).with_operation("delete_tournament")
            );
        }
        store
            .tournament_courts
            .retain(|(tournament, _)| *tournament != id.value());
        Ok(())
    }

    async fn link_court(
        &self,
        tournament_id: TournamentId,
        court_id: CourtId,
    ) -> RepositoryResult<()> {
        let mut store = self.store.write();
        if !store.tournaments.contains_key(&tournament_id.value()) {
            return Err(
                RepositoryError::not_found("tournament", tournament_id)
                    .with_operation("link_court"),
            );
        }
        if !store.courts.contains_key(&court_id.value()) {
            return Err(RepositoryError::not_found("court", court_id).with_operation("link_court"));
        }
        if !store
            .tournament_courts
            .insert((tournament_id.value(), court_id.value()))
        {
            return Err(RepositoryError::conflict(
                "tournament",
                format!("court {court_id} already linked to tournament {tournament_id}"),
            )
            .with_operation("link_court"));
        }
        Ok(())
    }

    async fn unlink_court(
        &self,
        tournament_id: TournamentId,
        court_id: CourtId,
    ) -> RepositoryResult<()> {
        let mut store = self.store.write();
        if !store
            .tournament_courts
            .remove(&(tournament_id.value(), court_id.value()))
        {
            return Err(RepositoryError::not_found(
                "tournament link",
                format!("{tournament_id}/{court_id}"),
            )
            .with_operation("unlink_court"));
        }
        Ok(())
    }

    async fn fetch_tournament_courts(
        &self,
        tournament_id: TournamentId,
    ) -> RepositoryResult<Vec<Court>> {
        let store = self.store.read();
        if !store.tournaments.contains_key(&tournament_id.value()) {
            return Err(RepositoryError::not_found("tournament", tournament_id)
                .with_operation("fetch_tournament_courts"));
        }
        let mut courts: Vec<Court> = store
            .tournament_courts
            .iter()
            .filter(|(tournament, _)| *tournament == tournament_id.value())
            .filter_map(|(_, court)| store.courts.get(court).cloned())
            .collect();
        courts.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(courts)
    }
}

#[async_trait]
impl PaymentRepository for LocalRepository {
    async fn store_payment(&self, new: NewPayment) -> RepositoryResult<Payment> {
        let mut store = self.store.write();
        if !store
            .reservations
            .contains_key(&new.reservation_id.value())
        {
            return Err(RepositoryError::not_found("reservation", new.reservation_id)
                .with_operation("store_payment"));
        }
        let id = bump(&mut store.sequences.payments);
        let payment = Payment {
            id: PaymentId(id),
            reservation_id: new.reservation_id,
            amount: new.amount,
            status: new.status,
            paid_on: new.paid_on,
            created_at: Utc::now(),
        };
        store.payments.insert(id, payment.clone());
        Ok(payment)
    }

    async fn fetch_payment(&self, id: PaymentId) -> RepositoryResult<Payment> {
        self.store
            .read()
            .payments
            .get(&id.value())
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found("payment", id).with_operation("fetch_payment")
            })
    }

    async fn fetch_payments(&self, filter: PaymentFilter) -> RepositoryResult<Vec<Payment>> {
        let mut rows: Vec<Payment> = self
            .store
            .read()
            .payments
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        rows.sort_by_key(|p| (p.paid_on, p.id.value()));
        Ok(rows)
    }
}

#[async_trait]
impl ReportingRepository for LocalRepository {
    async fn fetch_reservation_facts(&self) -> RepositoryResult<Vec<ReservationFact>> {
        let store = self.store.read();
        let mut facts = Vec::with_capacity(store.reservations.len());
        for reservation in store.reservations.values() {
            let court = store
                .courts
                .get(&reservation.court_id.value())
                .ok_or_else(|| {
                    RepositoryError::internal(format!(
                        "reservation {} references missing court {}",
                        reservation.id, reservation.court_id
                    ))
                    .with_operation("fetch_reservation_facts")
                })?;
            let client = store
                .clients
                .get(&reservation.client_id.value())
                .ok_or_else(|| {
                    RepositoryError::internal(format!(
                        "reservation {} references missing client {}",
                        reservation.id, reservation.client_id
                    ))
                    .with_operation("fetch_reservation_facts")
                })?;
            facts.push(ReservationFact {
                date: reservation.date,
                status: reservation.status,
                court_id: court.id,
                court_name: court.name.clone(),
                client_id: client.id,
                client_name: format!("{} {}", client.first_name, client.last_name),
                client_email: client.email.clone(),
            });
        }
        Ok(facts)
    }
}

#[async_trait]
impl SystemRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 20).unwrap()
    }

    async fn seeded() -> (LocalRepository, ClientId, CourtId) {
        let repo = LocalRepository::new();
        let client = repo
            .store_client(NewClient {
                first_name: "Marta".into(),
                last_name: "Gomez".into(),
                phone: "1144556677".into(),
                email: "marta@example.com".into(),
            })
            .await
            .unwrap();
        let court = repo
            .store_court(
                NewCourt {
                    name: "Padel 1".into(),
                    kind: crate::models::CourtKind::Padel,
                },
                vec![],
            )
            .await
            .unwrap();
        (repo, client.id, court.id)
    }

    fn booking_for(client: ClientId, court: CourtId, start: u32, end: u32) -> NewReservation {
        NewReservation {
            client_id: client,
            court_id: court,
            date: day(),
            start_time: t(start),
            end_time: t(end),
            status: ReservationStatus::Pending,
        }
    }

    #[tokio::test]
    async fn guarded_store_commits_then_conflicts() {
        let (repo, client, court) = seeded().await;
        let first = repo
            .store_reservation_checked(booking_for(client, court, 18, 19))
            .await
            .unwrap();
        let first = first.committed().expect("first booking commits");

        let second = repo
            .store_reservation_checked(booking_for(client, court, 18, 19))
            .await
            .unwrap();
        match second {
            GuardedWrite::Conflict(info) => {
                assert_eq!(info.reservation_id, first.id);
                assert_eq!(info.start_time, t(18));
            }
            GuardedWrite::Committed(_) => panic!("duplicate booking must not commit"),
        }
    }

    #[tokio::test]
    async fn reschedule_excludes_itself() {
        let (repo, client, court) = seeded().await;
        let stored = repo
            .store_reservation_checked(booking_for(client, court, 18, 19))
            .await
            .unwrap()
            .committed()
            .unwrap();

        let update = ReservationUpdate {
            client_id: client,
            court_id: court,
            date: day(),
            start_time: t(18),
            end_time: t(19),
        };
        let outcome = repo
            .reschedule_reservation_checked(stored.id, update)
            .await
            .unwrap();
        assert!(outcome.committed().is_some(), "same interval must not self-conflict");
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let (repo, _, _) = seeded().await;
        let err = repo
            .store_client(NewClient {
                first_name: "Copy".into(),
                last_name: "Cat".into(),
                phone: "1144556688".into(),
                email: "MARTA@example.com".into(),
            })
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn delete_court_with_reservations_is_blocked() {
        let (repo, client, court) = seeded().await;
        repo.store_reservation_checked(booking_for(client, court, 18, 19))
            .await
            .unwrap();
        let err = repo.delete_court(court).await.unwrap_err();
        assert!(err.is_conflict());
    }
}
