use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;

use super::schema::{
    clients, court_slots, courts, payments, reservations, tournament_courts, tournaments,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = clients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ClientRow {
    pub client_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = clients)]
pub struct NewClientRow {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = courts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CourtRow {
    pub court_id: i64,
    pub court_name: String,
    pub court_kind: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = courts)]
pub struct NewCourtRow {
    pub court_name: String,
    pub court_kind: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = court_slots)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SlotRow {
    pub slot_id: i64,
    pub court_id: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_open: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = court_slots)]
pub struct NewSlotRow {
    pub court_id: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_open: bool,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reservations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReservationRow {
    pub reservation_id: i64,
    pub client_id: i64,
    pub court_id: i64,
    pub reserved_on: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reservations)]
pub struct NewReservationRow {
    pub client_id: i64,
    pub court_id: i64,
    pub reserved_on: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tournaments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TournamentRow {
    pub tournament_id: i64,
    pub tournament_name: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tournaments)]
pub struct NewTournamentRow {
    pub tournament_name: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tournament_courts)]
pub struct NewTournamentCourtRow {
    pub tournament_id: i64,
    pub court_id: i64,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PaymentRow {
    pub payment_id: i64,
    pub reservation_id: i64,
    pub amount: f64,
    pub status: String,
    pub paid_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub struct NewPaymentRow {
    pub reservation_id: i64,
    pub amount: f64,
    pub status: String,
    pub paid_on: NaiveDate,
}
