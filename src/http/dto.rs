//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.
//! Report types are re-exported from the services module since they already
//! derive Serialize/Deserialize.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    Client, ClientId, ClientUpdate, Court, CourtId, CourtKind, CourtUpdate, NewClient, NewCourt,
    NewPayment, NewTournament, Payment, PaymentFilter, PaymentStatus, Reservation,
    ReservationFilter, ReservationId, ReservationStatus, SlotTemplate, SlotUpdate, TimeSlot,
    Tournament, TournamentUpdate,
};
use crate::services::reservations::{ReservationDraft, ReservationPatch};

// Re-export report types that are already serializable
pub use crate::services::{ClientActivity, CourtUsage, DailyCourtUsage, MonthlyUsage, UsageReport};

fn default_true() -> bool {
    true
}

fn default_payment_status() -> PaymentStatus {
    PaymentStatus::Pending
}

// =============================================================================
// Clients
// =============================================================================

/// Client record for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientDto {
    /// Client ID
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Client> for ClientDto {
    fn from(client: Client) -> Self {
        Self {
            id: client.id.value(),
            first_name: client.first_name,
            last_name: client.last_name,
            phone: client.phone,
            email: client.email,
            created_at: client.created_at,
            updated_at: client.updated_at,
        }
    }
}

/// Request body for registering a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClientRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
}

impl From<CreateClientRequest> for NewClient {
    fn from(req: CreateClientRequest) -> Self {
        NewClient {
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
            email: req.email,
        }
    }
}

/// Request body for updating a client; omitted fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateClientRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<UpdateClientRequest> for ClientUpdate {
    fn from(req: UpdateClientRequest) -> Self {
        ClientUpdate {
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
            email: req.email,
        }
    }
}

/// Client list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientListResponse {
    pub clients: Vec<ClientDto>,
    /// Total count
    pub total: usize,
}

// =============================================================================
// Courts and slots
// =============================================================================

/// Court record for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtDto {
    /// Court ID
    pub id: i64,
    pub name: String,
    /// Sport discipline (futbol5, futbol7, tenis, padel, voley, basquet)
    pub kind: CourtKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Court> for CourtDto {
    fn from(court: Court) -> Self {
        Self {
            id: court.id.value(),
            name: court.name,
            kind: court.kind,
            created_at: court.created_at,
            updated_at: court.updated_at,
        }
    }
}

/// Request body for registering a court. Operating slots are generated
/// automatically across the facility's operating window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourtRequest {
    pub name: String,
    pub kind: CourtKind,
}

impl From<CreateCourtRequest> for NewCourt {
    fn from(req: CreateCourtRequest) -> Self {
        NewCourt {
            name: req.name,
            kind: req.kind,
        }
    }
}

/// Request body for updating a court; omitted fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCourtRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: Option<CourtKind>,
}

impl From<UpdateCourtRequest> for CourtUpdate {
    fn from(req: UpdateCourtRequest) -> Self {
        CourtUpdate {
            name: req.name,
            kind: req.kind,
        }
    }
}

/// Court list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtListResponse {
    pub courts: Vec<CourtDto>,
    /// Total count
    pub total: usize,
}

/// Operating slot record for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotDto {
    /// Slot ID
    pub id: i64,
    /// Owning court ID
    pub court_id: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Whether the slot is currently bookable
    pub open: bool,
    pub created_at: DateTime<Utc>,
}

impl From<TimeSlot> for SlotDto {
    fn from(slot: TimeSlot) -> Self {
        Self {
            id: slot.id.value(),
            court_id: slot.court_id.value(),
            start_time: slot.start_time,
            end_time: slot.end_time,
            open: slot.open,
            created_at: slot.created_at,
        }
    }
}

/// Request body for adding an operating slot to a court.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSlotRequest {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Whether the slot starts out bookable (default: true)
    #[serde(default = "default_true")]
    pub open: bool,
}

impl From<CreateSlotRequest> for SlotTemplate {
    fn from(req: CreateSlotRequest) -> Self {
        SlotTemplate {
            start_time: req.start_time,
            end_time: req.end_time,
            open: req.open,
        }
    }
}

/// Request body for updating a slot; omitted fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSlotRequest {
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub open: Option<bool>,
}

impl From<UpdateSlotRequest> for SlotUpdate {
    fn from(req: UpdateSlotRequest) -> Self {
        SlotUpdate {
            start_time: req.start_time,
            end_time: req.end_time,
            open: req.open,
        }
    }
}

/// Slot list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotListResponse {
    pub slots: Vec<SlotDto>,
    /// Total count
    pub total: usize,
}

// =============================================================================
// Reservations
// =============================================================================

/// Reservation record for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationDto {
    /// Reservation ID
    pub id: i64,
    /// Booking client ID
    pub client_id: i64,
    /// Booked court ID
    pub court_id: i64,
    /// Calendar date of the booking
    pub date: NaiveDate,
    /// Start of the half-open interval
    pub start_time: NaiveTime,
    /// End of the half-open interval (exclusive)
    pub end_time: NaiveTime,
    /// Lifecycle status (pending, confirmed, cancelled)
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationDto {
    fn from(reservation: Reservation) -> Self {
        Self {
            id: reservation.id.value(),
            client_id: reservation.client_id.value(),
            court_id: reservation.court_id.value(),
            date: reservation.date,
            start_time: reservation.start_time,
            end_time: reservation.end_time,
            status: reservation.status,
            created_at: reservation.created_at,
            updated_at: reservation.updated_at,
        }
    }
}

/// Request body for booking a court interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservationRequest {
    pub client_id: i64,
    pub court_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl From<CreateReservationRequest> for ReservationDraft {
    fn from(req: CreateReservationRequest) -> Self {
        ReservationDraft {
            client_id: ClientId::new(req.client_id),
            court_id: CourtId::new(req.court_id),
            date: req.date,
            start_time: req.start_time,
            end_time: req.end_time,
        }
    }
}

/// Request body for rescheduling a reservation; omitted fields keep their
/// value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateReservationRequest {
    #[serde(default)]
    pub client_id: Option<i64>,
    #[serde(default)]
    pub court_id: Option<i64>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
}

impl From<UpdateReservationRequest> for ReservationPatch {
    fn from(req: UpdateReservationRequest) -> Self {
        ReservationPatch {
            client_id: req.client_id.map(ClientId::new),
            court_id: req.court_id.map(CourtId::new),
            date: req.date,
            start_time: req.start_time,
            end_time: req.end_time,
        }
    }
}

/// Query parameters for listing reservations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReservationQuery {
    /// Filter by court
    #[serde(default)]
    pub court_id: Option<i64>,
    /// Filter by client
    #[serde(default)]
    pub client_id: Option<i64>,
    /// Filter by calendar date
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Filter by lifecycle status
    #[serde(default)]
    pub status: Option<ReservationStatus>,
}

impl From<ReservationQuery> for ReservationFilter {
    fn from(query: ReservationQuery) -> Self {
        ReservationFilter {
            court_id: query.court_id.map(CourtId::new),
            client_id: query.client_id.map(ClientId::new),
            date: query.date,
            status: query.status,
        }
    }
}

/// Reservation list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationListResponse {
    pub reservations: Vec<ReservationDto>,
    /// Total count
    pub total: usize,
}

/// Query parameters for the availability probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    /// Calendar date under test
    pub date: NaiveDate,
    /// Start of the candidate interval
    pub start: NaiveTime,
    /// End of the candidate interval (exclusive)
    pub end: NaiveTime,
}

/// Availability probe response.
///
/// The answer is advisory: the conflict-guarded write re-checks the interval
/// when the booking is actually placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub court_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Whether no active reservation overlaps the candidate interval
    pub available: bool,
}

// =============================================================================
// Tournaments
// =============================================================================

/// Tournament record for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentDto {
    /// Tournament ID
    pub id: i64,
    pub name: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Tournament> for TournamentDto {
    fn from(tournament: Tournament) -> Self {
        Self {
            id: tournament.id.value(),
            name: tournament.name,
            starts_on: tournament.starts_on,
            ends_on: tournament.ends_on,
            description: tournament.description,
            created_at: tournament.created_at,
        }
    }
}

/// Request body for registering a tournament.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTournamentRequest {
    pub name: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<CreateTournamentRequest> for NewTournament {
    fn from(req: CreateTournamentRequest) -> Self {
        NewTournament {
            name: req.name,
            starts_on: req.starts_on,
            ends_on: req.ends_on,
            description: req.description,
        }
    }
}

/// Request body for updating a tournament; omitted fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTournamentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub starts_on: Option<NaiveDate>,
    #[serde(default)]
    pub ends_on: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<UpdateTournamentRequest> for TournamentUpdate {
    fn from(req: UpdateTournamentRequest) -> Self {
        TournamentUpdate {
            name: req.name,
            starts_on: req.starts_on,
            ends_on: req.ends_on,
            description: req.description,
        }
    }
}

/// Tournament list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentListResponse {
    pub tournaments: Vec<TournamentDto>,
    /// Total count
    pub total: usize,
}

// =============================================================================
// Payments
// =============================================================================

/// Payment record for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentDto {
    /// Payment ID
    pub id: i64,
    /// Reservation the payment settles
    pub reservation_id: i64,
    pub amount: f64,
    /// Settlement status (pending, paid, refunded)
    pub status: PaymentStatus,
    pub paid_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentDto {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id.value(),
            reservation_id: payment.reservation_id.value(),
            amount: payment.amount,
            status: payment.status,
            paid_on: payment.paid_on,
            created_at: payment.created_at,
        }
    }
}

/// Request body for recording a payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    pub reservation_id: i64,
    pub amount: f64,
    /// Settlement status (default: pending)
    #[serde(default = "default_payment_status")]
    pub status: PaymentStatus,
    pub paid_on: NaiveDate,
}

impl From<CreatePaymentRequest> for NewPayment {
    fn from(req: CreatePaymentRequest) -> Self {
        NewPayment {
            reservation_id: ReservationId::new(req.reservation_id),
            amount: req.amount,
            status: req.status,
            paid_on: req.paid_on,
        }
    }
}

/// Query parameters for listing payments.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PaymentQuery {
    /// Earliest paid-on date (inclusive)
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Latest paid-on date (inclusive)
    #[serde(default)]
    pub to: Option<NaiveDate>,
    /// Calendar year shortcut
    #[serde(default)]
    pub year: Option<i32>,
}

impl From<PaymentQuery> for PaymentFilter {
    fn from(query: PaymentQuery) -> Self {
        PaymentFilter {
            from: query.from,
            to: query.to,
            year: query.year,
        }
    }
}

/// Payment list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentListResponse {
    pub payments: Vec<PaymentDto>,
    /// Total count
    pub total: usize,
}

// =============================================================================
// Health
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connection status
    pub database: String,
}
