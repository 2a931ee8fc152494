//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! existing service layer for business logic. "Now" is read from the
//! facility's wall clock once per request and passed down, so the temporal
//! rules see one consistent instant.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Local;

use super::dto::{
    AvailabilityQuery, AvailabilityResponse, ClientDto, ClientListResponse, CourtDto,
    CourtListResponse, CreateClientRequest, CreateCourtRequest, CreatePaymentRequest,
    CreateReservationRequest, CreateSlotRequest, CreateTournamentRequest, HealthResponse,
    PaymentDto, PaymentListResponse, PaymentQuery, ReservationDto, ReservationListResponse,
    ReservationQuery, SlotDto, SlotListResponse, TournamentDto, TournamentListResponse,
    UpdateClientRequest, UpdateCourtRequest, UpdateReservationRequest, UpdateSlotRequest,
    UpdateTournamentRequest, UsageReport,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::repository::SystemRepository;
use crate::models::{ClientId, CourtId, PaymentId, ReservationId, SlotId, TournamentId};
use crate::services::{clients, courts, payments, reports, reservations, tournaments};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the database
/// is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(()) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Clients
// =============================================================================

/// GET /v1/clients
///
/// List all registered clients.
pub async fn list_clients(State(state): State<AppState>) -> HandlerResult<ClientListResponse> {
    let records = clients::list_clients(state.repository.as_ref()).await?;

    let dtos: Vec<ClientDto> = records.into_iter().map(Into::into).collect();
    let total = dtos.len();

    Ok(Json(ClientListResponse {
        clients: dtos,
        total,
    }))
}

/// POST /v1/clients
///
/// Register a new client.
pub async fn create_client(
    State(state): State<AppState>,
    Json(request): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<ClientDto>), AppError> {
    let created = clients::create_client(state.repository.as_ref(), request.into()).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// GET /v1/clients/{id}
pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<ClientDto> {
    let client = clients::get_client(state.repository.as_ref(), ClientId::new(id)).await?;
    Ok(Json(client.into()))
}

/// PUT /v1/clients/{id}
///
/// Update a client; omitted fields keep their stored value.
pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateClientRequest>,
) -> HandlerResult<ClientDto> {
    let updated =
        clients::update_client(state.repository.as_ref(), ClientId::new(id), request.into())
            .await?;
    Ok(Json(updated.into()))
}

/// DELETE /v1/clients/{id}
pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    clients::delete_client(state.repository.as_ref(), ClientId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Courts
// =============================================================================

/// GET /v1/courts
///
/// List all courts.
pub async fn list_courts(State(state): State<AppState>) -> HandlerResult<CourtListResponse> {
    let records = courts::list_courts(state.repository.as_ref()).await?;

    let dtos: Vec<CourtDto> = records.into_iter().map(Into::into).collect();
    let total = dtos.len();

    Ok(Json(CourtListResponse {
        courts: dtos,
        total,
    }))
}

/// POST /v1/courts
///
/// Register a court and auto-generate its hourly operating slots.
pub async fn create_court(
    State(state): State<AppState>,
    Json(request): Json<CreateCourtRequest>,
) -> Result<(StatusCode, Json<CourtDto>), AppError> {
    let created =
        courts::create_court(state.repository.as_ref(), request.into(), &state.window).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// GET /v1/courts/{id}
pub async fn get_court(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<CourtDto> {
    let court = courts::get_court(state.repository.as_ref(), CourtId::new(id)).await?;
    Ok(Json(court.into()))
}

/// PUT /v1/courts/{id}
pub async fn update_court(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateCourtRequest>,
) -> HandlerResult<CourtDto> {
    let updated =
        courts::update_court(state.repository.as_ref(), CourtId::new(id), request.into()).await?;
    Ok(Json(updated.into()))
}

/// DELETE /v1/courts/{id}
///
/// Remove a court and its slots. Blocked while reservations reference it.
pub async fn delete_court(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    courts::delete_court(state.repository.as_ref(), CourtId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Court slots
// =============================================================================

/// GET /v1/courts/{id}/slots
///
/// List the operating slots of a court.
pub async fn list_court_slots(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<SlotListResponse> {
    let records = courts::list_slots(state.repository.as_ref(), CourtId::new(id)).await?;

    let dtos: Vec<SlotDto> = records.into_iter().map(Into::into).collect();
    let total = dtos.len();

    Ok(Json(SlotListResponse { slots: dtos, total }))
}

/// POST /v1/courts/{id}/slots
///
/// Add one operating slot to a court. The slot must not overlap the court's
/// existing slots.
pub async fn add_court_slot(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<CreateSlotRequest>,
) -> Result<(StatusCode, Json<SlotDto>), AppError> {
    let created =
        courts::add_slot(state.repository.as_ref(), CourtId::new(id), request.into()).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// PUT /v1/slots/{id}
pub async fn update_slot(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateSlotRequest>,
) -> HandlerResult<SlotDto> {
    let updated =
        courts::update_slot(state.repository.as_ref(), SlotId::new(id), request.into()).await?;
    Ok(Json(updated.into()))
}

/// DELETE /v1/slots/{id}
pub async fn delete_slot(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    courts::delete_slot(state.repository.as_ref(), SlotId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Availability
// =============================================================================

/// GET /v1/courts/{id}/availability?date=&start=&end=
///
/// Pre-flight probe: is the half-open interval free on this court and date?
/// A malformed interval is a 400, not "unavailable".
pub async fn check_availability(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<AvailabilityQuery>,
) -> HandlerResult<AvailabilityResponse> {
    let available = reservations::check_availability(
        state.repository.as_ref(),
        CourtId::new(id),
        query.date,
        query.start,
        query.end,
        None,
    )
    .await?;

    Ok(Json(AvailabilityResponse {
        court_id: id,
        date: query.date,
        start_time: query.start,
        end_time: query.end,
        available,
    }))
}

// =============================================================================
// Reservations
// =============================================================================

/// GET /v1/reservations
///
/// List reservations, optionally filtered by court, client, date, or status.
pub async fn list_reservations(
    State(state): State<AppState>,
    Query(query): Query<ReservationQuery>,
) -> HandlerResult<ReservationListResponse> {
    let records =
        reservations::list_reservations(state.repository.as_ref(), query.into()).await?;

    let dtos: Vec<ReservationDto> = records.into_iter().map(Into::into).collect();
    let total = dtos.len();

    Ok(Json(ReservationListResponse {
        reservations: dtos,
        total,
    }))
}

/// POST /v1/reservations
///
/// Book a court interval. Runs the full admission pipeline; an occupied
/// interval is a 409 naming the colliding reservation.
pub async fn create_reservation(
    State(state): State<AppState>,
    Json(request): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ReservationDto>), AppError> {
    let now = Local::now().naive_local();
    let created = reservations::create_reservation(
        state.repository.as_ref(),
        &state.policy,
        request.into(),
        now,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// GET /v1/reservations/{id}
pub async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<ReservationDto> {
    let reservation =
        reservations::get_reservation(state.repository.as_ref(), ReservationId::new(id)).await?;
    Ok(Json(reservation.into()))
}

/// PUT /v1/reservations/{id}
///
/// Reschedule a reservation; omitted fields keep their stored value. The
/// reservation is excluded from its own overlap check.
pub async fn update_reservation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateReservationRequest>,
) -> HandlerResult<ReservationDto> {
    let now = Local::now().naive_local();
    let updated = reservations::update_reservation(
        state.repository.as_ref(),
        &state.policy,
        ReservationId::new(id),
        request.into(),
        now,
    )
    .await?;
    Ok(Json(updated.into()))
}

/// DELETE /v1/reservations/{id}
pub async fn delete_reservation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    reservations::delete_reservation(state.repository.as_ref(), ReservationId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/reservations/{id}/confirm
///
/// Confirm a pending reservation. Confirming twice is a no-op; confirming a
/// cancelled reservation is a 409.
pub async fn confirm_reservation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<ReservationDto> {
    let confirmed =
        reservations::confirm_reservation(state.repository.as_ref(), ReservationId::new(id))
            .await?;
    Ok(Json(confirmed.into()))
}

/// POST /v1/reservations/{id}/cancel
///
/// Cancel a reservation, freeing its interval immediately. Cancelling twice
/// is a no-op.
pub async fn cancel_reservation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<ReservationDto> {
    let cancelled =
        reservations::cancel_reservation(state.repository.as_ref(), ReservationId::new(id))
            .await?;
    Ok(Json(cancelled.into()))
}

// =============================================================================
// Tournaments
// =============================================================================

/// GET /v1/tournaments
///
/// List all tournaments.
pub async fn list_tournaments(
    State(state): State<AppState>,
) -> HandlerResult<TournamentListResponse> {
    let records = tournaments::list_tournaments(state.repository.as_ref()).await?;

    let dtos: Vec<TournamentDto> = records.into_iter().map(Into::into).collect();
    let total = dtos.len();

    Ok(Json(TournamentListResponse {
        tournaments: dtos,
        total,
    }))
}

/// POST /v1/tournaments
pub async fn create_tournament(
    State(state): State<AppState>,
    Json(request): Json<CreateTournamentRequest>,
) -> Result<(StatusCode, Json<TournamentDto>), AppError> {
    let created = tournaments::create_tournament(state.repository.as_ref(), request.into()).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// GET /v1/tournaments/{id}
pub async fn get_tournament(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<TournamentDto> {
    let tournament =
        tournaments::get_tournament(state.repository.as_ref(), TournamentId::new(id)).await?;
    Ok(Json(tournament.into()))
}

/// PUT /v1/tournaments/{id}
pub async fn update_tournament(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateTournamentRequest>,
) -> HandlerResult<TournamentDto> {
    let updated = tournaments::update_tournament(
        state.repository.as_ref(),
        TournamentId::new(id),
        request.into(),
    )
    .await?;
    Ok(Json(updated.into()))
}

/// DELETE /v1/tournaments/{id}
pub async fn delete_tournament(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    tournaments::delete_tournament(state.repository.as_ref(), TournamentId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/tournaments/{id}/courts/{court_id}
///
/// Assign a court to a tournament. Linking twice is a 409.
pub async fn link_tournament_court(
    State(state): State<AppState>,
    Path((id, court_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    tournaments::link_court(
        state.repository.as_ref(),
        TournamentId::new(id),
        CourtId::new(court_id),
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /v1/tournaments/{id}/courts/{court_id}
pub async fn unlink_tournament_court(
    State(state): State<AppState>,
    Path((id, court_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    tournaments::unlink_court(
        state.repository.as_ref(),
        TournamentId::new(id),
        CourtId::new(court_id),
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/tournaments/{id}/courts
///
/// List the courts assigned to a tournament.
pub async fn list_tournament_courts(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<CourtListResponse> {
    let records =
        tournaments::list_tournament_courts(state.repository.as_ref(), TournamentId::new(id))
            .await?;

    let dtos: Vec<CourtDto> = records.into_iter().map(Into::into).collect();
    let total = dtos.len();

    Ok(Json(CourtListResponse {
        courts: dtos,
        total,
    }))
}

// =============================================================================
// Payments
// =============================================================================

/// GET /v1/payments?from=&to=&year=
///
/// List payments, optionally filtered by paid-on range or calendar year.
pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<PaymentQuery>,
) -> HandlerResult<PaymentListResponse> {
    let records = payments::list_payments(state.repository.as_ref(), query.into()).await?;

    let dtos: Vec<PaymentDto> = records.into_iter().map(Into::into).collect();
    let total = dtos.len();

    Ok(Json(PaymentListResponse {
        payments: dtos,
        total,
    }))
}

/// POST /v1/payments
///
/// Record a payment against an existing reservation.
pub async fn create_payment(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<PaymentDto>), AppError> {
    let created = payments::create_payment(state.repository.as_ref(), request.into()).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// GET /v1/payments/{id}
pub async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<PaymentDto> {
    let payment = payments::get_payment(state.repository.as_ref(), PaymentId::new(id)).await?;
    Ok(Json(payment.into()))
}

// =============================================================================
// Reports
// =============================================================================

/// GET /v1/reports/usage
///
/// Court and client usage statistics: top courts, monthly totals, trailing
/// 30-day per-court daily counts, and most active clients.
pub async fn usage_report(State(state): State<AppState>) -> HandlerResult<UsageReport> {
    let today = Local::now().date_naive();
    let report = reports::usage_report(state.repository.as_ref(), today).await?;
    Ok(Json(report))
}
