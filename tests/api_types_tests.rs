//! Tests for API wire types: ID newtypes, status enums, and request/response
//! DTO serialization.

#![cfg(feature = "http-server")]

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use courtbook::http::dto::{
    CreatePaymentRequest, CreateReservationRequest, CreateSlotRequest, ReservationDto,
    UpdateReservationRequest,
};
use courtbook::http::error::ApiError;
use courtbook::models::{
    ClientId, CourtId, CourtKind, PaymentStatus, Reservation, ReservationId, ReservationStatus,
};

#[test]
fn test_id_types_display() {
    assert_eq!(format!("{}", ClientId::new(42)), "42");
    assert_eq!(format!("{}", CourtId::new(7)), "7");
    assert_eq!(format!("{}", ReservationId::new(123)), "123");
}

#[test]
fn test_id_types_value_getter() {
    assert_eq!(ClientId::new(1).value(), 1);
    assert_eq!(CourtId::new(2).value(), 2);
    assert_eq!(ReservationId::new(3).value(), 3);
}

#[test]
fn test_id_round_trips_through_i64() {
    let id = ReservationId::from(9);
    let value: i64 = id.into();
    assert_eq!(value, 9);
}

#[test]
fn test_id_serializes_as_bare_number() {
    let json = serde_json::to_string(&ClientId::new(42)).unwrap();
    assert_eq!(json, "42");
    let id: ClientId = serde_json::from_str("42").unwrap();
    assert_eq!(id, ClientId::new(42));
}

#[test]
fn test_court_kind_wire_names_are_lowercase() {
    assert_eq!(serde_json::to_string(&CourtKind::Futbol5).unwrap(), "\"futbol5\"");
    assert_eq!(serde_json::to_string(&CourtKind::Padel).unwrap(), "\"padel\"");
    let kind: CourtKind = serde_json::from_str("\"tenis\"").unwrap();
    assert_eq!(kind, CourtKind::Tenis);
}

#[test]
fn test_reservation_status_wire_names() {
    assert_eq!(
        serde_json::to_string(&ReservationStatus::Pending).unwrap(),
        "\"pending\""
    );
    assert_eq!(
        serde_json::to_string(&ReservationStatus::Confirmed).unwrap(),
        "\"confirmed\""
    );
    let status: ReservationStatus = serde_json::from_str("\"cancelled\"").unwrap();
    assert_eq!(status, ReservationStatus::Cancelled);
}

#[test]
fn test_payment_status_wire_names() {
    assert_eq!(serde_json::to_string(&PaymentStatus::Paid).unwrap(), "\"paid\"");
    let status: PaymentStatus = serde_json::from_str("\"refunded\"").unwrap();
    assert_eq!(status, PaymentStatus::Refunded);
}

#[test]
fn test_create_reservation_request_deserialization() {
    let json = r#"{
        "client_id": 3,
        "court_id": 5,
        "date": "2025-07-10",
        "start_time": "18:00:00",
        "end_time": "19:30:00"
    }"#;
    let request: CreateReservationRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.client_id, 3);
    assert_eq!(request.court_id, 5);
    assert_eq!(request.date, NaiveDate::from_ymd_opt(2025, 7, 10).unwrap());
    assert_eq!(request.start_time, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
    assert_eq!(request.end_time, NaiveTime::from_hms_opt(19, 30, 0).unwrap());
}

#[test]
fn test_update_reservation_request_omitted_fields_are_none() {
    let request: UpdateReservationRequest = serde_json::from_str("{}").unwrap();
    assert!(request.client_id.is_none());
    assert!(request.court_id.is_none());
    assert!(request.date.is_none());
    assert!(request.start_time.is_none());
    assert!(request.end_time.is_none());

    let request: UpdateReservationRequest =
        serde_json::from_str(r#"{"start_time":"19:00:00"}"#).unwrap();
    assert_eq!(
        request.start_time,
        Some(NaiveTime::from_hms_opt(19, 0, 0).unwrap())
    );
    assert!(request.end_time.is_none());
}

#[test]
fn test_create_slot_request_defaults_to_open() {
    let request: CreateSlotRequest =
        serde_json::from_str(r#"{"start_time":"14:00:00","end_time":"15:00:00"}"#).unwrap();
    assert!(request.open);
}

#[test]
fn test_create_payment_request_defaults_to_pending() {
    let request: CreatePaymentRequest = serde_json::from_str(
        r#"{"reservation_id":8,"amount":15000.0,"paid_on":"2025-07-10"}"#,
    )
    .unwrap();
    assert_eq!(request.status, PaymentStatus::Pending);
}

#[test]
fn test_reservation_dto_serialization() {
    let stamp: DateTime<Utc> = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    let reservation = Reservation {
        id: ReservationId::new(11),
        client_id: ClientId::new(3),
        court_id: CourtId::new(5),
        date: NaiveDate::from_ymd_opt(2025, 7, 10).unwrap(),
        start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
        status: ReservationStatus::Pending,
        created_at: stamp,
        updated_at: stamp,
    };

    let json = serde_json::to_string(&ReservationDto::from(reservation)).unwrap();
    assert!(json.contains("\"id\":11"));
    assert!(json.contains("\"date\":\"2025-07-10\""));
    assert!(json.contains("\"start_time\":\"18:00:00\""));
    assert!(json.contains("\"status\":\"pending\""));
}

#[test]
fn test_api_error_omits_absent_details() {
    let bare = ApiError::new("NOT_FOUND", "client 9 not found");
    let json = serde_json::to_string(&bare).unwrap();
    assert!(json.contains("\"code\":\"NOT_FOUND\""));
    assert!(!json.contains("details"));

    let detailed = ApiError::new("BOOKING_CONFLICT", "court already booked")
        .with_details("reservation 4 runs [18:00:00, 19:00:00)");
    let json = serde_json::to_string(&detailed).unwrap();
    assert!(json.contains("\"details\":\"reservation 4"));
}
