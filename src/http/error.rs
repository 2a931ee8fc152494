//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::booking::BookingError;
use crate::db::repository::RepositoryError;
use crate::services::ServiceError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request (validation error)
    BadRequest(String),
    /// The booking checker rejected the candidate interval
    Booking(BookingError),
    /// A uniqueness, reference, or lifecycle rule was violated
    Conflict(String),
    /// Internal server error
    Internal(String),
    /// Repository error
    Repository(RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Booking(err) => booking_response(err),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ApiError::new("CONFLICT", msg)),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Repository(e) => repository_response(e),
        };

        (status, Json(error)).into_response()
    }
}

/// Booking rejections are client-input errors: malformed or past-dated
/// intervals map to 400, an occupied interval maps to 409 with the colliding
/// reservation in the details.
fn booking_response(err: BookingError) -> (StatusCode, ApiError) {
    match &err {
        BookingError::InvalidInterval { .. } => (
            StatusCode::BAD_REQUEST,
            ApiError::new("INVALID_INTERVAL", err.to_string()),
        ),
        BookingError::PastScheduling { .. } => (
            StatusCode::BAD_REQUEST,
            ApiError::new("PAST_SCHEDULING", err.to_string()),
        ),
        BookingError::Conflict(info) => (
            StatusCode::CONFLICT,
            ApiError::new(
                "BOOKING_CONFLICT",
                "court already booked for an overlapping interval",
            )
            .with_details(format!(
                "reservation {} runs [{}, {})",
                info.reservation_id, info.start_time, info.end_time
            )),
        ),
    }
}

fn repository_response(err: RepositoryError) -> (StatusCode, ApiError) {
    let message = err.to_string();
    if err.is_not_found() {
        (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", message))
    } else if err.is_conflict() {
        (StatusCode::CONFLICT, ApiError::new("CONFLICT", message))
    } else if err.is_retryable() {
        // Transient storage trouble: the request may succeed on retry.
        (
            StatusCode::SERVICE_UNAVAILABLE,
            ApiError::new("SERVICE_UNAVAILABLE", message),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new("REPOSITORY_ERROR", message),
        )
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Booking(e) => AppError::Booking(e),
            ServiceError::Repository(e) => AppError::Repository(e),
            ServiceError::Validation(msg) => AppError::BadRequest(msg),
            ServiceError::Conflict(msg) => AppError::Conflict(msg),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::ConflictInfo;
    use crate::models::ReservationId;
    use chrono::{NaiveDate, NaiveTime};

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn booking_rejections_map_to_client_errors() {
        let invalid = BookingError::InvalidInterval {
            reason: "start must be before end".to_string(),
        };
        assert_eq!(status_of(AppError::Booking(invalid)), StatusCode::BAD_REQUEST);

        let past = BookingError::PastScheduling {
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        };
        assert_eq!(status_of(AppError::Booking(past)), StatusCode::BAD_REQUEST);

        let conflict = BookingError::Conflict(ConflictInfo {
            reservation_id: ReservationId::new(7),
            start_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
        });
        assert_eq!(status_of(AppError::Booking(conflict)), StatusCode::CONFLICT);
    }

    #[test]
    fn conflict_details_name_the_colliding_reservation() {
        let err = BookingError::Conflict(ConflictInfo {
            reservation_id: ReservationId::new(42),
            start_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(16, 30, 0).unwrap(),
        });
        let (status, body) = booking_response(err);
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.code, "BOOKING_CONFLICT");
        let details = body.details.expect("conflict carries details");
        assert!(details.contains("42"));
        assert!(details.contains("15:00"));
    }

    #[test]
    fn repository_errors_map_by_kind() {
        let not_found = RepositoryError::not_found("reservation", 9);
        assert_eq!(
            status_of(AppError::Repository(not_found)),
            StatusCode::NOT_FOUND
        );

        let conflict = RepositoryError::conflict("client", "email already registered");
        assert_eq!(
            status_of(AppError::Repository(conflict)),
            StatusCode::CONFLICT
        );

        let transient = RepositoryError::connection("pool exhausted");
        assert_eq!(
            status_of(AppError::Repository(transient)),
            StatusCode::SERVICE_UNAVAILABLE
        );

        let internal = RepositoryError::internal("row deserialization failed");
        assert_eq!(
            status_of(AppError::Repository(internal)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn service_validation_maps_to_bad_request() {
        let err = ServiceError::Validation("client 5 does not exist".to_string());
        assert_eq!(status_of(err.into()), StatusCode::BAD_REQUEST);

        let err = ServiceError::Conflict("reservation 3 is cancelled".to_string());
        assert_eq!(status_of(err.into()), StatusCode::CONFLICT);
    }
}
