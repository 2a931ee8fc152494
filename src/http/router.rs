//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Client CRUD
        .route("/clients", get(handlers::list_clients))
        .route("/clients", post(handlers::create_client))
        .route("/clients/{id}", get(handlers::get_client))
        .route("/clients/{id}", put(handlers::update_client))
        .route("/clients/{id}", delete(handlers::delete_client))
        // Court CRUD and operating slots
        .route("/courts", get(handlers::list_courts))
        .route("/courts", post(handlers::create_court))
        .route("/courts/{id}", get(handlers::get_court))
        .route("/courts/{id}", put(handlers::update_court))
        .route("/courts/{id}", delete(handlers::delete_court))
        .route("/courts/{id}/slots", get(handlers::list_court_slots))
        .route("/courts/{id}/slots", post(handlers::add_court_slot))
        .route("/slots/{id}", put(handlers::update_slot))
        .route("/slots/{id}", delete(handlers::delete_slot))
        // Availability probe
        .route("/courts/{id}/availability", get(handlers::check_availability))
        // Reservation booking and lifecycle
        .route("/reservations", get(handlers::list_reservations))
        .route("/reservations", post(handlers::create_reservation))
        .route("/reservations/{id}", get(handlers::get_reservation))
        .route("/reservations/{id}", put(handlers::update_reservation))
        .route("/reservations/{id}", delete(handlers::delete_reservation))
        .route("/reservations/{id}/confirm", post(handlers::confirm_reservation))
        .route("/reservations/{id}/cancel", post(handlers::cancel_reservation))
        // Tournaments and court assignments
        .route("/tournaments", get(handlers::list_tournaments))
        .route("/tournaments", post(handlers::create_tournament))
        .route("/tournaments/{id}", get(handlers::get_tournament))
        .route("/tournaments/{id}", put(handlers::update_tournament))
        .route("/tournaments/{id}", delete(handlers::delete_tournament))
        .route("/tournaments/{id}/courts", get(handlers::list_tournament_courts))
        .route("/tournaments/{id}/courts/{court_id}", post(handlers::link_tournament_court))
        .route("/tournaments/{id}/courts/{court_id}", delete(handlers::unlink_tournament_court))
        // Payments
        .route("/payments", get(handlers::list_payments))
        .route("/payments", post(handlers::create_payment))
        .route("/payments/{id}", get(handlers::get_payment))
        // Reports
        .route("/reports/usage", get(handlers::usage_report));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        // Booking payloads are small JSON bodies.
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo =
            Arc::new(LocalRepository::new()) as Arc<dyn crate::db::repository::FullRepository>;
        let state = AppState::new(repo);
        let _router = create_router(state);
        // If we got here, router was created successfully
    }
}
