//! # Courtbook
//!
//! Booking backend for a multi-court sports facility.
//!
//! This crate manages clients, courts and their operating slots,
//! reservations, tournaments, and payments, and exposes a REST API via Axum
//! for the facility frontend. Its core is the availability checker: every
//! reservation write is admitted or rejected against the active bookings of
//! the same court and date before it is stored.
//!
//! ## Booking rules
//!
//! - **Half-open intervals**: a reservation occupies `[start_time,
//!   end_time)`, so back-to-back bookings on the same court never collide
//! - **Temporal validity**: intervals must be well-formed, must not start in
//!   the past, and must meet the configured minimum duration
//! - **Conflict safety**: the overlap scan and the row write happen in one
//!   atomic unit per backend, so two racing requests for the same interval
//!   cannot both commit
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`booking`]: Interval model, temporal-validity rules, and the overlap
//!   decision procedure
//! - [`models`]: Domain entities and their field validation
//! - [`db`]: Repository pattern with in-memory and PostgreSQL backends
//! - [`services`]: Business logic orchestrating the repository and checker
//! - [`http`]: Axum-based HTTP server and request handlers
//!

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod booking;

pub mod db;
pub mod models;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
