//! Domain model types for the booking system.
//!
//! Plain data structures shared by the repository, service, and HTTP layers.
//! Field-shape validation lives next to the types; temporal and overlap rules
//! live in [`crate::booking`] and are never run from model construction.

pub mod client;
pub mod court;
pub mod payment;
pub mod reservation;
pub mod slot;
pub mod tournament;

pub use client::{Client, ClientUpdate, NewClient};
pub use court::{Court, CourtKind, CourtUpdate, NewCourt};
pub use payment::{NewPayment, Payment, PaymentFilter, PaymentStatus};
pub use reservation::{
    NewReservation, Reservation, ReservationFilter, ReservationStatus, ReservationUpdate,
};
pub use slot::{SlotTemplate, SlotUpdate, TimeSlot};
pub use tournament::{NewTournament, Tournament, TournamentUpdate};

use serde::{Deserialize, Serialize};

/// Client identifier (database primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClientId(pub i64);

/// Court identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CourtId(pub i64);

/// Court time-slot identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotId(pub i64);

/// Reservation identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReservationId(pub i64);

/// Tournament identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TournamentId(pub i64);

/// Payment identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PaymentId(pub i64);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            pub fn new(value: i64) -> Self {
                $name(value)
            }

            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                $name(value)
            }
        }
    };
}

impl_id!(ClientId);
impl_id!(CourtId);
impl_id!(SlotId);
impl_id!(ReservationId);
impl_id!(TournamentId);
impl_id!(PaymentId);
