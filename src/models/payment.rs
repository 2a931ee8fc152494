//! Payment records attached to reservations.
//!
//! These are bookkeeping rows only; charging a card or talking to a payment
//! gateway is out of scope.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{PaymentId, ReservationId};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            "refunded" => Ok(PaymentStatus::Refunded),
            other => Err(format!(
                "unknown payment status '{other}' (expected pending, paid or refunded)"
            )),
        }
    }
}

/// A recorded payment for one reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub reservation_id: ReservationId,
    pub amount: f64,
    pub status: PaymentStatus,
    pub paid_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Payment fields without identity, used on creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewPayment {
    pub reservation_id: ReservationId,
    pub amount: f64,
    pub status: PaymentStatus,
    pub paid_on: NaiveDate,
}

impl NewPayment {
    pub fn validate(&self) -> Result<(), String> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err("payment amount must be a positive number".to_string());
        }
        Ok(())
    }
}

/// Listing filters; bounds are inclusive, `year` matches the paid-on year.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PaymentFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub year: Option<i32>,
}

impl PaymentFilter {
    pub fn matches(&self, payment: &Payment) -> bool {
        use chrono::Datelike;
        self.from.map_or(true, |d| payment.paid_on >= d)
            && self.to.map_or(true, |d| payment.paid_on <= d)
            && self.year.map_or(true, |y| payment.paid_on.year() == y)
    }
}
