//! Tournaments and their court assignments.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::TournamentId;

/// A tournament hosted at the facility. `name` is unique; courts are linked
/// through a many-to-many association.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields required to register a tournament.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTournament {
    pub name: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub description: Option<String>,
}

/// Partial tournament update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TournamentUpdate {
    pub name: Option<String>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub description: Option<String>,
}

impl NewTournament {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("tournament name must not be empty".to_string());
        }
        if self.starts_on > self.ends_on {
            return Err(format!(
                "tournament dates out of order: starts {} but ends {}",
                self.starts_on, self.ends_on
            ));
        }
        Ok(())
    }
}

impl Tournament {
    /// Current mutable fields with a partial update applied.
    pub fn merged(&self, update: &TournamentUpdate) -> NewTournament {
        NewTournament {
            name: update.name.clone().unwrap_or_else(|| self.name.clone()),
            starts_on: update.starts_on.unwrap_or(self.starts_on),
            ends_on: update.ends_on.unwrap_or(self.ends_on),
            description: update
                .description
                .clone()
                .or_else(|| self.description.clone()),
        }
    }
}
