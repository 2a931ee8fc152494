//! Courts and their sport discipline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::CourtId;

/// Sport discipline a court is built for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourtKind {
    Futbol5,
    Futbol7,
    Tenis,
    Padel,
    Voley,
    Basquet,
}

impl CourtKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourtKind::Futbol5 => "futbol5",
            CourtKind::Futbol7 => "futbol7",
            CourtKind::Tenis => "tenis",
            CourtKind::Padel => "padel",
            CourtKind::Voley => "voley",
            CourtKind::Basquet => "basquet",
        }
    }

    pub fn all() -> [CourtKind; 6] {
        [
            CourtKind::Futbol5,
            CourtKind::Futbol7,
            CourtKind::Tenis,
            CourtKind::Padel,
            CourtKind::Voley,
            CourtKind::Basquet,
        ]
    }
}

impl fmt::Display for CourtKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CourtKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "futbol5" | "f5" => Ok(CourtKind::Futbol5),
            "futbol7" | "f7" => Ok(CourtKind::Futbol7),
            "tenis" => Ok(CourtKind::Tenis),
            "padel" => Ok(CourtKind::Padel),
            "voley" => Ok(CourtKind::Voley),
            "basquet" => Ok(CourtKind::Basquet),
            other => Err(format!(
                "unknown court kind '{other}' (expected futbol5, futbol7, tenis, padel, voley or basquet)"
            )),
        }
    }
}

/// A bookable court. `name` is unique across the facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Court {
    pub id: CourtId,
    pub name: String,
    pub kind: CourtKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to register a court.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCourt {
    pub name: String,
    pub kind: CourtKind,
}

/// Partial court update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourtUpdate {
    pub name: Option<String>,
    pub kind: Option<CourtKind>,
}

impl NewCourt {
    pub fn validate(&self) -> Result<(), String> {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            return Err("court name must not be empty".to_string());
        }
        if trimmed.len() > 80 {
            return Err("court name must be at most 80 characters".to_string());
        }
        Ok(())
    }
}

impl Court {
    /// Current mutable fields with a partial update applied.
    pub fn merged(&self, update: &CourtUpdate) -> NewCourt {
        NewCourt {
            name: update.name.clone().unwrap_or_else(|| self.name.clone()),
            kind: update.kind.unwrap_or(self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_str() {
        for kind in CourtKind::all() {
            assert_eq!(kind.as_str().parse::<CourtKind>().unwrap(), kind);
        }
    }

    #[test]
    fn kind_accepts_short_aliases() {
        assert_eq!("F5".parse::<CourtKind>().unwrap(), CourtKind::Futbol5);
        assert_eq!("f7".parse::<CourtKind>().unwrap(), CourtKind::Futbol7);
        assert!("cricket".parse::<CourtKind>().is_err());
    }

    #[test]
    fn court_name_is_validated() {
        let court = NewCourt {
            name: "  ".to_string(),
            kind: CourtKind::Padel,
        };
        assert!(court.validate().is_err());

        let court = NewCourt {
            name: "Padel Central".to_string(),
            kind: CourtKind::Padel,
        };
        assert!(court.validate().is_ok());
    }
}
