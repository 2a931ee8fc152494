//! Client records and field validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ClientId;

/// Registered facility client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to register a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClient {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
}

/// Partial client update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl NewClient {
    /// Field-shape validation. Uniqueness of the email is enforced by the
    /// repository, not here.
    pub fn validate(&self) -> Result<(), String> {
        validate_person_name("first_name", &self.first_name)?;
        validate_person_name("last_name", &self.last_name)?;
        validate_phone(&self.phone)?;
        validate_email(&self.email)?;
        Ok(())
    }

    /// Merge a partial update over these fields.
    pub fn merged(&self, update: &ClientUpdate) -> NewClient {
        NewClient {
            first_name: update.first_name.clone().unwrap_or_else(|| self.first_name.clone()),
            last_name: update.last_name.clone().unwrap_or_else(|| self.last_name.clone()),
            phone: update.phone.clone().unwrap_or_else(|| self.phone.clone()),
            email: update.email.clone().unwrap_or_else(|| self.email.clone()),
        }
    }
}

impl Client {
    /// Current mutable fields, as used when applying a partial update.
    pub fn fields(&self) -> NewClient {
        NewClient {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
        }
    }
}

pub(crate) fn validate_person_name(field: &str, value: &str) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    if trimmed.chars().any(|c| c.is_ascii_digit()) {
        return Err(format!("{field} must not contain digits"));
    }
    Ok(())
}

/// Accepts separators (`+`, `-`, spaces, parentheses); requires 8 to 15 digits.
pub(crate) fn validate_phone(value: &str) -> Result<(), String> {
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    if !(8..=15).contains(&digits) {
        return Err("phone must contain between 8 and 15 digits".to_string());
    }
    Ok(())
}

/// Minimal `user@domain.tld` shape check.
pub(crate) fn validate_email(value: &str) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.contains(char::is_whitespace) {
        return Err("email must not contain whitespace".to_string());
    }
    let mut parts = trimmed.splitn(2, '@');
    let user = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if user.is_empty() || domain.is_empty() {
        return Err("email must have the form user@domain".to_string());
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err("email domain must contain a dot".to_string());
    }
    Ok(())
}
