//! User DTOs
//!
//! Access-window times travel as "HH:MM" strings on the wire (seconds are
//! accepted but never produced).

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{User, UserRole};

pub(crate) fn format_time(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

pub(crate) fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| format!("Invalid time '{}', expected HH:MM", s))
}

pub(crate) fn parse_time_opt(s: &Option<String>) -> Result<Option<NaiveTime>, String> {
    match s.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => parse_time(s).map(Some),
    }
}

/// User API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub role: String,
    /// Start of the permitted window, "HH:MM", local to the configured zone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_start: Option<String>,
    /// End of the permitted window, "HH:MM" (inclusive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            role: u.role.as_str().to_string(),
            access_start: u.access_start.map(format_time),
            access_end: u.access_end.map(format_time),
            profile_image: u.profile_image,
            created_at: u.created_at,
            updated_at: u.updated_at,
            last_login_at: u.last_login_at,
        }
    }
}

/// Create user request
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[serde(default = "default_role")]
    pub role: String,
    /// "HH:MM"; both bounds must be present for the window to apply
    pub access_start: Option<String>,
    /// "HH:MM"
    pub access_end: Option<String>,
}

fn default_role() -> String {
    "user".to_string()
}

/// Update user request. Role and window are overwritten as a whole;
/// omitting a bound clears it.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub role: String,
    pub access_start: Option<String>,
    pub access_end: Option<String>,
}

/// Admin password reset
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
    pub confirm_password: String,
}

/// Strict on purpose: a typoed role must not quietly create a non-admin.
pub(crate) fn parse_role(s: &str) -> Result<UserRole, String> {
    match s {
        "admin" => Ok(UserRole::Admin),
        "user" => Ok(UserRole::User),
        _ => Err(format!("Unknown role '{}', expected 'admin' or 'user'", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_parsing_accepts_both_forms() {
        assert_eq!(
            parse_time("08:30").unwrap(),
            NaiveTime::from_hms_opt(8, 30, 0).unwrap()
        );
        assert_eq!(
            parse_time("08:30:15").unwrap(),
            NaiveTime::from_hms_opt(8, 30, 15).unwrap()
        );
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("morning").is_err());
    }

    #[test]
    fn unknown_roles_are_rejected_not_coerced() {
        assert_eq!(parse_role("admin").unwrap(), UserRole::Admin);
        assert_eq!(parse_role("user").unwrap(), UserRole::User);
        assert!(parse_role("admim").is_err());
        assert!(parse_role("").is_err());
    }

    #[test]
    fn empty_string_clears_a_bound() {
        assert_eq!(parse_time_opt(&Some(String::new())).unwrap(), None);
        assert_eq!(parse_time_opt(&None).unwrap(), None);
        assert!(parse_time_opt(&Some("09:00".into())).unwrap().is_some());
    }
}
