//! User domain model and repository contract.

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::access::AccessWindow;
use super::error::DomainResult;
use super::PaginatedResult;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }

}

impl Default for UserRole {
    fn default() -> Self {
        Self::User
    }
}

/// Domain user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
    pub access_start: Option<NaiveTime>,
    pub access_end: Option<NaiveTime>,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// The configured window, if and only if both bounds are set.
    pub fn access_window(&self) -> Option<AccessWindow> {
        match (self.access_start, self.access_end) {
            (Some(start), Some(end)) => Some(AccessWindow::new(start, end)),
            _ => None,
        }
    }
}

/// Data for creating a user
#[derive(Debug, Clone)]
pub struct CreateUserDto {
    pub username: String,
    pub password: String,
    pub role: UserRole,
    pub access_start: Option<NaiveTime>,
    pub access_end: Option<NaiveTime>,
}

/// Admin edit: role and window are overwritten as a whole, clearing a bound
/// is expressed by passing `None`.
#[derive(Debug, Clone)]
pub struct UpdateUserDto {
    pub role: UserRole,
    pub access_start: Option<NaiveTime>,
    pub access_end: Option<NaiveTime>,
}

/// User persistence contract
#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    async fn create(&self, dto: CreateUserDto) -> DomainResult<User>;
    async fn list(&self, page: u32, page_size: u32) -> DomainResult<PaginatedResult<User>>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    async fn count(&self) -> DomainResult<u64>;
    async fn update_access(&self, id: &str, dto: UpdateUserDto) -> DomainResult<Option<User>>;
    async fn update_password_hash(&self, id: &str, password_hash: &str) -> DomainResult<()>;
    async fn update_profile_image(&self, id: &str, filename: &str) -> DomainResult<()>;
    async fn record_login(&self, id: &str) -> DomainResult<()>;
    async fn delete(&self, id: &str) -> DomainResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn user_with_window(start: Option<NaiveTime>, end: Option<NaiveTime>) -> User {
        User {
            id: "u1".into(),
            username: "maria".into(),
            password_hash: String::new(),
            role: UserRole::User,
            access_start: start,
            access_end: end,
            profile_image: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login_at: None,
        }
    }

    #[test]
    fn window_requires_both_bounds() {
        assert!(user_with_window(None, None).access_window().is_none());
        assert!(user_with_window(Some(t(8, 0)), None).access_window().is_none());
        assert!(user_with_window(None, Some(t(18, 0))).access_window().is_none());
        assert!(user_with_window(Some(t(8, 0)), Some(t(18, 0)))
            .access_window()
            .is_some());
    }
}
